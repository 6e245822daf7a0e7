//! Core types for the city simulation
//!
//! These are standalone types that don't depend on Bevy.

use std::f32::consts::PI;

/// A wrapper type for car IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CarId(pub usize);

/// A wrapper type for street IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreetId(pub usize);

/// A 3D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn offset(&self, dx: f32, dy: f32, dz: f32) -> Position {
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub fn scaled(&self, factor: f32) -> Position {
        Position::new(self.x * factor, self.y * factor, self.z * factor)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(&self) -> Position {
        let len = self.length();
        if len > 0.0 {
            self.scaled(1.0 / len)
        } else {
            Position::default()
        }
    }

    pub fn cross(&self, other: &Position) -> Position {
        Position::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }
}

impl std::ops::Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// Travel direction of a street along the z axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Moves toward +z
    Forward,
    /// Moves toward -z
    Backward,
}

impl Direction {
    /// Even street indices run forward, odd ones backward
    pub fn for_street(index: usize) -> Self {
        if index % 2 == 0 {
            Direction::Forward
        } else {
            Direction::Backward
        }
    }

    pub fn is_forward(self) -> bool {
        self == Direction::Forward
    }

    /// Sign applied to a speed magnitude to get the z displacement
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }

    /// Yaw around +y used by the renderer to face the car along its lane
    pub fn yaw(self) -> f32 {
        match self {
            Direction::Forward => 0.0,
            Direction::Backward => PI,
        }
    }
}

/// Linear RGB colour in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Car colours, picked by street index modulo the palette length
pub const CAR_PALETTE: [Rgb; 3] = [
    Rgb::new(0.8, 0.2, 0.2),
    Rgb::new(0.2, 0.8, 0.2),
    Rgb::new(0.2, 0.2, 0.8),
];

/// Colour used when the sky texture cannot be loaded (cornflower blue)
pub const SKY_FALLBACK_COLOR: Rgb = Rgb::new(100.0 / 255.0, 149.0 / 255.0, 237.0 / 255.0);

/// Number of buildings along x
pub const GRID_SIZE_X: usize = 6;

/// Number of buildings along z
pub const GRID_SIZE_Z: usize = 6;

/// World coordinate of the first column/row at startup
pub const GRID_ORIGIN: f32 = -5.0;

/// Distance between neighbouring columns/rows at startup
pub const GRID_SPACING: f32 = 2.0;

/// Building heights are drawn uniformly from this range
pub const MIN_BUILDING_HEIGHT: f32 = 2.0;
pub const MAX_BUILDING_HEIGHT: f32 = 8.0;

/// Upper bound on offset shifts per column/row per tick
pub const MAX_RECYCLE_STEPS: usize = 10_000;

/// Length of every street along z
pub const ROAD_LENGTH: f32 = 60.0;

/// Number of streets and cars on each
pub const STREET_COUNT: usize = 4;
pub const CARS_PER_STREET: usize = 4;

/// x of street 0 and spacing between streets
pub const STREET_ORIGIN_X: f32 = -4.0;
pub const STREET_SPACING: f32 = 2.0;

/// Height at which cars ride above the road
pub const CAR_RIDE_HEIGHT: f32 = 0.15;

/// Cars closer than this on the same lane start braking
pub const SAFETY_DISTANCE: f32 = 2.0;

/// Speed multiplier applied every braking tick
pub const BRAKE_DECAY: f32 = 0.9;

/// Two cars share a lane when their x differs by less than this
pub const LANE_EPSILON: f32 = 0.01;

/// Nominal cruising speed range, in world units per tick
pub const MIN_CRUISE_SPEED: f32 = 0.05;
pub const MAX_CRUISE_SPEED: f32 = 0.15;

/// Camera defaults
pub const CAMERA_START: Position = Position {
    x: 0.0,
    y: 5.0,
    z: 10.0,
};
pub const CAMERA_FRONT: Position = Position {
    x: 0.0,
    y: -0.2,
    z: -1.0,
};
pub const CAMERA_UP: Position = Position {
    x: 0.0,
    y: 1.0,
    z: 0.0,
};
pub const CAMERA_MOVE_SPEED: f32 = 0.010;
