//! Standalone city simulation module
//!
//! This module contains the building grid recycling and traffic logic that
//! can run independently of the Bevy game engine. It can be tested via
//! console without needing to boot up the full scene.

mod camera;
mod car;
mod config;
mod grid;
mod rng;
mod snapshot;
mod street;
mod traffic;
mod types;
mod world;

// Re-export public types for external use
pub use camera::{CameraRig, MoveIntent};
pub use car::{wrap_z, CarState, CarTransition, CarUpdateResult, DrivingRules, SimCar};
pub use config::{LaneLookup, SimConfig};
pub use grid::{BuildingGrid, RecycleReport};
pub use rng::{RandomSource, SimRng};
pub use snapshot::{BuildingTransform, CarRenderRecord, RenderSnapshot};
pub use street::SimStreet;
pub use traffic::{TrafficPool, TrafficStats};
pub use types::{
    CarId, Direction, Position, Rgb, StreetId, BRAKE_DECAY, CAMERA_MOVE_SPEED, CAMERA_START,
    CARS_PER_STREET, CAR_PALETTE, CAR_RIDE_HEIGHT, GRID_SIZE_X, GRID_SIZE_Z, LANE_EPSILON,
    MAX_BUILDING_HEIGHT, MAX_RECYCLE_STEPS, MIN_BUILDING_HEIGHT, ROAD_LENGTH, SAFETY_DISTANCE,
    SKY_FALLBACK_COLOR, STREET_COUNT,
};
pub use world::{FrameStats, SimWorld};
