//! Per-tick render data handed to the rendering front-end
//!
//! A snapshot is a plain value: the renderer reads it for one frame and never
//! writes back into the simulation.

use super::types::{CarId, Position, Rgb, StreetId};

/// World transform for one building cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingTransform {
    pub column: usize,
    pub row: usize,
    /// Centre of the unit cube after scaling
    pub position: Position,
    /// Non-uniform scale applied to the unit cube
    pub scale: Position,
}

/// Render record for one car
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarRenderRecord {
    pub id: CarId,
    pub street: StreetId,
    pub position: Position,
    pub moving_forward: bool,
    /// Yaw in radians around +y
    pub yaw: f32,
    pub color: Rgb,
    pub braking: bool,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub camera: Position,
    pub buildings: Vec<BuildingTransform>,
    pub cars: Vec<CarRenderRecord>,
}

impl RenderSnapshot {
    pub fn braking_count(&self) -> usize {
        self.cars.iter().filter(|c| c.braking).count()
    }
}
