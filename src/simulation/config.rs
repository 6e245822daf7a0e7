//! Tunable parameters for the city simulation

use anyhow::{bail, Result};
use std::ops::Range;

use super::types::{
    BRAKE_DECAY, CARS_PER_STREET, GRID_ORIGIN, GRID_SIZE_X, GRID_SIZE_Z, GRID_SPACING,
    LANE_EPSILON, MAX_CRUISE_SPEED, MIN_CRUISE_SPEED, ROAD_LENGTH, SAFETY_DISTANCE,
    STREET_COUNT, STREET_ORIGIN_X, STREET_SPACING,
};

/// How the traffic pool finds a car's nearest same-lane neighbour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneLookup {
    /// Compare every pair of cars in the pool
    #[default]
    Pairwise,
    /// Group cars per lane and sort each lane by z
    SortedLanes,
}

/// Simulation configuration
///
/// `Default` gives the reference city: a 6x6 building grid, four 60 unit
/// streets with four cars each.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub grid_size_x: usize,
    pub grid_size_z: usize,
    pub grid_origin: f32,
    pub grid_spacing: f32,
    pub road_length: f32,
    pub street_count: usize,
    pub cars_per_street: usize,
    pub street_origin_x: f32,
    pub street_spacing: f32,
    pub safety_distance: f32,
    pub brake_decay: f32,
    pub lane_epsilon: f32,
    pub cruise_speed: Range<f32>,
    pub lane_lookup: LaneLookup,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            grid_size_x: GRID_SIZE_X,
            grid_size_z: GRID_SIZE_Z,
            grid_origin: GRID_ORIGIN,
            grid_spacing: GRID_SPACING,
            road_length: ROAD_LENGTH,
            street_count: STREET_COUNT,
            cars_per_street: CARS_PER_STREET,
            street_origin_x: STREET_ORIGIN_X,
            street_spacing: STREET_SPACING,
            safety_distance: SAFETY_DISTANCE,
            brake_decay: BRAKE_DECAY,
            lane_epsilon: LANE_EPSILON,
            cruise_speed: MIN_CRUISE_SPEED..MAX_CRUISE_SPEED,
            lane_lookup: LaneLookup::Pairwise,
        }
    }
}

impl SimConfig {
    /// Check that the configuration describes a runnable world
    pub fn validate(&self) -> Result<()> {
        if self.grid_size_x == 0 || self.grid_size_z == 0 {
            bail!(
                "grid must have at least one cell per axis (got {}x{})",
                self.grid_size_x,
                self.grid_size_z
            );
        }
        if !self.grid_origin.is_finite() {
            bail!("grid origin must be finite (got {})", self.grid_origin);
        }
        if !(self.grid_spacing > 0.0 && self.grid_spacing.is_finite()) {
            bail!(
                "grid spacing must be positive and finite (got {})",
                self.grid_spacing
            );
        }
        if !(self.road_length > 0.0) {
            bail!("road length must be positive (got {})", self.road_length);
        }
        if self.street_count == 0 {
            bail!("at least one street is required");
        }
        if !(self.street_spacing > 0.0) {
            bail!("street spacing must be positive (got {})", self.street_spacing);
        }
        if !(self.lane_epsilon > 0.0) || self.lane_epsilon >= self.street_spacing {
            bail!(
                "lane epsilon must be positive and below the street spacing (got {})",
                self.lane_epsilon
            );
        }
        if !(self.safety_distance > 0.0) {
            bail!("safety distance must be positive (got {})", self.safety_distance);
        }
        if !(self.brake_decay > 0.0 && self.brake_decay < 1.0) {
            bail!("brake decay must lie in (0, 1) (got {})", self.brake_decay);
        }
        let speed = &self.cruise_speed;
        if !(speed.start >= 0.0) || !(speed.start < speed.end) {
            bail!(
                "cruise speed range must be non-negative and non-empty (got {:?})",
                speed
            );
        }
        if speed.end >= self.road_length {
            bail!(
                "cruise speed {} would let a car cross the whole road in one tick",
                speed.end
            );
        }
        Ok(())
    }

    /// Total number of cars in the pool
    pub fn car_count(&self) -> usize {
        self.street_count * self.cars_per_street
    }

    pub fn half_road(&self) -> f32 {
        self.road_length / 2.0
    }

    /// x coordinate of a street
    pub fn street_x(&self, index: usize) -> f32 {
        self.street_origin_x + index as f32 * self.street_spacing
    }
}
