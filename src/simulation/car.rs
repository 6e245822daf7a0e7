//! Car movement logic for the traffic simulation
//!
//! Standalone implementation that doesn't depend on Bevy.

use std::ops::Range;

use super::rng::RandomSource;
use super::types::{CarId, Direction, Position, Rgb, StreetId};

/// Driving state of a car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CarState {
    /// Holding the nominal speed
    #[default]
    Cruising,
    /// Slowing down because another car on the lane is too close
    Braking,
}

/// State change caused by one braking decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarTransition {
    Unchanged,
    StartedBraking,
    ResumedCruising,
}

/// Result of a car update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarUpdateResult {
    pub transition: CarTransition,
    /// The car left one end of the road and reappeared at the other
    pub wrapped: bool,
}

/// Parameters shared by every car for one tick
#[derive(Debug, Clone)]
pub struct DrivingRules {
    pub safety_distance: f32,
    pub brake_decay: f32,
    pub cruise_speed: Range<f32>,
    pub half_road: f32,
}

/// A car in the traffic simulation
#[derive(Debug, Clone)]
pub struct SimCar {
    pub id: CarId,
    pub street: StreetId,
    pub position: Position,
    /// Speed magnitude in world units per tick
    pub speed: f32,
    pub direction: Direction,
    pub color: Rgb,
    pub state: CarState,
}

impl SimCar {
    pub fn new(
        id: CarId,
        street: StreetId,
        position: Position,
        speed: f32,
        direction: Direction,
        color: Rgb,
    ) -> Self {
        Self {
            id,
            street,
            position,
            speed,
            direction,
            color,
            state: CarState::Cruising,
        }
    }

    pub fn is_braking(&self) -> bool {
        self.state == CarState::Braking
    }

    /// Update car movement logic
    ///
    /// `nearest_gap` is the smallest |Δz| to any other car on the same lane,
    /// measured before anyone moved this tick.
    pub fn update(
        &mut self,
        nearest_gap: Option<f32>,
        rules: &DrivingRules,
        rng: &mut dyn RandomSource,
    ) -> CarUpdateResult {
        let transition = self.apply_spacing(nearest_gap, rules, rng);
        let wrapped = self.advance(rules.half_road);
        CarUpdateResult {
            transition,
            wrapped,
        }
    }

    /// Enter, hold or leave the braking state
    fn apply_spacing(
        &mut self,
        nearest_gap: Option<f32>,
        rules: &DrivingRules,
        rng: &mut dyn RandomSource,
    ) -> CarTransition {
        let too_close = nearest_gap.is_some_and(|gap| gap < rules.safety_distance);

        match (self.state, too_close) {
            (CarState::Cruising, true) => {
                self.state = CarState::Braking;
                self.speed *= rules.brake_decay;
                CarTransition::StartedBraking
            }
            (CarState::Braking, true) => {
                self.speed *= rules.brake_decay;
                CarTransition::Unchanged
            }
            (CarState::Braking, false) => {
                // Recovery picks a fresh nominal speed, not the pre-braking one
                self.state = CarState::Cruising;
                self.speed = rng.uniform(rules.cruise_speed.clone());
                CarTransition::ResumedCruising
            }
            (CarState::Cruising, false) => CarTransition::Unchanged,
        }
    }

    /// Move along the lane and wrap at the road ends
    fn advance(&mut self, half_road: f32) -> bool {
        let z = self.position.z + self.direction.sign() * self.speed;
        let (z, wrapped) = wrap_z(z, half_road);
        self.position.z = z;
        wrapped
    }
}

/// Map a z that overshot the road back into `[-half_road, half_road)`
///
/// Overshooting the far end lands exactly on the near end; undershooting the
/// near end lands on the last representable value below the far end.
pub fn wrap_z(z: f32, half_road: f32) -> (f32, bool) {
    if z >= half_road {
        (-half_road, true)
    } else if z < -half_road {
        (just_below(half_road), true)
    } else {
        (z, false)
    }
}

/// Largest f32 strictly below a positive finite `value`
fn just_below(value: f32) -> f32 {
    f32::from_bits(value.to_bits() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng::SimRng;

    fn rules() -> DrivingRules {
        DrivingRules {
            safety_distance: 2.0,
            brake_decay: 0.9,
            cruise_speed: 0.05..0.15,
            half_road: 30.0,
        }
    }

    /// Always returns the same value and counts how often it was asked
    struct FixedSource {
        value: f32,
        draws: usize,
    }

    impl RandomSource for FixedSource {
        fn uniform(&mut self, _range: Range<f32>) -> f32 {
            self.draws += 1;
            self.value
        }
    }

    fn car_at(z: f32, speed: f32, direction: Direction) -> SimCar {
        SimCar::new(
            CarId(0),
            StreetId(0),
            Position::new(-4.0, 0.15, z),
            speed,
            direction,
            Rgb::new(1.0, 0.0, 0.0),
        )
    }

    #[test]
    fn forward_car_wraps_to_near_end_same_tick() {
        let mut rng = SimRng::with_seed(1);
        let mut car = car_at(29.99, 0.05, Direction::Forward);
        let result = car.update(None, &rules(), &mut rng);
        assert!(result.wrapped);
        assert_eq!(car.position.z, -30.0);
    }

    #[test]
    fn backward_car_wraps_just_inside_far_end() {
        let mut rng = SimRng::with_seed(1);
        let mut car = car_at(-29.99, 0.05, Direction::Backward);
        let result = car.update(None, &rules(), &mut rng);
        assert!(result.wrapped);
        assert!(car.position.z < 30.0);
        assert!(car.position.z > 29.999);
    }

    #[test]
    fn landing_exactly_on_far_end_wraps() {
        assert_eq!(wrap_z(30.0, 30.0), (-30.0, true));
        assert_eq!(wrap_z(-30.0, 30.0), (-30.0, false));
    }

    #[test]
    fn close_neighbor_triggers_braking_and_decay() {
        let mut rng = SimRng::with_seed(2);
        let mut car = car_at(0.0, 0.1, Direction::Forward);
        let result = car.update(Some(1.5), &rules(), &mut rng);
        assert_eq!(result.transition, CarTransition::StartedBraking);
        assert!(car.is_braking());
        assert!((car.speed - 0.09).abs() < 1e-6);

        let before = car.speed;
        car.update(Some(1.5), &rules(), &mut rng);
        assert!(car.speed < before);
    }

    #[test]
    fn gap_at_threshold_releases_brakes_with_new_speed() {
        let mut rng = SimRng::with_seed(3);
        let mut car = car_at(0.0, 0.001, Direction::Forward);
        car.state = CarState::Braking;
        let result = car.update(Some(2.0), &rules(), &mut rng);
        assert_eq!(result.transition, CarTransition::ResumedCruising);
        assert!(!car.is_braking());
        assert!((0.05..0.15).contains(&car.speed));
    }

    #[test]
    fn lone_cruiser_keeps_speed() {
        let mut rng = SimRng::with_seed(4);
        let mut car = car_at(0.0, 0.12, Direction::Backward);
        car.update(None, &rules(), &mut rng);
        assert_eq!(car.speed, 0.12);
        assert!((car.position.z + 0.12).abs() < 1e-6);
    }

    #[test]
    fn only_leaving_braking_draws_a_speed() {
        let mut source = FixedSource {
            value: 0.123,
            draws: 0,
        };
        let mut car = car_at(0.0, 0.1, Direction::Forward);

        car.update(None, &rules(), &mut source);
        assert_eq!(source.draws, 0, "cruising kept its speed");

        car.update(Some(1.0), &rules(), &mut source);
        car.update(Some(1.0), &rules(), &mut source);
        assert_eq!(source.draws, 0, "braking only decays");
        assert!((car.speed - 0.1 * 0.9 * 0.9).abs() < 1e-6);

        let result = car.update(Some(5.0), &rules(), &mut source);
        assert_eq!(result.transition, CarTransition::ResumedCruising);
        assert_eq!(source.draws, 1);
        assert_eq!(car.speed, 0.123);
    }
}
