//! Traffic pool: spawning and per-tick updates for every car
//!
//! Cars never change lanes and are never despawned, so the pool is built once
//! and only mutated by [`TrafficPool::step`].

use log::debug;
use ordered_float::OrderedFloat;
use sorted_vec::SortedVec;

use super::car::{wrap_z, CarTransition, DrivingRules, SimCar};
use super::config::{LaneLookup, SimConfig};
use super::rng::RandomSource;
use super::snapshot::CarRenderRecord;
use super::street::SimStreet;
use super::types::{CarId, Position, StreetId, CAR_PALETTE, CAR_RIDE_HEIGHT};

/// Counters accumulated across ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrafficStats {
    pub braking_entries: u64,
    pub recoveries: u64,
    pub wraps: u64,
}

/// Car indices that share one lane (x equal within the lane epsilon)
#[derive(Debug, Clone)]
struct Lane {
    x: f32,
    members: Vec<usize>,
}

/// Fixed set of cars on fixed streets
#[derive(Debug, Clone)]
pub struct TrafficPool {
    streets: Vec<SimStreet>,
    /// Indexed by `CarId.0`
    cars: Vec<SimCar>,
    lanes: Vec<Lane>,
    rules: DrivingRules,
    lane_epsilon: f32,
    lookup: LaneLookup,
    pub stats: TrafficStats,
    /// Simulated seconds accumulated from `step`
    elapsed: f32,
}

impl TrafficPool {
    /// Spawn `cars_per_street` cars on each street
    ///
    /// Cars start in evenly spaced slots along the road with a random offset
    /// into the first half of their slot, so no two start closer than half a
    /// slot.
    pub fn new(config: &SimConfig, rng: &mut dyn RandomSource) -> Self {
        let half = config.half_road();
        let slot = config.road_length / config.cars_per_street.max(1) as f32;
        let mut streets = Vec::with_capacity(config.street_count);
        let mut cars = Vec::with_capacity(config.car_count());

        for s in 0..config.street_count {
            let mut street = SimStreet::new(StreetId(s), config.street_x(s));
            let color = CAR_PALETTE[s % CAR_PALETTE.len()];

            for k in 0..config.cars_per_street {
                let id = CarId(cars.len());
                let z = -half + k as f32 * slot + rng.uniform(0.0..slot * 0.5);
                let speed = rng.uniform(config.cruise_speed.clone());
                cars.push(SimCar::new(
                    id,
                    street.id,
                    Position::new(street.x, CAR_RIDE_HEIGHT, z),
                    speed,
                    street.direction,
                    color,
                ));
                street.cars.push(id);
            }
            streets.push(street);
        }

        let lanes = group_lanes(&cars, config.lane_epsilon);
        debug!(
            "spawned {} cars on {} streets ({} lanes)",
            cars.len(),
            streets.len(),
            lanes.len()
        );

        Self {
            streets,
            cars,
            lanes,
            rules: DrivingRules {
                safety_distance: config.safety_distance,
                brake_decay: config.brake_decay,
                cruise_speed: config.cruise_speed.clone(),
                half_road: half,
            },
            lane_epsilon: config.lane_epsilon,
            lookup: config.lane_lookup,
            stats: TrafficStats::default(),
            elapsed: 0.0,
        }
    }

    pub fn streets(&self) -> &[SimStreet] {
        &self.streets
    }

    pub fn cars(&self) -> &[SimCar] {
        &self.cars
    }

    pub fn car(&self, id: CarId) -> Option<&SimCar> {
        self.cars.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.cars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    pub fn half_road(&self) -> f32 {
        self.rules.half_road
    }

    /// Simulated seconds passed to `step` so far
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Move a car along its lane and set its speed (used to stage scenarios)
    ///
    /// `z` is wrapped into the road like any other position.
    pub fn place_car(&mut self, id: CarId, z: f32, speed: f32) {
        let half = self.rules.half_road;
        if let Some(car) = self.cars.get_mut(id.0) {
            car.position.z = wrap_z(z, half).0;
            car.speed = speed.max(0.0);
        }
    }

    /// Advance every car by one tick
    pub fn step(&mut self, delta_secs: f32, rng: &mut dyn RandomSource) {
        self.elapsed += delta_secs;
        let gaps = self.nearest_gaps();

        for (car, gap) in self.cars.iter_mut().zip(gaps) {
            let result = car.update(gap, &self.rules, rng);
            match result.transition {
                CarTransition::StartedBraking => {
                    self.stats.braking_entries += 1;
                    debug!("car {:?} braking at z={:.2}", car.id.0, car.position.z);
                }
                CarTransition::ResumedCruising => {
                    self.stats.recoveries += 1;
                    debug!("car {:?} cruising at speed {:.3}", car.id.0, car.speed);
                }
                CarTransition::Unchanged => {}
            }
            if result.wrapped {
                self.stats.wraps += 1;
            }
        }
    }

    /// Smallest same-lane |Δz| per car, using the configured lookup
    pub fn nearest_gaps(&self) -> Vec<Option<f32>> {
        match self.lookup {
            LaneLookup::Pairwise => self.nearest_gaps_pairwise(),
            LaneLookup::SortedLanes => self.nearest_gaps_sorted(),
        }
    }

    fn nearest_gaps_pairwise(&self) -> Vec<Option<f32>> {
        self.cars
            .iter()
            .enumerate()
            .map(|(i, car)| {
                self.cars
                    .iter()
                    .enumerate()
                    .filter(|(j, other)| {
                        *j != i && (other.position.x - car.position.x).abs() < self.lane_epsilon
                    })
                    .map(|(_, other)| (other.position.z - car.position.z).abs())
                    .min_by(f32::total_cmp)
            })
            .collect()
    }

    fn nearest_gaps_sorted(&self) -> Vec<Option<f32>> {
        let mut gaps = vec![None; self.cars.len()];

        for lane in &self.lanes {
            let by_z: SortedVec<(OrderedFloat<f32>, usize)> = SortedVec::from_unsorted(
                lane.members
                    .iter()
                    .map(|&idx| (OrderedFloat(self.cars[idx].position.z), idx))
                    .collect(),
            );

            for (k, (z, idx)) in by_z.iter().enumerate() {
                let below = k.checked_sub(1).map(|p| z.0 - by_z[p].0 .0);
                let above = by_z.get(k + 1).map(|next| next.0 .0 - z.0);
                gaps[*idx] = match (below, above) {
                    (Some(a), Some(b)) => Some(a.min(b)),
                    (a, b) => a.or(b),
                };
            }
        }

        gaps
    }

    /// Render records for every car, in id order
    pub fn snapshot(&self) -> Vec<CarRenderRecord> {
        self.cars
            .iter()
            .map(|car| CarRenderRecord {
                id: car.id,
                street: car.street,
                position: car.position,
                moving_forward: car.direction.is_forward(),
                yaw: car.direction.yaw(),
                color: car.color,
                braking: car.is_braking(),
            })
            .collect()
    }

    pub fn braking_count(&self) -> usize {
        self.cars.iter().filter(|c| c.is_braking()).count()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }
}

/// Cluster cars into lanes by x
fn group_lanes(cars: &[SimCar], epsilon: f32) -> Vec<Lane> {
    let mut lanes: Vec<Lane> = Vec::new();
    for (idx, car) in cars.iter().enumerate() {
        match lanes
            .iter_mut()
            .find(|lane| (lane.x - car.position.x).abs() < epsilon)
        {
            Some(lane) => lane.members.push(idx),
            None => lanes.push(Lane {
                x: car.position.x,
                members: vec![idx],
            }),
        }
    }
    lanes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng::SimRng;

    fn pool_with(config: &SimConfig, seed: u64) -> (TrafficPool, SimRng) {
        let mut rng = SimRng::with_seed(seed);
        let pool = TrafficPool::new(config, &mut rng);
        (pool, rng)
    }

    #[test]
    fn spawns_fixed_pool_with_alternating_directions() {
        let config = SimConfig::default();
        let (pool, _) = pool_with(&config, 1);
        assert_eq!(pool.len(), config.street_count * config.cars_per_street);
        assert_eq!(pool.lane_count(), config.street_count);

        for (s, street) in pool.streets().iter().enumerate() {
            assert_eq!(street.is_forward(), s % 2 == 0);
            assert_eq!(street.cars.len(), config.cars_per_street);
            for id in &street.cars {
                let car = pool.car(*id).expect("street car exists");
                assert_eq!(car.position.x, street.x);
                assert_eq!(car.direction, street.direction);
                assert_eq!(car.color, CAR_PALETTE[s % 3]);
            }
        }
    }

    #[test]
    fn spawn_positions_are_on_the_road() {
        let config = SimConfig::default();
        let (pool, _) = pool_with(&config, 2);
        for car in pool.cars() {
            assert!(car.position.z >= -30.0 && car.position.z < 30.0);
            assert!(config.cruise_speed.contains(&car.speed));
            assert!(!car.is_braking());
        }
    }

    #[test]
    fn close_pair_brakes_and_lone_car_does_not() {
        let config = SimConfig {
            street_count: 1,
            cars_per_street: 3,
            ..SimConfig::default()
        };
        let (mut pool, mut rng) = pool_with(&config, 3);
        pool.place_car(CarId(0), 0.0, 0.1);
        pool.place_car(CarId(1), 1.0, 0.1);
        pool.place_car(CarId(2), 20.0, 0.1);

        pool.step(1.0 / 60.0, &mut rng);

        assert!(pool.car(CarId(0)).unwrap().is_braking());
        assert!(pool.car(CarId(1)).unwrap().is_braking());
        assert!(!pool.car(CarId(2)).unwrap().is_braking());
        assert_eq!(pool.stats.braking_entries, 2);
    }

    #[test]
    fn cars_on_different_streets_ignore_each_other() {
        let config = SimConfig {
            street_count: 2,
            cars_per_street: 1,
            ..SimConfig::default()
        };
        let (mut pool, mut rng) = pool_with(&config, 4);
        pool.place_car(CarId(0), 5.0, 0.1);
        pool.place_car(CarId(1), 5.0, 0.1);

        pool.step(1.0 / 60.0, &mut rng);

        assert_eq!(pool.braking_count(), 0);
        assert_eq!(pool.nearest_gaps(), vec![None, None]);
    }

    #[test]
    fn sorted_lanes_match_pairwise_scan() {
        let pairwise = SimConfig::default();
        let sorted = SimConfig {
            lane_lookup: LaneLookup::SortedLanes,
            ..SimConfig::default()
        };
        let (mut a, mut rng_a) = pool_with(&pairwise, 11);
        let (mut b, mut rng_b) = pool_with(&sorted, 11);

        for _ in 0..3_000 {
            assert_eq!(a.nearest_gaps(), b.nearest_gaps());
            a.step(1.0 / 60.0, &mut rng_a);
            b.step(1.0 / 60.0, &mut rng_b);
        }
        assert_eq!(a.snapshot(), b.snapshot());
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn positions_stay_on_road_for_long_runs() {
        let config = SimConfig {
            cars_per_street: 8,
            ..SimConfig::default()
        };
        let (mut pool, mut rng) = pool_with(&config, 5);
        for _ in 0..5_000 {
            pool.step(1.0 / 60.0, &mut rng);
            for car in pool.cars() {
                assert!(
                    car.position.z >= -30.0 && car.position.z < 30.0,
                    "car {:?} left the road at {}",
                    car.id,
                    car.position.z
                );
                assert!(car.speed >= 0.0);
            }
        }
    }

    #[test]
    fn car_crossing_far_end_reappears_at_near_end() {
        let config = SimConfig {
            street_count: 1,
            cars_per_street: 1,
            ..SimConfig::default()
        };
        let (mut pool, mut rng) = pool_with(&config, 7);
        pool.place_car(CarId(0), 29.99, 0.05);

        pool.step(1.0 / 60.0, &mut rng);

        assert_eq!(pool.car(CarId(0)).unwrap().position.z, -30.0);
        assert_eq!(pool.stats.wraps, 1);
    }

    #[test]
    fn elapsed_time_accumulates_delta() {
        let (mut pool, mut rng) = pool_with(&SimConfig::default(), 6);
        for _ in 0..10 {
            pool.step(0.5, &mut rng);
        }
        assert!((pool.elapsed() - 5.0).abs() < 1e-6);
    }
}
