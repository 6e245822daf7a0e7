//! Main simulation world that ties everything together
//!
//! `SimWorld` owns the building grid, the traffic pool, the camera and the
//! random source, and runs them in a fixed order once per frame:
//! recycle the grid around the camera, step traffic, then assemble the render
//! snapshot. It has no Bevy dependencies.

use anyhow::{Context, Result};
use log::debug;

use super::camera::{CameraRig, MoveIntent};
use super::config::SimConfig;
use super::grid::{BuildingGrid, RecycleReport};
use super::rng::{RandomSource, SimRng};
use super::snapshot::RenderSnapshot;
use super::traffic::TrafficPool;
use super::types::Position;

/// Counters accumulated over the whole run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub ticks: u64,
    /// Sum of all recycle reports
    pub recycling: RecycleReport,
    /// Report from the most recent tick
    pub last_recycle: RecycleReport,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,
    pub grid: BuildingGrid,
    pub traffic: TrafficPool,
    pub camera: CameraRig,
    pub stats: FrameStats,
    rng: Box<dyn RandomSource>,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    fn new_internal(config: SimConfig, mut rng: Box<dyn RandomSource>) -> Self {
        let grid = BuildingGrid::new(
            config.grid_size_x,
            config.grid_size_z,
            config.grid_origin,
            config.grid_spacing,
            rng.as_mut(),
        );
        let traffic = TrafficPool::new(&config, rng.as_mut());

        Self {
            config,
            grid,
            traffic,
            camera: CameraRig::default(),
            stats: FrameStats::default(),
            rng,
        }
    }

    /// Reference city with an unseeded random source
    pub fn new() -> Self {
        Self::new_internal(SimConfig::default(), Box::new(SimRng::new()))
    }

    /// Reference city with a seeded random source for reproducible runs
    pub fn new_with_seed(seed: u64) -> Self {
        Self::new_internal(SimConfig::default(), Box::new(SimRng::with_seed(seed)))
    }

    /// Build a world from a custom configuration and random source
    pub fn with_config(config: SimConfig, rng: Box<dyn RandomSource>) -> Result<Self> {
        config
            .validate()
            .context("Invalid simulation configuration")?;
        Ok(Self::new_internal(config, rng))
    }

    /// Run one frame with the camera at `camera`
    pub fn tick(&mut self, camera: Position, delta_secs: f32) -> RenderSnapshot {
        self.camera.position = camera;

        let report = self.grid.recycle(&camera, self.rng.as_mut());
        self.traffic.step(delta_secs, self.rng.as_mut());

        self.stats.ticks += 1;
        self.stats.recycling.merge(&report);
        self.stats.last_recycle = report;
        if !report.is_empty() {
            debug!(
                "tick {}: camera ({:.2}, {:.2}) moved {} columns and {} rows",
                self.stats.ticks, camera.x, camera.z, report.column_shifts, report.row_shifts
            );
        }

        self.snapshot()
    }

    /// Simulated seconds since the world was built
    pub fn elapsed(&self) -> f32 {
        self.traffic.elapsed()
    }

    /// Move the camera by one tick of input, then run the frame
    pub fn tick_with_intent(&mut self, intent: MoveIntent, delta_secs: f32) -> RenderSnapshot {
        let camera = self.camera.apply(intent);
        self.tick(camera, delta_secs)
    }

    /// Current render data without advancing the simulation
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            tick: self.stats.ticks,
            camera: self.camera.position,
            buildings: self.grid.transforms(),
            cars: self.traffic.snapshot(),
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== City Simulation Summary ===");
        println!(
            "Tick: {}, Time: {:.2}s",
            self.stats.ticks,
            self.elapsed()
        );
        println!(
            "Camera: ({:.2}, {:.2}, {:.2})",
            self.camera.position.x, self.camera.position.y, self.camera.position.z
        );
        println!(
            "Buildings: {} ({}x{})",
            self.grid.cell_count(),
            self.grid.size_x(),
            self.grid.size_z()
        );
        println!(
            "Streets: {}, Cars: {}, Braking: {}",
            self.traffic.streets().len(),
            self.traffic.len(),
            self.traffic.braking_count()
        );
        println!();

        println!("--- Recycling ---");
        println!(
            "  Column shifts: {}, Row shifts: {}, Cells regrown: {}",
            self.stats.recycling.column_shifts,
            self.stats.recycling.row_shifts,
            self.stats.recycling.cells_regenerated
        );
        println!(
            "  Columns at: {}",
            format_offsets(self.grid.col_offsets())
        );
        println!("  Rows at:    {}", format_offsets(self.grid.row_offsets()));

        println!("--- Streets ---");
        for street in self.traffic.streets() {
            println!(
                "  Street {:?}: x={:.1}, {}, cars={}",
                street.id.0,
                street.x,
                if street.is_forward() {
                    "forward"
                } else {
                    "backward"
                },
                street.cars.len()
            );
        }

        println!("--- Cars ---");
        for car in self.traffic.cars() {
            println!(
                "  Car {:?}: street={}, z={:.2}, speed={:.3}{}",
                car.id.0,
                car.street.0,
                car.position.z,
                car.speed,
                if car.is_braking() { " BRAKING" } else { "" }
            );
        }

        let traffic = &self.traffic.stats;
        println!("--- Traffic ---");
        println!(
            "  Braking entries: {}, Recoveries: {}, Wraps: {}",
            traffic.braking_entries, traffic.recoveries, traffic.wraps
        );
    }

    /// Top-down ASCII map around the camera
    ///
    /// North (-z) is up. `#` building, `|` street, `^`/`v` car heading toward
    /// -z/+z, `!` braking car, `@` camera.
    pub fn render_map(&self) -> String {
        let cam = self.camera.position;
        let half_w = self.grid.size_x() as f32 + 2.0;
        let half_h = self.grid.size_z() as f32 + 2.0;
        let (min_x, max_x) = (cam.x - half_w, cam.x + half_w);
        let (min_z, max_z) = (cam.z - half_h, cam.z + half_h);

        let width = (max_x - min_x).round() as usize + 1;
        let height = (max_z - min_z).round() as usize + 1;
        let mut grid = vec![vec![' '; width]; height];

        let to_cell = |x: f32, z: f32| -> Option<(usize, usize)> {
            if x < min_x || x > max_x || z < min_z || z > max_z {
                return None;
            }
            let col = ((x - min_x).round() as usize).min(width - 1);
            let row = ((z - min_z).round() as usize).min(height - 1);
            Some((row, col))
        };

        // Streets
        let half_road = self.traffic.half_road();
        for street in self.traffic.streets() {
            for row in 0..height {
                let z = min_z + row as f32;
                if z < -half_road || z >= half_road {
                    continue;
                }
                if let Some((r, c)) = to_cell(street.x, z) {
                    grid[r][c] = '|';
                }
            }
        }

        // Buildings
        for t in self.grid.transforms() {
            if let Some((r, c)) = to_cell(t.position.x, t.position.z) {
                grid[r][c] = '#';
            }
        }

        // Cars
        for car in self.traffic.cars() {
            if let Some((r, c)) = to_cell(car.position.x, car.position.z) {
                grid[r][c] = if car.is_braking() {
                    '!'
                } else if car.direction.is_forward() {
                    'v'
                } else {
                    '^'
                };
            }
        }

        if let Some((r, c)) = to_cell(cam.x, cam.z) {
            grid[r][c] = '@';
        }

        let mut out = String::with_capacity((width + 1) * height);
        for row in &grid {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }

    /// Draw a visual map of the world in the terminal
    pub fn draw_map(&self) {
        println!("\n=== City Map ===");
        println!("Legend: #=Building, |=Street, ^/v=Car, !=Braking car, @=Camera");
        println!();
        print!("{}", self.render_map());
        println!();
    }
}

fn format_offsets(offsets: &[f32]) -> String {
    offsets
        .iter()
        .map(|o| format!("{:.1}", o))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::CAMERA_START;

    #[test]
    fn snapshot_sizes_match_configuration() {
        let mut world = SimWorld::new_with_seed(1);
        let snapshot = world.tick(CAMERA_START, 1.0 / 60.0);
        assert_eq!(snapshot.buildings.len(), 36);
        assert_eq!(snapshot.cars.len(), 16);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.camera, CAMERA_START);
    }

    #[test]
    fn first_tick_from_start_recycles_rows_behind_camera() {
        // Rows start at -5..5 and the camera at z = 10, so the first row is
        // more than six units behind it.
        let mut world = SimWorld::new_with_seed(2);
        world.tick(CAMERA_START, 1.0 / 60.0);
        assert!(world.stats.last_recycle.row_shifts > 0);
        assert_eq!(world.stats.last_recycle.column_shifts, 0);
        assert!(world.grid.contains_camera(&CAMERA_START));
    }

    #[test]
    fn snapshot_reflects_recycled_offsets() {
        let mut world = SimWorld::new_with_seed(3);
        let camera = Position::new(40.0, 5.0, -25.0);
        let snapshot = world.tick(camera, 1.0 / 60.0);
        for b in &snapshot.buildings {
            assert!((camera.x - b.position.x).abs() <= 6.0);
            assert!((camera.z - b.position.z).abs() <= 6.0);
        }
    }

    #[test]
    fn intent_moves_camera_before_recycling() {
        let mut world = SimWorld::new_with_seed(4);
        let intent = MoveIntent {
            right: true,
            ..MoveIntent::default()
        };
        let snapshot = world.tick_with_intent(intent, 1.0 / 60.0);
        assert!(snapshot.camera.x > 0.0);
        assert_eq!(world.camera.position, snapshot.camera);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig {
            street_count: 0,
            ..SimConfig::default()
        };
        assert!(SimWorld::with_config(config, Box::new(SimRng::with_seed(5))).is_err());
    }

    #[test]
    fn map_marks_camera_and_buildings() {
        let mut world = SimWorld::new_with_seed(6);
        world.tick(Position::new(0.0, 5.0, 0.0), 1.0 / 60.0);
        let map = world.render_map();
        assert_eq!(map.matches('@').count(), 1);
        assert!(map.contains('#'));
        assert!(map.contains('|'));
    }

    #[test]
    fn elapsed_time_comes_from_traffic_steps() {
        let mut world = SimWorld::new_with_seed(7);
        for _ in 0..8 {
            world.tick(CAMERA_START, 0.25);
        }
        assert_eq!(world.stats.ticks, 8);
        assert!((world.elapsed() - 2.0).abs() < 1e-6);
        assert_eq!(world.elapsed(), world.traffic.elapsed());
    }
}
