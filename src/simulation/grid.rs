//! Building grid that follows the camera
//!
//! A fixed `size_x` by `size_z` array of buildings is laid over an unbounded
//! world. Each column and row has its own world anchor. Whenever the camera
//! gets more than one grid width away from an anchor, the anchor jumps by two
//! grid widths toward the camera and the buildings it carries are regrown with
//! fresh heights.

use log::{debug, warn};

use super::rng::RandomSource;
use super::snapshot::BuildingTransform;
use super::types::{Position, MAX_BUILDING_HEIGHT, MAX_RECYCLE_STEPS, MIN_BUILDING_HEIGHT};

/// What one call to [`BuildingGrid::recycle`] changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecycleReport {
    /// Number of whole-grid shifts applied to column anchors
    pub column_shifts: usize,
    /// Number of whole-grid shifts applied to row anchors
    pub row_shifts: usize,
    /// Height draws performed (a cell may be counted more than once)
    pub cells_regenerated: usize,
    /// Anchors that hit the step cap without reaching the camera
    pub capped: usize,
}

impl RecycleReport {
    pub fn is_empty(&self) -> bool {
        self.column_shifts == 0 && self.row_shifts == 0
    }

    pub fn merge(&mut self, other: &RecycleReport) {
        self.column_shifts += other.column_shifts;
        self.row_shifts += other.row_shifts;
        self.cells_regenerated += other.cells_regenerated;
        self.capped += other.capped;
    }
}

/// Height field plus column/row anchors
#[derive(Debug, Clone)]
pub struct BuildingGrid {
    size_x: usize,
    size_z: usize,
    /// Heights indexed `i * size_z + j`
    heights: Vec<f32>,
    col_offsets: Vec<f32>,
    row_offsets: Vec<f32>,
}

impl BuildingGrid {
    /// Create a grid with linearly spaced anchors and random heights
    pub fn new(
        size_x: usize,
        size_z: usize,
        origin: f32,
        spacing: f32,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let heights = (0..size_x * size_z).map(|_| draw_height(rng)).collect();
        let col_offsets = (0..size_x).map(|i| origin + i as f32 * spacing).collect();
        let row_offsets = (0..size_z).map(|j| origin + j as f32 * spacing).collect();

        Self {
            size_x,
            size_z,
            heights,
            col_offsets,
            row_offsets,
        }
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_z(&self) -> usize {
        self.size_z
    }

    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    pub fn height(&self, i: usize, j: usize) -> f32 {
        self.heights[i * self.size_z + j]
    }

    pub fn col_offsets(&self) -> &[f32] {
        &self.col_offsets
    }

    pub fn row_offsets(&self) -> &[f32] {
        &self.row_offsets
    }

    /// Override one column anchor (used to stage scenarios)
    pub fn set_col_offset(&mut self, i: usize, offset: f32) {
        self.col_offsets[i] = offset;
    }

    /// Override one row anchor (used to stage scenarios)
    pub fn set_row_offset(&mut self, j: usize, offset: f32) {
        self.row_offsets[j] = offset;
    }

    /// Pull every column and row back within one grid width of the camera
    ///
    /// Columns are settled against `camera.x`, then rows against `camera.z`.
    /// Each whole-grid shift regrows the full column (or row) it moved, so a
    /// cell whose column and row both moved this tick is drawn twice.
    pub fn recycle(&mut self, camera: &Position, rng: &mut dyn RandomSource) -> RecycleReport {
        let mut report = RecycleReport::default();
        let (size_x, size_z) = (self.size_x, self.size_z);
        let heights = &mut self.heights;

        for (i, anchor) in self.col_offsets.iter_mut().enumerate() {
            let (steps, capped) = settle_anchor(anchor, camera.x, size_x as f32, || {
                for j in 0..size_z {
                    heights[i * size_z + j] = draw_height(rng);
                }
            });
            if capped {
                warn!(
                    "column {} stopped after {} shifts, anchor {} still far from camera x {}",
                    i, steps, anchor, camera.x
                );
                report.capped += 1;
            }
            if steps > 0 {
                debug!("column {} shifted {} times to {}", i, steps, anchor);
            }
            report.column_shifts += steps;
            report.cells_regenerated += steps * size_z;
        }

        for (j, anchor) in self.row_offsets.iter_mut().enumerate() {
            let (steps, capped) = settle_anchor(anchor, camera.z, size_z as f32, || {
                for i in 0..size_x {
                    heights[i * size_z + j] = draw_height(rng);
                }
            });
            if capped {
                warn!(
                    "row {} stopped after {} shifts, anchor {} still far from camera z {}",
                    j, steps, anchor, camera.z
                );
                report.capped += 1;
            }
            if steps > 0 {
                debug!("row {} shifted {} times to {}", j, steps, anchor);
            }
            report.row_shifts += steps;
            report.cells_regenerated += steps * size_x;
        }

        report
    }

    /// World transform of one building
    pub fn cell_transform(&self, i: usize, j: usize) -> BuildingTransform {
        let height = self.height(i, j);
        BuildingTransform {
            column: i,
            row: j,
            position: Position::new(self.col_offsets[i], height / 2.0, self.row_offsets[j]),
            scale: Position::new(1.0, height, 1.0),
        }
    }

    /// All building transforms, column index outer and row index inner
    pub fn transforms(&self) -> Vec<BuildingTransform> {
        let mut out = Vec::with_capacity(self.cell_count());
        for i in 0..self.size_x {
            for j in 0..self.size_z {
                out.push(self.cell_transform(i, j));
            }
        }
        out
    }

    /// True when every anchor is within one grid width of the camera
    pub fn contains_camera(&self, camera: &Position) -> bool {
        let width_x = self.size_x as f32;
        let width_z = self.size_z as f32;
        self.col_offsets
            .iter()
            .all(|x| (camera.x - x).abs() <= width_x)
            && self
                .row_offsets
                .iter()
                .all(|z| (camera.z - z).abs() <= width_z)
    }
}

/// Shift `anchor` by `2 * width` steps until it is within `width` of `camera`
///
/// Calls `on_shift` after every step. Returns the number of steps taken and
/// whether the step cap was reached first.
fn settle_anchor(
    anchor: &mut f32,
    camera: f32,
    width: f32,
    mut on_shift: impl FnMut(),
) -> (usize, bool) {
    let mut steps = 0;
    while camera - *anchor > width {
        if steps == MAX_RECYCLE_STEPS {
            return (steps, true);
        }
        *anchor += 2.0 * width;
        steps += 1;
        on_shift();
    }
    while camera - *anchor < -width {
        if steps == MAX_RECYCLE_STEPS {
            return (steps, true);
        }
        *anchor -= 2.0 * width;
        steps += 1;
        on_shift();
    }
    (steps, false)
}

fn draw_height(rng: &mut dyn RandomSource) -> f32 {
    rng.uniform(MIN_BUILDING_HEIGHT..MAX_BUILDING_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::rng::SimRng;

    /// Random source that counts draws and returns a fixed value
    struct CountingSource {
        draws: usize,
        value: f32,
    }

    impl RandomSource for CountingSource {
        fn uniform(&mut self, _range: std::ops::Range<f32>) -> f32 {
            self.draws += 1;
            self.value
        }
    }

    fn reference_grid(rng: &mut dyn RandomSource) -> BuildingGrid {
        BuildingGrid::new(6, 6, -5.0, 2.0, rng)
    }

    #[test]
    fn initial_anchors_are_linearly_spaced() {
        let grid = reference_grid(&mut SimRng::with_seed(1));
        assert_eq!(grid.col_offsets(), &[-5.0, -3.0, -1.0, 1.0, 3.0, 5.0]);
        assert_eq!(grid.row_offsets(), &[-5.0, -3.0, -1.0, 1.0, 3.0, 5.0]);
        assert_eq!(grid.cell_count(), 36);
    }

    #[test]
    fn camera_at_origin_needs_no_recycling() {
        let mut rng = SimRng::with_seed(2);
        let mut grid = reference_grid(&mut rng);
        let before = grid.heights.clone();
        let report = grid.recycle(&Position::new(0.0, 5.0, 0.0), &mut rng);
        assert!(report.is_empty());
        assert_eq!(grid.heights, before);
    }

    #[test]
    fn jump_of_fifteen_shifts_column_once() {
        let mut source = CountingSource {
            draws: 0,
            value: 3.0,
        };
        let mut grid = reference_grid(&mut source);
        source.draws = 0;

        // camera z = 0 keeps all rows in place
        let report = grid.recycle(&Position::new(10.0, 5.0, 0.0), &mut source);

        assert_eq!(grid.col_offsets()[0], 7.0);
        assert_eq!(grid.col_offsets()[5], 5.0);
        // columns at -5, -3, -1, 1, 3 each shift once; 5 stays
        assert_eq!(report.column_shifts, 5);
        assert_eq!(report.row_shifts, 0);
        assert_eq!(report.cells_regenerated, 5 * 6);
        assert_eq!(source.draws, 5 * 6);
    }

    #[test]
    fn teleport_converges_in_one_call() {
        let mut rng = SimRng::with_seed(3);
        let mut grid = reference_grid(&mut rng);
        let camera = Position::new(1000.0, 5.0, -777.5);
        let report = grid.recycle(&camera, &mut rng);
        assert!(grid.contains_camera(&camera));
        assert_eq!(report.capped, 0);
        // 1005 / 12 rounds up to 84 steps for the first column
        assert!(report.column_shifts >= 6 * 83);
    }

    #[test]
    fn backward_motion_shifts_down() {
        let mut rng = SimRng::with_seed(4);
        let mut grid = reference_grid(&mut rng);
        let camera = Position::new(-10.0, 5.0, -10.0);
        grid.recycle(&camera, &mut rng);
        assert!(grid.contains_camera(&camera));
        assert_eq!(grid.col_offsets()[5], -7.0);
        assert_eq!(grid.row_offsets()[5], -7.0);
    }

    #[test]
    fn diagonal_crossing_regrows_shared_cell_twice() {
        let mut source = CountingSource {
            draws: 0,
            value: 4.0,
        };
        let mut grid = BuildingGrid::new(1, 1, 0.0, 2.0, &mut source);
        source.draws = 0;

        let report = grid.recycle(&Position::new(1.5, 0.0, 1.5), &mut source);

        assert_eq!(grid.col_offsets(), &[2.0]);
        assert_eq!(grid.row_offsets(), &[2.0]);
        assert_eq!(report.cells_regenerated, 2);
        assert_eq!(source.draws, 2);
    }

    #[test]
    fn runaway_displacement_is_capped() {
        let mut rng = SimRng::with_seed(5);
        let mut grid = BuildingGrid::new(1, 1, 0.0, 2.0, &mut rng);
        let report = grid.recycle(&Position::new(1.0e9, 0.0, 0.0), &mut rng);
        assert_eq!(report.capped, 1);
        assert_eq!(report.column_shifts, MAX_RECYCLE_STEPS);
    }

    #[test]
    fn transforms_center_cubes_on_half_height() {
        let mut source = CountingSource {
            draws: 0,
            value: 6.0,
        };
        let grid = reference_grid(&mut source);
        let t = grid.cell_transform(2, 4);
        assert_eq!(t.position, Position::new(-1.0, 3.0, 3.0));
        assert_eq!(t.scale, Position::new(1.0, 6.0, 1.0));
        assert_eq!(grid.transforms().len(), 36);
    }

    #[test]
    fn heights_stay_in_domain_while_flying() {
        let mut rng = SimRng::with_seed(6);
        let mut grid = reference_grid(&mut rng);
        let mut camera = Position::new(0.0, 5.0, 10.0);
        for step in 0..2_000 {
            camera.x += 0.37;
            camera.z -= if step % 3 == 0 { 1.1 } else { -0.4 };
            grid.recycle(&camera, &mut rng);
            assert!(grid.contains_camera(&camera));
            assert!(grid
                .heights
                .iter()
                .all(|h| (MIN_BUILDING_HEIGHT..MAX_BUILDING_HEIGHT).contains(h)));
        }
    }
}
