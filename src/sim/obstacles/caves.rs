//! Procedural cave generation: random block fill followed by
//! cellular-automaton smoothing over a coarse block lattice.

use bevy::log::debug;
use rand::Rng;

use super::ObstacleField;

/// Chance (percent) that a block starts out solid.
pub const CAVE_FILL_PERCENT: f64 = 43.0;
pub const SMOOTH_ITERATIONS: usize = 10;
/// Edge length of one generation block, in cells.
pub const BLOCK_SIZE: i64 = 5;
/// A block becomes solid when at least this many of its 24 neighbours are.
pub const SMOOTH_THRESHOLD: usize = 12;

impl ObstacleField {
    /// Replace the whole field with a freshly generated cave system.
    ///
    /// Clears, randomly fills blocks, then runs [`SMOOTH_ITERATIONS`]
    /// smoothing passes. The border ring is occupied afterwards.
    pub fn generate_caves<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.clear();
        self.random_fill(rng);
        self.fill_borders();
        for _ in 0..SMOOTH_ITERATIONS {
            self.smooth();
        }
        self.fill_borders();
        debug!(
            "Generated caves: {} of {} cells occupied",
            self.cells.count_ones(..),
            self.cells.len()
        );
    }

    fn random_fill<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (x, y) in self.block_origins() {
            if rng.random_range(0.0..100.0) < CAVE_FILL_PERCENT {
                self.paint_block(x, y, true);
            }
        }
    }

    /// One smoothing pass.
    ///
    /// Every block votes on a snapshot of the field: it becomes solid when
    /// at least [`SMOOTH_THRESHOLD`] of the blocks in its 5x5 block
    /// neighbourhood are solid, and empty otherwise. Neighbours off the grid
    /// count as solid. The border ring is restored after the pass.
    pub fn smooth(&mut self) {
        let snapshot = self.cells.clone();
        let origins: Vec<(i64, i64)> = self.block_origins().collect();
        for (x, y) in origins {
            let walls = self.neighbour_walls(&snapshot, x, y);
            self.paint_block(x, y, walls >= SMOOTH_THRESHOLD);
        }
        self.fill_borders();
    }

    fn block_origins(&self) -> impl Iterator<Item = (i64, i64)> {
        let x_end = self.grid_width as i64 - BLOCK_SIZE;
        let y_end = self.grid_height as i64 - BLOCK_SIZE;
        (0..x_end.max(0))
            .step_by(BLOCK_SIZE as usize)
            .flat_map(move |x| (0..y_end.max(0)).step_by(BLOCK_SIZE as usize).map(move |y| (x, y)))
    }

    fn neighbour_walls(&self, snapshot: &fixedbitset::FixedBitSet, x: i64, y: i64) -> usize {
        let mut walls = 0;
        for nx in (x - 2 * BLOCK_SIZE..=x + 2 * BLOCK_SIZE).step_by(BLOCK_SIZE as usize) {
            for ny in (y - 2 * BLOCK_SIZE..=y + 2 * BLOCK_SIZE).step_by(BLOCK_SIZE as usize) {
                if nx == x && ny == y {
                    continue;
                }
                match self.cell_index(nx, ny) {
                    Some(i) if snapshot.contains(i) => walls += 1,
                    Some(_) => {}
                    None => walls += 1,
                }
            }
        }
        walls
    }

    fn paint_block(&mut self, x: i64, y: i64, value: bool) {
        for dy in 0..BLOCK_SIZE {
            for dx in 0..BLOCK_SIZE {
                self.set_cell(x + dx, y + dy, value);
            }
        }
    }
}
