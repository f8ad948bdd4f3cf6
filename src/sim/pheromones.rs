//! Pheromone field: two decaying scent channels over a coarse lattice.
//!
//! Ants lay scent into one channel and steer by sampling the other. Cells
//! hold non-negative integer intensities. Deposits only add and decay only
//! subtracts, so no cell can go negative.
//!
//! The lattice is `world_size / scale + 1` cells per axis. World coordinates
//! map to the *nearest* cell (see [`PheromoneField::index`]).

use super::math::Vector;
use std::f64::consts::FRAC_PI_4;

// ============================================================================
// Tuning
// ============================================================================

/// Linear decay step, and the unit the exponential threshold is measured in.
pub const DECAY_UNIT: u32 = 1;
/// Cells at or above `DECAY_UNIT * EXPONENTIAL_DECAY_LIMIT` lose a fixed
/// fraction per tick instead of a fixed amount.
pub const EXPONENTIAL_DECAY_LIMIT: u32 = 200;
/// Step between sample points, in world units.
pub const SAMPLE_RESOLUTION: usize = 1;
/// Angular offset of each sensing sector from the heading.
pub const SECTOR_OFFSET: f64 = FRAC_PI_4;

/// Which scent channel to read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scent {
    /// Trail that leads back to the nest.
    Home,
    /// Trail that leads toward food.
    Food,
}

/// Average intensity seen in the two forward sensing sectors.
///
/// A sector with no in-bounds sample points reports `0.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SectorSample {
    pub right: f64,
    pub left: f64,
}

#[derive(Clone, Debug)]
pub struct PheromoneField {
    scale: u32,
    grid_width: usize,
    grid_height: usize,
    home: Vec<u32>,
    food: Vec<u32>,
}

impl PheromoneField {
    /// Creates an empty field covering a `width` x `height` arena.
    ///
    /// # Arguments
    /// * `scale` - World units per lattice cell. Must be at least 1.
    pub fn new(width: u32, height: u32, scale: u32) -> Self {
        debug_assert!(scale >= 1, "pheromone scale must be at least 1");
        let scale = scale.max(1);
        let grid_width = (width / scale) as usize + 1;
        let grid_height = (height / scale) as usize + 1;
        let len = grid_width * grid_height;
        Self {
            scale,
            grid_width,
            grid_height,
            home: vec![0; len],
            food: vec![0; len],
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Read-only view of the toward-home channel, row-major.
    pub fn home(&self) -> &[u32] {
        &self.home
    }

    /// Read-only view of the toward-food channel, row-major.
    pub fn food(&self) -> &[u32] {
        &self.food
    }

    pub fn channel(&self, kind: Scent) -> &[u32] {
        match kind {
            Scent::Home => &self.home,
            Scent::Food => &self.food,
        }
    }

    fn channel_mut(&mut self, kind: Scent) -> &mut [u32] {
        match kind {
            Scent::Home => &mut self.home,
            Scent::Food => &mut self.food,
        }
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    /// Lattice column (or row) for one world coordinate.
    ///
    /// Coordinates past the midpoint of a cell round up to the next cell.
    fn axis_cell(&self, c: i64) -> Option<usize> {
        if c < 0 {
            return None;
        }
        let s = self.scale as i64;
        let mut cell = c / s;
        if (c % s) as f64 > s as f64 / 2.0 {
            cell += 1;
        }
        Some(cell as usize)
    }

    /// Cell index nearest the world point `(x, y)`, or `None` outside the grid.
    pub fn index(&self, x: i64, y: i64) -> Option<usize> {
        let col = self.axis_cell(x)?;
        let row = self.axis_cell(y)?;
        if col >= self.grid_width || row >= self.grid_height {
            return None;
        }
        Some(row * self.grid_width + col)
    }

    /// World point at the centre of cell `index`, truncated to integers.
    pub fn location(&self, index: usize) -> (i64, i64) {
        let col = (index % self.grid_width) as f64;
        let row = (index / self.grid_width) as f64;
        let s = self.scale as f64;
        (((col + 0.5) * s) as i64, ((row + 0.5) * s) as i64)
    }

    /// Intensity at the cell nearest `(x, y)`. Zero outside the grid.
    pub fn get(&self, kind: Scent, x: i64, y: i64) -> u32 {
        self.index(x, y)
            .map(|i| self.channel(kind)[i])
            .unwrap_or(0)
    }

    // ========================================================================
    // Deposit & Decay
    // ========================================================================

    /// Add `amount` to the cell nearest `(x, y)`.
    ///
    /// `(x, y)` must lie inside the grid. Debug builds assert; release builds
    /// ignore the deposit.
    pub fn add(&mut self, kind: Scent, x: i64, y: i64, amount: u32) {
        let Some(index) = self.index(x, y) else {
            debug_assert!(false, "pheromone deposit out of grid at ({x}, {y})");
            return;
        };
        let cell = &mut self.channel_mut(kind)[index];
        *cell = cell.saturating_add(amount);
    }

    /// Add `amount` at every point of the square `[x-radius, x+radius)` on
    /// both axes. Points off the grid are skipped.
    pub fn spread(&mut self, kind: Scent, x: i64, y: i64, amount: u32, radius: i64) {
        for py in (y - radius)..(y + radius) {
            for px in (x - radius)..(x + radius) {
                if self.index(px, py).is_some() {
                    self.add(kind, px, py, amount);
                }
            }
        }
    }

    /// One decay step over both channels.
    ///
    /// Strong cells lose `3 * DECAY_UNIT / EXPONENTIAL_DECAY_LIMIT` of their
    /// value, weaker ones lose `DECAY_UNIT`, and anything at or below one unit
    /// is zeroed.
    pub fn decay_all(&mut self) {
        for cell in self.home.iter_mut().chain(self.food.iter_mut()) {
            *cell = decay_value(*cell);
        }
    }

    pub fn clear(&mut self) {
        self.home.fill(0);
        self.food.fill(0);
    }

    // ========================================================================
    // Sensing
    // ========================================================================

    /// Average intensity over the right and left sectors ahead of `location`.
    ///
    /// Each sector is a `range` x `range` fan of points spanned by the heading
    /// direction and the sector direction (`heading ± π/4`). Points with a
    /// non-positive coordinate or outside the grid are not counted.
    pub fn sample(&self, kind: Scent, location: Vector, heading: f64, range: usize) -> SectorSample {
        SectorSample {
            right: self.sector_average(kind, location, heading, heading + SECTOR_OFFSET, range),
            left: self.sector_average(kind, location, heading, heading - SECTOR_OFFSET, range),
        }
    }

    fn sector_average(&self, kind: Scent, location: Vector, heading: f64, side: f64, range: usize) -> f64 {
        let forward = Vector::from_heading(heading);
        let lateral = Vector::from_heading(side);
        let channel = self.channel(kind);

        let mut sum: u64 = 0;
        let mut count: u64 = 0;
        for f in (0..range).step_by(SAMPLE_RESOLUTION) {
            for s in (0..range).step_by(SAMPLE_RESOLUTION) {
                let p = location + f as f64 * forward + s as f64 * lateral;
                if p.x <= 0.0 || p.y <= 0.0 {
                    continue;
                }
                if let Some(index) = self.index(p.x as i64, p.y as i64) {
                    sum += channel[index] as u64;
                    count += 1;
                }
            }
        }

        if count == 0 {
            0.0
        } else {
            sum as f64 / count as f64
        }
    }
}

fn decay_value(v: u32) -> u32 {
    if v >= DECAY_UNIT * EXPONENTIAL_DECAY_LIMIT {
        let loss = 3 * DECAY_UNIT as u64 * v as u64 / EXPONENTIAL_DECAY_LIMIT as u64;
        v - loss as u32
    } else if v > DECAY_UNIT {
        v - DECAY_UNIT
    } else {
        0
    }
}

#[cfg(test)]
#[path = "pheromones_tests.rs"]
mod tests;
