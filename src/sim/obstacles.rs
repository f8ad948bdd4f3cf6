use fixedbitset::FixedBitSet;

use super::math::Vector;

mod caves;

pub use caves::{BLOCK_SIZE, CAVE_FILL_PERCENT, SMOOTH_ITERATIONS, SMOOTH_THRESHOLD};

/// Thickness of the always-occupied ring around the arena.
pub const BORDER_WIDTH: i64 = 3;
/// Lines closer to vertical than this (in x span) are walked along y.
pub const VERTICAL_LINE_LIMIT: i64 = 8;

/// Binary occupancy at world resolution.
///
/// The grid is `(width + 1) x (height + 1)` cells so both far edges are
/// addressable. A ring of [`BORDER_WIDTH`] cells around the edge is kept
/// occupied by every operation that rebuilds or erases the field, which
/// keeps ants inside the arena.
///
/// # Coordinates
///
/// World points map to the nearest cell: `(floor(x + 0.5), floor(y + 0.5))`.
/// Anything that maps outside the grid reads as occupied.
#[derive(Clone, Debug)]
pub struct ObstacleField {
    width: u32,
    height: u32,
    grid_width: usize,
    grid_height: usize,
    cells: FixedBitSet,
}

impl ObstacleField {
    /// Empty arena with the border ring filled in.
    pub fn new(width: u32, height: u32) -> Self {
        let grid_width = width as usize + 1;
        let grid_height = height as usize + 1;
        let mut field = Self {
            width,
            height,
            grid_width,
            grid_height,
            cells: FixedBitSet::with_capacity(grid_width * grid_height),
        };
        field.fill_borders();
        field
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn grid_width(&self) -> usize {
        self.grid_width
    }

    pub fn grid_height(&self) -> usize {
        self.grid_height
    }

    /// Read-only occupancy bits, row-major.
    pub fn cells(&self) -> &FixedBitSet {
        &self.cells
    }

    // ========================================================================
    // Indexing
    // ========================================================================

    fn cell_index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.grid_width || row >= self.grid_height {
            return None;
        }
        Some(row * self.grid_width + col)
    }

    /// Cell index nearest the world point `(x, y)`.
    pub fn index(&self, x: f64, y: f64) -> Option<usize> {
        self.cell_index(round_to_cell(x), round_to_cell(y))
    }

    /// World coordinates of cell `index`.
    pub fn location(&self, index: usize) -> Vector {
        let col = index % self.grid_width;
        let row = index / self.grid_width;
        Vector::planar(col as f64, row as f64)
    }

    /// All occupied cells as world points. Border included.
    pub fn obstacle_locations(&self) -> Vec<Vector> {
        self.cells.ones().map(|i| self.location(i)).collect()
    }

    // ========================================================================
    // Cell Access
    // ========================================================================

    /// Occupancy at the cell nearest `(x, y)`. Off-grid points are occupied.
    pub fn occupied(&self, x: f64, y: f64) -> bool {
        match self.index(x, y) {
            Some(i) => self.cells.contains(i),
            None => true,
        }
    }

    fn is_cell_set(&self, col: i64, row: i64) -> bool {
        match self.cell_index(col, row) {
            Some(i) => self.cells.contains(i),
            None => true,
        }
    }

    fn set_cell(&mut self, col: i64, row: i64, value: bool) {
        let Some(index) = self.cell_index(col, row) else {
            debug_assert!(false, "obstacle cell ({col}, {row}) out of grid");
            return;
        };
        self.cells.set(index, value);
    }

    /// Occupy the single cell at `(x, y)`. Must lie on the grid.
    pub fn add_obstacle(&mut self, x: i32, y: i32) {
        self.set_cell(x as i64, y as i64, true);
    }

    /// Clear the single cell at `(x, y)`. Must lie on the grid.
    pub fn remove_obstacle(&mut self, x: i32, y: i32) {
        self.set_cell(x as i64, y as i64, false);
    }

    // ========================================================================
    // Stamping
    // ========================================================================

    fn in_interior(&self, col: i64, row: i64) -> bool {
        (BORDER_WIDTH..=self.width as i64 - BORDER_WIDTH).contains(&col)
            && (BORDER_WIDTH..=self.height as i64 - BORDER_WIDTH).contains(&row)
    }

    /// Write `value` over a disc, clipped to the interior inside the border.
    ///
    /// The disc covers offsets `dx` in `[-radius, radius)` and every `dy`
    /// with `dx² + dy² < radius²`.
    fn paint_disc(&mut self, cx: i64, cy: i64, radius: i64, value: bool) {
        let r2 = radius * radius;
        for dx in -radius..radius {
            let mut dy = 0;
            while dx * dx + dy * dy < r2 {
                for row in [cy + dy, cy - dy] {
                    let col = cx + dx;
                    if self.in_interior(col, row) {
                        self.set_cell(col, row, value);
                    }
                }
                dy += 1;
            }
        }
    }

    pub fn stamp_circle(&mut self, cx: i32, cy: i32, radius: i32) {
        self.paint_disc(cx as i64, cy as i64, radius as i64, true);
    }

    /// Clear a disc. Never opens the border ring.
    pub fn erase(&mut self, cx: i32, cy: i32, radius: i32) {
        self.paint_disc(cx as i64, cy as i64, radius as i64, false);
    }

    /// Stamp a disc of radius `thickness` at every step of the line.
    pub fn stamp_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) {
        for (cx, cy) in line_walk(x1, y1, x2, y2) {
            self.paint_disc(cx, cy, thickness as i64, true);
        }
    }

    pub fn erase_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) {
        for (cx, cy) in line_walk(x1, y1, x2, y2) {
            self.paint_disc(cx, cy, thickness as i64, false);
        }
    }

    /// Occupy the [`BORDER_WIDTH`]-cell ring on all four edges.
    ///
    /// Arenas narrower than the ring are simply filled.
    pub fn fill_borders(&mut self) {
        let w = self.width as i64;
        let h = self.height as i64;
        let band = BORDER_WIDTH.min(w + 1).min(h + 1);
        for x in 0..=w {
            for i in 0..band {
                self.set_cell(x, i, true);
                self.set_cell(x, h - i, true);
            }
        }
        for y in 0..=h {
            for i in 0..band {
                self.set_cell(i, y, true);
                self.set_cell(w - i, y, true);
            }
        }
    }

    /// Empty the arena, then restore the border.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.fill_borders();
    }

    // ========================================================================
    // Ray Casting
    // ========================================================================

    /// True if any unit step `t` in `0..=range` along `heading` is occupied.
    pub fn ray_blocked(&self, origin: Vector, heading: f64, range: i32) -> bool {
        self.first_hit(origin, heading, range).is_some()
    }

    /// Number of clear unit steps before the first occupied one, or `range`
    /// if the whole ray is clear.
    pub fn ray_clear_distance(&self, origin: Vector, heading: f64, range: i32) -> i32 {
        self.first_hit(origin, heading, range).unwrap_or(range)
    }

    fn first_hit(&self, origin: Vector, heading: f64, range: i32) -> Option<i32> {
        let dir = Vector::from_heading(heading);
        (0..=range).find(|&t| {
            let p = origin + t as f64 * dir;
            self.occupied(p.x, p.y)
        })
    }
}

fn round_to_cell(v: f64) -> i64 {
    (v + 0.5).floor() as i64
}

/// Disc centres along a stroke from `(x1, y1)` to `(x2, y2)`.
///
/// Near-vertical strokes (x span under [`VERTICAL_LINE_LIMIT`]) step along y
/// at `x1`. Everything else steps x by one from the left endpoint to the
/// right endpoint, interpolating y and truncating it to a cell.
pub fn line_walk(x1: i32, y1: i32, x2: i32, y2: i32) -> Vec<(i64, i64)> {
    let (x1, y1, x2, y2) = (x1 as i64, y1 as i64, x2 as i64, y2 as i64);

    if (x2 - x1).abs() < VERTICAL_LINE_LIMIT {
        return (y1.min(y2)..=y1.max(y2)).map(|y| (x1, y)).collect();
    }

    let ((sx, sy), (ex, ey)) = if x1 <= x2 {
        ((x1, y1), (x2, y2))
    } else {
        ((x2, y2), (x1, y1))
    };
    let slope = (ey - sy) as f64 / (ex - sx) as f64;
    (sx..=ex)
        .map(|x| {
            let y = sy as f64 + slope * (x - sx) as f64;
            (x, y as i64)
        })
        .collect()
}
