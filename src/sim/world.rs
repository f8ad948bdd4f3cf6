use bevy::log::{debug, info, trace};
use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use smallvec::SmallVec;
use std::f64::consts::TAU;

use super::ant::Ant;
use super::colony::Colony;
use super::food::FoodDeposit;
use super::math::{wrap_angle, Vector};
use super::obstacles::{line_walk, ObstacleField};
use super::pheromones::PheromoneField;

// ============================================================================
// World Constants
// ============================================================================

/// World units per pheromone cell.
pub const PHEROMONE_SCALE: u32 = 1;
/// Ants spawned when a colony is placed.
pub const DEFAULT_COLONY_SIZE: usize = 300;
/// Half-width of the square each ant scents per tick.
pub const SCENT_SPREAD: i64 = 3;
/// Per-axis distance at which food is picked up or dropped at the nest.
pub const FOOD_REACH: f64 = 5.0;
/// Foragers this close to the nest (per axis) get full scent back.
pub const SCENT_RESET_DISTANCE: f64 = 8.0;
/// Food must be placed at least this far inside the far edges.
pub const FOOD_BORDER_MARGIN: i32 = 5;

/// What happened during one [`AntWorld::update`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TickReport {
    /// Tick number this report covers, counted from zero.
    pub tick: u64,
    /// Indices of ants that picked up food.
    pub pickups: SmallVec<[usize; 8]>,
    /// Indices of ants that delivered food to the colony.
    pub drops: SmallVec<[usize; 8]>,
}

/// Snapshot of population counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WorldStats {
    pub tick: u64,
    pub ants: usize,
    pub carrying: usize,
    pub food_deposits: usize,
    pub food_remaining: i64,
    pub food_delivered: u64,
}

/// The whole simulation: arena, ants, food, nest, both fields, and the RNG
/// every random decision draws from.
///
/// All mutation goes through the methods here. Read access hands out
/// slices and references, never copies of the grids.
#[derive(Resource)]
pub struct AntWorld {
    width: u32,
    height: u32,
    ants: Vec<Ant>,
    food: Vec<FoodDeposit>,
    colony: Option<Colony>,
    pheromones: PheromoneField,
    obstacles: ObstacleField,
    rng: StdRng,
    tick: u64,
    food_delivered: u64,
}

impl AntWorld {
    /// Empty bordered arena seeded from the OS.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_rng(width, height, StdRng::from_os_rng())
    }

    /// Empty bordered arena with a fixed seed. Same seed and same edits
    /// replay the same run.
    pub fn with_seed(width: u32, height: u32, seed: u64) -> Self {
        Self::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width: u32, height: u32, rng: StdRng) -> Self {
        Self {
            width,
            height,
            ants: Vec::new(),
            food: Vec::new(),
            colony: None,
            pheromones: PheromoneField::new(width, height, PHEROMONE_SCALE),
            obstacles: ObstacleField::new(width, height),
            rng,
            tick: 0,
            food_delivered: 0,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn ants(&self) -> &[Ant] {
        &self.ants
    }

    pub fn food(&self) -> &[FoodDeposit] {
        &self.food
    }

    pub fn colony(&self) -> Option<&Colony> {
        self.colony.as_ref()
    }

    pub fn has_colony(&self) -> bool {
        self.colony.is_some()
    }

    pub fn pheromones(&self) -> &PheromoneField {
        &self.pheromones
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }

    pub fn grid_scale(&self) -> u32 {
        self.pheromones.scale()
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Food units delivered to the colony since construction.
    pub fn food_delivered(&self) -> u64 {
        self.food_delivered
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            tick: self.tick,
            ants: self.ants.len(),
            carrying: self.ants.iter().filter(|a| a.carrying_food()).count(),
            food_deposits: self.food.len(),
            food_remaining: self.food.iter().map(|f| f.quantity() as i64).sum(),
            food_delivered: self.food_delivered,
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    pub fn add_ant(&mut self, location: Vector, heading: f64) {
        self.ants.push(Ant::new(location, heading));
    }

    pub fn add_ant_random_heading(&mut self, location: Vector) {
        let heading = self.rng.random_range(0.0..TAU);
        self.add_ant(location, heading);
    }

    /// Place a food pile. Returns false (and places nothing) when the point
    /// is on the near edge or within [`FOOD_BORDER_MARGIN`] of the far edge.
    pub fn add_food(&mut self, x: i32, y: i32, quantity: i32) -> bool {
        let w = self.width as i32;
        let h = self.height as i32;
        if x > 0 && x < w - FOOD_BORDER_MARGIN && y > 0 && y < h - FOOD_BORDER_MARGIN {
            self.food.push(FoodDeposit::new(x as f64, y as f64, quantity));
            true
        } else {
            debug!("Rejected food at ({}, {}): too close to the border", x, y);
            false
        }
    }

    /// Place the nest, replacing any previous one, and spawn a batch of
    /// [`DEFAULT_COLONY_SIZE`] ants on it.
    pub fn add_colony(&mut self, x: i32, y: i32) {
        let colony = Colony::new(x as f64, y as f64);
        if self.colony.is_some() {
            debug!("Replacing existing colony");
        }
        self.colony = Some(colony);
        for i in 0..DEFAULT_COLONY_SIZE {
            self.add_ant(colony.location(), wrap_angle(i as f64));
        }
        info!(
            "Colony placed at ({}, {}) with {} ants ({} total)",
            x,
            y,
            DEFAULT_COLONY_SIZE,
            self.ants.len()
        );
    }

    pub fn add_obstacle(&mut self, x: i32, y: i32, radius: i32) {
        self.obstacles.stamp_circle(x, y, radius);
    }

    pub fn add_obstacle_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) {
        self.obstacles.stamp_line(x1, y1, x2, y2, thickness);
    }

    pub fn generate_caves(&mut self) {
        let start = std::time::Instant::now();
        self.obstacles.generate_caves(&mut self.rng);
        info!("Generated caves in {:?}", start.elapsed());
    }

    /// Clear obstacles and remove ants and food strictly within `radius`.
    pub fn erase(&mut self, x: i32, y: i32, radius: i32) {
        self.obstacles.erase(x, y, radius);

        let center = Vector::planar(x as f64, y as f64);
        let r = radius as f64;
        let (ants_before, food_before) = (self.ants.len(), self.food.len());
        self.ants.retain(|a| a.location().distance(center) >= r);
        self.food.retain(|f| f.location().distance(center) >= r);

        let removed_ants = ants_before - self.ants.len();
        let removed_food = food_before - self.food.len();
        if removed_ants > 0 || removed_food > 0 {
            debug!(
                "Erased {} ants and {} food at ({}, {}) r={}",
                removed_ants, removed_food, x, y, radius
            );
        }
    }

    /// [`erase`](Self::erase) at every step of the same stroke
    /// [`ObstacleField::stamp_line`] walks.
    pub fn erase_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32) {
        for (cx, cy) in line_walk(x1, y1, x2, y2) {
            self.erase(cx as i32, cy as i32, thickness);
        }
    }

    /// Remove everything: ants, food, nest, scent, and obstacles. The border
    /// is restored.
    pub fn clear_all(&mut self) {
        self.ants.clear();
        self.food.clear();
        self.pheromones.clear();
        self.obstacles.clear();
        self.colony = None;
        info!("World cleared");
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Advance the simulation by one tick.
    ///
    /// Phases run in a fixed order: move, steer, deposit, decay, pickup,
    /// drop, diminish, refresh. Each phase finishes for every ant before
    /// the next starts.
    pub fn update(&mut self) -> TickReport {
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        self.move_ants();
        self.steer_ants();
        self.deposit_scent();
        self.pheromones.decay_all();
        self.collect_food(&mut report);
        self.drop_food(&mut report);
        for ant in &mut self.ants {
            ant.diminish_scent();
        }
        self.refresh_scent_at_colony();

        self.tick += 1;
        trace!(
            "tick {}: {} pickups, {} drops",
            report.tick,
            report.pickups.len(),
            report.drops.len()
        );
        report
    }

    fn move_ants(&mut self) {
        let (w, h) = (self.width as f64, self.height as f64);
        for ant in &mut self.ants {
            ant.move_forward();
            ant.turn_at_boundary(w, h);
        }
    }

    fn steer_ants(&mut self) {
        for ant in &mut self.ants {
            ant.steer(
                &mut self.rng,
                &self.pheromones,
                &self.obstacles,
                &self.food,
                self.colony.as_ref(),
            );
        }
    }

    fn deposit_scent(&mut self) {
        for ant in &self.ants {
            let location = ant.location();
            self.pheromones.spread(
                ant.state().trail(),
                location.x as i64,
                location.y as i64,
                ant.scent_strength() as u32,
                SCENT_SPREAD,
            );
        }
    }

    fn collect_food(&mut self, report: &mut TickReport) {
        for (i, ant) in self.ants.iter_mut().enumerate() {
            if ant.carrying_food() {
                continue;
            }
            let location = ant.location();
            let target = self
                .food
                .iter_mut()
                .find(|f| !f.is_depleted() && f.within_reach(location, FOOD_REACH));
            if let Some(deposit) = target {
                deposit.take_one();
                ant.pick_up_food();
                report.pickups.push(i);
            }
        }
        self.food.retain(|f| !f.is_depleted());
    }

    fn drop_food(&mut self, report: &mut TickReport) {
        let Some(colony) = self.colony else {
            return;
        };
        for (i, ant) in self.ants.iter_mut().enumerate() {
            if ant.carrying_food() && colony.within_reach(ant.location(), FOOD_REACH) {
                ant.drop_food();
                self.food_delivered += 1;
                report.drops.push(i);
            }
        }
    }

    fn refresh_scent_at_colony(&mut self) {
        let Some(colony) = self.colony else {
            return;
        };
        for ant in &mut self.ants {
            if !ant.carrying_food() && colony.within_reach(ant.location(), SCENT_RESET_DISTANCE) {
                ant.reset_scent();
            }
        }
    }
}

#[cfg(test)]
#[path = "world_tests.rs"]
mod tests;
