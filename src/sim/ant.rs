use rand::Rng;
use std::f64::consts::PI;

use super::colony::Colony;
use super::food::FoodDeposit;
use super::math::{wrap_angle, Vector};
use super::obstacles::ObstacleField;
use super::pheromones::{PheromoneField, Scent};

// ============================================================================
// Steering Constants
// ============================================================================

pub const DEFAULT_SPEED: f64 = 3.0;
/// Total width of the random heading jitter applied each tick.
pub const WANDER_RANGE: f64 = PI / 6.0;
pub const MAX_SCENT_STRENGTH: f64 = 400.0;
/// Scent strength lost per tick.
pub const SCENT_DECAY: f64 = 1.5;
/// Side length of each pheromone sensing sector, in world units.
pub const SMELL_RANGE: usize = 12;
pub const PHEROMONE_TURN_ANGLE: f64 = PI / 8.0;
/// How far ahead an ant sees food, the nest, and walls.
pub const SIGHT_RANGE: i32 = 30;
pub const OBSTACLE_TURN_ANGLE: f64 = PI / 6.0;
/// Required difference between side ray distances before picking a side.
pub const CORNER_TOLERANCE: i32 = 0;
pub const CORNER_ESCAPE_ANGLE: f64 = PI / 4.0;

/// Foraging ants look for food; returning ants carry it home.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AntState {
    Foraging,
    Returning,
}

impl AntState {
    /// Channel this state lays scent into.
    ///
    /// Outbound ants mark the way home; loaded ants mark the way back to
    /// the food they just found.
    pub fn trail(self) -> Scent {
        match self {
            AntState::Foraging => Scent::Home,
            AntState::Returning => Scent::Food,
        }
    }

    /// Channel this state steers by.
    pub fn follows(self) -> Scent {
        match self {
            AntState::Foraging => Scent::Food,
            AntState::Returning => Scent::Home,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ant {
    location: Vector,
    heading: f64,
    speed: f64,
    state: AntState,
    scent_strength: f64,
}

impl Ant {
    pub fn new(location: Vector, heading: f64) -> Self {
        Self::with_speed(location, heading, DEFAULT_SPEED)
    }

    pub fn with_speed(location: Vector, heading: f64, speed: f64) -> Self {
        Self {
            location,
            heading,
            speed,
            state: AntState::Foraging,
            scent_strength: 0.0,
        }
    }

    pub fn location(&self) -> Vector {
        self.location
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn heading_vector(&self) -> Vector {
        Vector::from_heading(self.heading)
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn state(&self) -> AntState {
        self.state
    }

    pub fn carrying_food(&self) -> bool {
        self.state == AntState::Returning
    }

    pub fn scent_strength(&self) -> f64 {
        self.scent_strength
    }

    // ========================================================================
    // Movement
    // ========================================================================

    pub fn move_forward(&mut self) {
        self.location += self.speed * self.heading_vector();
    }

    /// Turn back from any edge the ant is within two steps of.
    ///
    /// Each edge is checked on its own, so a corner can trigger two
    /// reversals and two extra moves in one call.
    pub fn turn_at_boundary(&mut self, width: f64, height: f64) {
        let margin = 2.0 * self.speed;
        if self.location.x > width - margin {
            self.bounce();
        }
        if self.location.x < margin {
            self.bounce();
        }
        if self.location.y < margin {
            self.bounce();
        }
        if self.location.y > height - margin {
            self.bounce();
        }
    }

    fn bounce(&mut self) {
        self.reverse();
        self.move_forward();
    }

    fn reverse(&mut self) {
        self.heading += PI;
    }

    // ========================================================================
    // Steering
    // ========================================================================

    /// One tick of heading updates: wander, follow scent, head for a
    /// visible target, then dodge obstacles. Later steps override earlier
    /// ones.
    pub fn steer<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        pheromones: &PheromoneField,
        obstacles: &ObstacleField,
        food: &[FoodDeposit],
        colony: Option<&Colony>,
    ) {
        self.wander(rng);
        self.follow_pheromones(pheromones);
        self.seek_targets(food, colony);
        self.avoid_obstacles(rng, obstacles);
    }

    pub fn wander<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let offset = rng.random_range(0.0..WANDER_RANGE) - WANDER_RANGE / 2.0;
        self.wander_by(offset);
    }

    /// Apply a wander offset and wrap the heading into `[0, 2π)`.
    pub(crate) fn wander_by(&mut self, offset: f64) {
        self.heading = wrap_angle(self.heading + offset);
    }

    pub(crate) fn follow_pheromones(&mut self, pheromones: &PheromoneField) {
        let sample = pheromones.sample(self.state.follows(), self.location, self.heading, SMELL_RANGE);
        if sample.right > sample.left {
            self.heading += PHEROMONE_TURN_ANGLE;
        } else if sample.left > sample.right {
            self.heading -= PHEROMONE_TURN_ANGLE;
        }
    }

    pub(crate) fn seek_targets(&mut self, food: &[FoodDeposit], colony: Option<&Colony>) {
        match self.state {
            AntState::Returning => {
                if let Some(colony) = colony {
                    self.face_if_visible(colony.location());
                }
            }
            AntState::Foraging => {
                // Every visible deposit re-aims the ant, so the last one wins.
                for deposit in food {
                    self.face_if_visible(deposit.location());
                }
            }
        }
    }

    fn face_if_visible(&mut self, target: Vector) {
        let x = self.location.x.trunc();
        let y = self.location.y.trunc();
        let sight = SIGHT_RANGE as f64;
        if (target.x - x).abs() < sight && (target.y - y).abs() < sight {
            if let Some(bearing) = bearing_to(self.location, target) {
                self.heading = bearing;
            }
        }
    }

    pub(crate) fn avoid_obstacles<R: Rng + ?Sized>(&mut self, rng: &mut R, obstacles: &ObstacleField) {
        if !obstacles.ray_blocked(self.location, self.heading, SIGHT_RANGE) {
            return;
        }

        let right = obstacles.ray_clear_distance(self.location, self.heading + OBSTACLE_TURN_ANGLE, SIGHT_RANGE);
        let left = obstacles.ray_clear_distance(self.location, self.heading - OBSTACLE_TURN_ANGLE, SIGHT_RANGE);

        if right < left - CORNER_TOLERANCE {
            self.heading -= OBSTACLE_TURN_ANGLE;
        } else if left < right - CORNER_TOLERANCE {
            self.heading += OBSTACLE_TURN_ANGLE;
        } else if right > SIGHT_RANGE - 1 && left > SIGHT_RANGE - 1 {
            // Both sides open: the blocker is a thin spike dead ahead.
            if rng.random_bool(0.5) {
                self.heading += CORNER_ESCAPE_ANGLE;
            } else {
                self.heading -= CORNER_ESCAPE_ANGLE;
            }
        } else {
            self.reverse();
        }
    }

    // ========================================================================
    // Food & Scent
    // ========================================================================

    /// Foraging -> Returning. Turns around and refreshes scent.
    pub fn pick_up_food(&mut self) {
        self.state = AntState::Returning;
        self.reverse();
        self.reset_scent();
    }

    /// Returning -> Foraging. Turns around and refreshes scent.
    pub fn drop_food(&mut self) {
        self.state = AntState::Foraging;
        self.reverse();
        self.reset_scent();
    }

    pub fn diminish_scent(&mut self) {
        self.scent_strength = (self.scent_strength - SCENT_DECAY).max(0.0);
    }

    pub fn reset_scent(&mut self) {
        self.scent_strength = MAX_SCENT_STRENGTH;
    }
}

/// Heading that points from `from` toward `to`.
///
/// Returns `None` when the points coincide, since no direction exists.
pub fn bearing_to(from: Vector, to: Vector) -> Option<f64> {
    let d = from - to;
    if d.x == 0.0 && d.y == 0.0 {
        return None;
    }
    let angle = (d.y / d.x).atan();
    Some(if d.x >= 0.0 { angle + PI } else { angle })
}

#[cfg(test)]
#[path = "ant_tests.rs"]
mod tests;
