//! Edit commands and tick notifications.
//!
//! Editors and scripted drivers never touch [`AntWorld`] directly while the
//! app is running. They write [`EditCommand`]s, which are applied in
//! `SimSet::Input` before the next tick.

use bevy::prelude::*;

use super::math::Vector;
use super::world::{AntWorld, TickReport};

// ============================================================================
// Edit Commands
// ============================================================================

/// One mutation of the world, mirroring the [`AntWorld`] editing API.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// `heading: None` draws a random heading from the world RNG.
    AddAnt { location: Vector, heading: Option<f64> },
    AddFood { x: i32, y: i32, quantity: i32 },
    AddColony { x: i32, y: i32 },
    AddObstacle { x: i32, y: i32, radius: i32 },
    AddObstacleLine { x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32 },
    GenerateCaves,
    Erase { x: i32, y: i32, radius: i32 },
    EraseLine { x1: i32, y1: i32, x2: i32, y2: i32, thickness: i32 },
    ClearAll,
}

impl EditCommand {
    pub fn apply(&self, world: &mut AntWorld) {
        match *self {
            EditCommand::AddAnt { location, heading: Some(heading) } => world.add_ant(location, heading),
            EditCommand::AddAnt { location, heading: None } => world.add_ant_random_heading(location),
            EditCommand::AddFood { x, y, quantity } => {
                world.add_food(x, y, quantity);
            }
            EditCommand::AddColony { x, y } => world.add_colony(x, y),
            EditCommand::AddObstacle { x, y, radius } => world.add_obstacle(x, y, radius),
            EditCommand::AddObstacleLine { x1, y1, x2, y2, thickness } => {
                world.add_obstacle_line(x1, y1, x2, y2, thickness)
            }
            EditCommand::GenerateCaves => world.generate_caves(),
            EditCommand::Erase { x, y, radius } => world.erase(x, y, radius),
            EditCommand::EraseLine { x1, y1, x2, y2, thickness } => {
                world.erase_line(x1, y1, x2, y2, thickness)
            }
            EditCommand::ClearAll => world.clear_all(),
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

/// Written once per simulated tick.
#[derive(Message, Debug, Clone)]
pub struct TickCompleted {
    pub report: TickReport,
}
