//! Ant colony simulation.
//!
//! This module is organized into:
//! - **math**: `Vector` and angle helpers
//! - **colony** / **food**: nest and food piles
//! - **pheromones**: the two decaying scent channels
//! - **obstacles**: occupancy grid, stamping, cave generation, ray casts
//! - **ant**: per-ant state and the steering pipeline
//! - **world**: `AntWorld`, the tick, and the editing API
//! - **resources** / **events** / **systems**: bevy app wiring
//! - **config**: run configuration for the headless driver

use bevy::prelude::*;

pub mod ant;
pub mod colony;
pub mod config;
pub mod events;
pub mod food;
pub mod math;
pub mod obstacles;
pub mod pheromones;
pub mod resources;
pub mod systems;
pub mod world;

pub use ant::{Ant, AntState};
pub use colony::Colony;
pub use events::{EditCommand, TickCompleted};
pub use food::FoodDeposit;
pub use math::Vector;
pub use obstacles::ObstacleField;
pub use pheromones::{PheromoneField, Scent, SectorSample};
pub use resources::{LastTick, SimSettings, SimTick};
pub use world::{AntWorld, TickReport, WorldStats};

/// Ordering of the fixed-update systems.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Input,  // Applying edit commands
    Tick,   // Advancing the world one step
    Report, // Logging and notifications
}

/// Runs an [`AntWorld`] resource on the fixed timestep.
///
/// The host inserts the `AntWorld` itself so it controls the arena size
/// and seed. Without one, edits are dropped with a warning and ticks are
/// skipped.
pub struct SimulationPlugin {
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// See [`SimSettings::report_interval`].
    pub report_interval: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            tick_rate: 20.0,
            report_interval: 100,
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(self.tick_rate));

        app.init_resource::<SimTick>();
        app.init_resource::<LastTick>();
        app.insert_resource(SimSettings {
            report_interval: self.report_interval,
            ..default()
        });

        app.add_message::<EditCommand>();
        app.add_message::<TickCompleted>();

        app.configure_sets(FixedUpdate, (SimSet::Input, SimSet::Tick, SimSet::Report).chain());

        app.add_systems(FixedUpdate, (
            // Tick counter first so every system in this step sees the same value
            systems::increment_sim_tick.before(SimSet::Input),
            systems::apply_edit_commands.in_set(SimSet::Input),
            systems::run_world_tick.in_set(SimSet::Tick),
            systems::report_world_stats.in_set(SimSet::Report),
        ));
    }
}
