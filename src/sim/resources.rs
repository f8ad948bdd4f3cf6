use bevy::prelude::*;

use super::world::{TickReport, WorldStats};

/// Fixed-update tick counter. Incremented before any other simulation
/// system runs, so the first simulated tick sees `1`.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

/// Runtime knobs for the app layer. Behaviour constants live with the
/// simulation code and are not configurable.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SimSettings {
    /// Log a [`WorldStats`] line every this many ticks. Zero disables.
    pub report_interval: u64,
    /// Skip ticking while set. Edits are still applied.
    pub paused: bool,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            report_interval: 100,
            paused: false,
        }
    }
}

/// Latest tick results, for presentation layers that poll instead of
/// reading messages.
#[derive(Resource, Default, Debug, Clone)]
pub struct LastTick {
    pub report: TickReport,
    pub stats: WorldStats,
}
