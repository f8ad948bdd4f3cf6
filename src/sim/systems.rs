use bevy::prelude::*;

use crate::{profile_log, profile_scope};

use super::events::{EditCommand, TickCompleted};
use super::resources::{LastTick, SimSettings, SimTick};
use super::world::AntWorld;

// ============================================================================
// Tick Counter
// ============================================================================

pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

// ============================================================================
// Input
// ============================================================================

/// Apply queued edits in arrival order.
pub fn apply_edit_commands(
    mut commands: MessageReader<EditCommand>,
    world: Option<ResMut<AntWorld>>,
) {
    let Some(mut world) = world else {
        let dropped = commands.read().count();
        if dropped > 0 {
            warn!("Dropped {} edit commands: no AntWorld resource", dropped);
        }
        return;
    };

    for command in commands.read() {
        debug!("Applying {:?}", command);
        command.apply(&mut world);
    }
}

// ============================================================================
// Simulation
// ============================================================================

pub fn run_world_tick(
    world: Option<ResMut<AntWorld>>,
    settings: Res<SimSettings>,
    tick: Res<SimTick>,
    mut last: ResMut<LastTick>,
    mut completed: MessageWriter<TickCompleted>,
) {
    let Some(mut world) = world else {
        return;
    };
    if settings.paused {
        return;
    }

    profile_scope!("run_world_tick", tick.0, 2);
    trace!("sim tick {}", tick.0);
    let report = world.update();
    last.stats = world.stats();
    last.report = report.clone();
    completed.write(TickCompleted { report });

    profile_log!(tick, "[TICK] {} ants, {} food piles", last.stats.ants, last.stats.food_deposits);
}

// ============================================================================
// Reporting
// ============================================================================

pub fn report_world_stats(
    mut completed: MessageReader<TickCompleted>,
    settings: Res<SimSettings>,
    last: Res<LastTick>,
) {
    let mut ticked = false;
    for TickCompleted { report } in completed.read() {
        ticked = true;
        if !report.pickups.is_empty() || !report.drops.is_empty() {
            debug!(
                "tick {}: pickups {:?}, drops {:?}",
                report.tick, report.pickups, report.drops
            );
        }
    }

    let stats = &last.stats;
    if ticked && settings.report_interval > 0 && stats.tick % settings.report_interval == 0 {
        info!(
            "[STATS] tick {} | ants {} ({} carrying) | food piles {} ({} units left) | delivered {}",
            stats.tick,
            stats.ants,
            stats.carrying,
            stats.food_deposits,
            stats.food_remaining,
            stats.food_delivered
        );
    }
}
