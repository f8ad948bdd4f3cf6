use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

use formica::sim::config::{load_run_config_or_default, DEFAULT_CONFIG_PATH};
use formica::sim::{SimSet, SimTick, SimulationPlugin};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_PREFIX: &str = "formica";
const LOGS_TO_KEEP: usize = 25;

/// Stop the app once this many ticks have run. Zero never stops.
#[derive(Resource)]
struct TickLimit(u64);

fn setup_file_logging() -> Option<String> {
    let log_dir = PathBuf::from("logs");
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!("Could not create {}: {}. Logging to stdout only.", log_dir.display(), e);
        init_subscriber(None);
        return None;
    }

    cleanup_old_logs(&log_dir, LOGS_TO_KEEP);

    let now = chrono::Local::now();
    let log_filename = format!("{}_{}.log", LOG_PREFIX, now.format("%Y%m%d_%H%M%S"));
    let log_path = log_dir.join(&log_filename).to_string_lossy().to_string();

    // One file per run
    let file_appender = RollingFileAppender::new(Rotation::NEVER, &log_dir, &log_filename);
    init_subscriber(Some(file_appender));

    Some(log_path)
}

fn init_subscriber(file_appender: Option<RollingFileAppender>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bevy_ecs=info,bevy_app=info,formica=info"));

    let file_layer = file_appender.map(|appender| {
        fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
    });

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();
}

fn cleanup_old_logs(log_dir: &Path, keep_count: usize) {
    let Ok(entries) = fs::read_dir(log_dir) else {
        return;
    };
    let mut log_files: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path()
                .file_name()
                .and_then(|n| n.to_str())
                .map(|s| s.starts_with(LOG_PREFIX) && s.ends_with(".log"))
                .unwrap_or(false)
        })
        .collect();

    // Oldest first
    log_files.sort_by_key(|e| e.metadata().ok().and_then(|m| m.modified().ok()));

    if log_files.len() > keep_count {
        for file in log_files.iter().take(log_files.len() - keep_count) {
            let _ = fs::remove_file(file.path());
        }
    }
}

fn stop_at_tick_limit(tick: Res<SimTick>, limit: Res<TickLimit>, mut exit: MessageWriter<AppExit>) {
    if limit.0 > 0 && tick.0 >= limit.0 {
        info!("Reached tick limit {}, exiting", limit.0);
        exit.write(AppExit::Success);
    }
}

fn main() {
    let log_file = setup_file_logging();

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║  Formica - ant colony simulation                         ║");
    println!("╠══════════════════════════════════════════════════════════╣");
    match &log_file {
        Some(path) => println!("║  Log file: {:<46}║", path),
        None => println!("║  Log file: {:<46}║", "(none)"),
    }
    println!("╚══════════════════════════════════════════════════════════╝");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = load_run_config_or_default(&config_path);
    info!(
        "Arena {}x{}, seed {:?}, {} ticks/s, limit {}",
        config.width, config.height, config.seed, config.tick_rate, config.max_ticks
    );

    let world = config.build_world();

    App::new()
        // Spin the outer loop faster than the fixed step so no ticks are lost
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / (config.tick_rate * 2.0),
        ))))
        .add_plugins(SimulationPlugin {
            tick_rate: config.tick_rate,
            report_interval: config.report_interval,
        })
        .insert_resource(world)
        .insert_resource(TickLimit(config.max_ticks))
        .add_systems(FixedUpdate, stop_at_tick_limit.after(SimSet::Report))
        .run();
}
