//! Run configuration for the headless driver.
//!
//! Describes the arena and the starting layout. Steering and field
//! tuning constants are compiled in and deliberately absent here.

use bevy::log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::world::AntWorld;

pub const DEFAULT_CONFIG_PATH: &str = "assets/run_config.ron";
/// Smallest arena that leaves room inside the border and boundary margins.
pub const MIN_ARENA_SIZE: u32 = 32;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "could not read config: {}", e),
            ConfigError::Parse(e) => write!(f, "could not parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(e: ron::error::SpannedError) -> Self {
        ConfigError::Parse(e)
    }
}

// ============================================================================
// Config
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodSpec {
    pub x: i32,
    pub y: i32,
    pub quantity: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub width: u32,
    pub height: u32,
    /// `None` seeds from the OS, so runs are not reproducible.
    pub seed: Option<u64>,
    /// Simulation ticks per second.
    pub tick_rate: f64,
    /// Stop after this many ticks. Zero runs until killed.
    pub max_ticks: u64,
    pub report_interval: u64,
    pub colony: Option<(i32, i32)>,
    pub food: Vec<FoodSpec>,
    pub generate_caves: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            seed: Some(42),
            tick_rate: 20.0,
            max_ticks: 2000,
            report_interval: 100,
            colony: Some((400, 300)),
            food: vec![
                FoodSpec { x: 600, y: 180, quantity: 50 },
                FoodSpec { x: 220, y: 450, quantity: 50 },
            ],
            generate_caves: false,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_ARENA_SIZE || self.height < MIN_ARENA_SIZE {
            return Err(ConfigError::Invalid(format!(
                "arena {}x{} is smaller than {}x{}",
                self.width, self.height, MIN_ARENA_SIZE, MIN_ARENA_SIZE
            )));
        }
        if !(self.tick_rate > 0.0 && self.tick_rate.is_finite()) {
            return Err(ConfigError::Invalid(format!("tick_rate must be positive, got {}", self.tick_rate)));
        }
        let inside = |x: i32, y: i32| x >= 0 && y >= 0 && x <= self.width as i32 && y <= self.height as i32;
        if let Some((x, y)) = self.colony {
            if !inside(x, y) {
                return Err(ConfigError::Invalid(format!("colony ({}, {}) is outside the arena", x, y)));
            }
        }
        for spec in &self.food {
            if !inside(spec.x, spec.y) {
                return Err(ConfigError::Invalid(format!(
                    "food ({}, {}) is outside the arena",
                    spec.x, spec.y
                )));
            }
        }
        Ok(())
    }

    /// Build a world with this layout applied.
    ///
    /// Caves are generated first so the colony and food land on top of them.
    pub fn build_world(&self) -> AntWorld {
        let mut world = match self.seed {
            Some(seed) => AntWorld::with_seed(self.width, self.height, seed),
            None => AntWorld::new(self.width, self.height),
        };
        if self.generate_caves {
            world.generate_caves();
        }
        if let Some((x, y)) = self.colony {
            world.add_colony(x, y);
        }
        for spec in &self.food {
            if !world.add_food(spec.x, spec.y, spec.quantity) {
                warn!("Food at ({}, {}) is too close to the border, skipped", spec.x, spec.y);
            }
        }
        world
    }
}

pub fn parse_run_config(text: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig = ron::from_str(text)?;
    config.validate()?;
    Ok(config)
}

pub fn load_run_config(path: impl AsRef<Path>) -> Result<RunConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    parse_run_config(&text)
}

/// Load `path`, falling back to [`RunConfig::default`] on any error.
pub fn load_run_config_or_default(path: impl AsRef<Path>) -> RunConfig {
    let path = path.as_ref();
    match load_run_config(path) {
        Ok(config) => {
            info!("Loaded run config from {}", path.display());
            config
        }
        Err(e) => {
            error!("Failed to load {}: {}", path.display(), e);
            error!("Using default RunConfig");
            RunConfig::default()
        }
    }
}
