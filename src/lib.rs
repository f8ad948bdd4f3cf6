pub mod sim;

// ============================================================================
// Profiling
// ============================================================================

/// Log a message every 100 ticks when the `perf_stats` feature is enabled.
///
/// Without the feature this expands to nothing and the arguments are never
/// evaluated.
///
/// # Example
/// ```ignore
/// profile_log!(tick, "{} ants alive", world.ants().len());
/// ```
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {
        if $tick.0 % 100 == 0 {
            bevy::prelude::info!($($arg)*);
        }
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_log {
    ($tick:expr, $($arg:tt)*) => {};
}

/// Times the enclosing scope and logs on drop when it ran longer than
/// `threshold_ms`, or on every 100th tick.
#[cfg(feature = "perf_stats")]
pub struct ScopeTimer {
    name: &'static str,
    start: std::time::Instant,
    tick: u64,
    threshold_ms: u128,
}

#[cfg(feature = "perf_stats")]
impl ScopeTimer {
    pub fn start(name: &'static str, tick: u64, threshold_ms: u128) -> Self {
        Self {
            name,
            start: std::time::Instant::now(),
            tick,
            threshold_ms,
        }
    }
}

#[cfg(feature = "perf_stats")]
impl Drop for ScopeTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        if elapsed.as_millis() > self.threshold_ms || self.tick % 100 == 0 {
            bevy::prelude::info!("[PERF] {}: {:?}", self.name, elapsed);
        }
    }
}

/// Bind a [`ScopeTimer`] for the rest of the current block.
///
/// Compiles to nothing without `perf_stats`.
#[macro_export]
#[cfg(feature = "perf_stats")]
macro_rules! profile_scope {
    ($name:expr, $tick:expr, $threshold_ms:expr) => {
        let _scope_timer = $crate::ScopeTimer::start($name, $tick, $threshold_ms);
    };
}

#[macro_export]
#[cfg(not(feature = "perf_stats"))]
macro_rules! profile_scope {
    ($name:expr, $tick:expr, $threshold_ms:expr) => {};
}
