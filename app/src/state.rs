//! Application state management

use perftrace::{Clock, TraceSnapshot};
use startup::{StartupConfig, StartupInstrumentation};
use std::path::Path;
use std::sync::Arc;

/// Clock backed by tokio's time driver, so paused test runtimes control it.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_millis(&self) -> i64 {
        i64::try_from(self.origin.elapsed().as_millis()).unwrap_or(i64::MAX)
    }
}

/// Process-wide state, owned by `main` and passed down explicitly.
pub struct AppState {
    pub config: StartupConfig,
    pub startup: StartupInstrumentation,
}

impl AppState {
    /// Build state from a config file, falling back to defaults.
    pub fn load(config_path: Option<&Path>, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => StartupConfig::load_or_default(path),
            None => StartupConfig::default(),
        };
        Self::with_config(config, clock)
    }

    pub fn with_config(config: StartupConfig, clock: Arc<dyn Clock>) -> anyhow::Result<Self> {
        let startup = StartupInstrumentation::with_clock(&config, clock)?;
        Ok(Self { config, startup })
    }

    /// Final state of every startup trace.
    pub fn snapshots(&self) -> Vec<TraceSnapshot> {
        self.startup.traces.snapshots()
    }
}
