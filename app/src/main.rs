//! Fast Splash - cold start paint measurement
//!
//! Boots the instrumentation, replays a launch timeline and prints the
//! measured traces.
//!
//! Usage: `fast-splash [startup-config.json] [timeline.json]`

mod simulation;
mod state;

use simulation::Timeline;
use state::{AppState, TokioClock};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let timeline_path = args.next().map(PathBuf::from);

    // The clock starts here, the earliest point this process controls.
    let state = AppState::load(config_path.as_deref(), Arc::new(TokioClock::new()))?;
    state.startup.begin();
    tracing::info!("Starting Fast Splash");
    tracing::debug!("Startup config: {:?}", state.config);

    let timeline = match timeline_path {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => Timeline::default(),
    };

    simulation::run(&state.startup, &timeline).await?;

    for snapshot in state.snapshots() {
        match snapshot.duration_ms {
            Some(ms) => tracing::info!("{}: {}ms", snapshot.name, ms),
            None => tracing::warn!("{}: did not complete", snapshot.name),
        }
    }

    let report = state.startup.reporter.budget_report();
    if report.has_violations() {
        tracing::warn!("{}", report);
    }

    let summary = state
        .startup
        .metrics
        .metrics()
        .lock()
        .map_err(|_| anyhow::anyhow!("metrics lock poisoned"))?
        .summary();
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
