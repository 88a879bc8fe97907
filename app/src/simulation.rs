//! Scripted cold start.
//!
//! Each UI callback of a real launch (page creation, layout passes of the
//! title and loading indicator, list viewport updates) runs as its own task
//! and reports through the shared producers without any coordination.

use serde::{Deserialize, Serialize};
use startup::{Rect, StartupInstrumentation};
use std::time::Duration;
use tokio::task::JoinSet;

/// When each callback fires, in milliseconds after bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Timeline {
    /// Splash animation length before the main page is created
    pub splash_ms: u64,
    /// Layout passes of the page title, with its bounds
    pub header_layouts: Vec<(u64, Rect)>,
    /// Layout passes of the loading indicator, with its bounds
    pub loader_layouts: Vec<(u64, Rect)>,
    /// List viewport updates, with the visible item indices
    pub list_updates: Vec<(u64, Vec<usize>)>,
    /// The window bounds
    pub viewport: Rect,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            splash_ms: 450,
            header_layouts: vec![
                (470, Rect::from_origin(48.0, -24.0, 600.0, 80.0)),
                (520, Rect::from_origin(48.0, 72.0, 600.0, 80.0)),
            ],
            loader_layouts: vec![(490, Rect::from_origin(500.0, 1160.0, 80.0, 80.0))],
            list_updates: vec![(900, Vec::new()), (1250, vec![0, 1, 2, 3])],
            viewport: Rect::from_origin(0.0, 0.0, 1080.0, 2400.0),
        }
    }
}

/// Run the timeline to completion.
pub async fn run(startup: &StartupInstrumentation, timeline: &Timeline) -> anyhow::Result<()> {
    let mut tasks = JoinSet::new();

    let page = startup.clone();
    let splash_ms = timeline.splash_ms;
    tasks.spawn(async move {
        tokio::time::sleep(Duration::from_millis(splash_ms)).await;
        page.page_created();
    });

    for (at_ms, bounds) in timeline.header_layouts.iter().cloned() {
        let header = startup.header.clone();
        let viewport = timeline.viewport;
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(at_ms)).await;
            header.on_layout(&bounds, &viewport);
        });
    }

    for (at_ms, bounds) in timeline.loader_layouts.iter().cloned() {
        let loader = startup.loader.clone();
        let viewport = timeline.viewport;
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(at_ms)).await;
            loader.on_layout(&bounds, &viewport);
        });
    }

    for (at_ms, visible) in timeline.list_updates.iter().cloned() {
        let list = startup.list.clone();
        tasks.spawn(async move {
            tokio::time::sleep(Duration::from_millis(at_ms)).await;
            list.on_visible_items(&visible);
        });
    }

    while let Some(result) = tasks.join_next().await {
        result?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AppState, TokioClock};
    use startup::StartupConfig;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_default_timeline() {
        let state = AppState::with_config(StartupConfig::default(), Arc::new(TokioClock::new())).unwrap();
        state.startup.begin();

        run(&state.startup, &Timeline::default()).await.unwrap();

        let traces = &state.startup.traces;
        assert!(traces.is_complete());
        assert_eq!(traces.page_render.duration(), 450);
        // The title is clipped at 470, the loader wins at 490.
        assert_eq!(traces.fcp.duration(), 490);
        assert_eq!(traces.fpt.duration(), 1250);
        assert!(state.startup.reporter.budget_report().passes());
    }

    #[tokio::test(start_paused = true)]
    async fn test_incomplete_timeline_leaves_trace_running() {
        let state = AppState::with_config(StartupConfig::default(), Arc::new(TokioClock::new())).unwrap();
        state.startup.begin();

        let timeline = Timeline {
            list_updates: vec![(300, Vec::new())],
            ..Timeline::default()
        };
        run(&state.startup, &timeline).await.unwrap();

        assert!(!state.startup.traces.fpt.is_stopped());
        assert!(state.startup.traces.fpt.try_duration().is_err());
        let snapshot = &state.snapshots()[2];
        assert_eq!(snapshot.duration_ms, None);
    }

    #[test]
    fn test_timeline_from_json() {
        let timeline: Timeline = serde_json::from_str(r#"{"splashMs": 10}"#).unwrap();
        assert_eq!(timeline.splash_ms, 10);
        assert_eq!(timeline.list_updates.len(), 2);
    }
}
