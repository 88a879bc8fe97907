//! Wiring of traces, sinks and producers for one process.

use crate::config::StartupConfig;
use crate::error::ConfigResult;
use crate::signal::{PaintReporter, PaintSignal};
use crate::traces::StartupTraces;
use crate::visibility::{ListViewportTracker, VisibilityTracker};
use perftrace::{Clock, FanoutSink, LogSink, MetricsSink, SystemClock, TraceMetrics};
use std::sync::{Arc, Mutex};

/// Everything a cold start needs, built once by the process root.
///
/// The root keeps this value and passes its parts to the components that
/// need them; nothing here is reachable through a global.
#[derive(Debug, Clone)]
pub struct StartupInstrumentation {
    /// The traces being measured
    pub traces: StartupTraces,
    /// Shared stop entry point
    pub reporter: Arc<PaintReporter>,
    /// Collector every finished trace is recorded into
    pub metrics: MetricsSink,
    /// First contentful paint producer for the page title
    pub header: VisibilityTracker,
    /// First contentful paint producer for the loading indicator
    pub loader: VisibilityTracker,
    /// Full paint producer for the content list
    pub list: ListViewportTracker,
}

impl StartupInstrumentation {
    /// Build on the system clock.
    pub fn new(config: &StartupConfig) -> ConfigResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build with all traces reading `clock`.
    pub fn with_clock(config: &StartupConfig, clock: Arc<dyn Clock>) -> ConfigResult<Self> {
        config.validate()?;

        let traces = StartupTraces::with_clock(clock);
        let metrics = MetricsSink::with_metrics(Arc::new(Mutex::new(
            TraceMetrics::new().with_max_samples(config.max_samples),
        )));

        let mut sink = FanoutSink::new().with(metrics.clone());
        if config.log_to_tracing {
            sink = sink.with(LogSink);
        }

        let reporter = Arc::new(PaintReporter::with_budget(
            traces.clone(),
            Arc::new(sink),
            config.budget.clone(),
        ));

        Ok(Self {
            header: VisibilityTracker::with_threshold(
                PaintSignal::FirstContentfulPaint,
                config.header_visibility_threshold,
                Arc::clone(&reporter),
            )?,
            loader: VisibilityTracker::with_threshold(
                PaintSignal::FirstContentfulPaint,
                config.loader_visibility_threshold,
                Arc::clone(&reporter),
            )?,
            list: ListViewportTracker::new(Arc::clone(&reporter)),
            traces,
            reporter,
            metrics,
        })
    }

    /// Start every trace.
    pub fn begin(&self) {
        self.traces.begin();
    }

    /// Lifecycle hook for the main page being created.
    pub fn page_created(&self) -> Option<i64> {
        self.reporter.report(PaintSignal::PageReady)
    }
}
