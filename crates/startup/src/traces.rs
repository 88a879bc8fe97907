//! The set of traces measured during a cold start.

use crate::signal::PaintSignal;
use perftrace::{Clock, SystemClock, Trace, TraceSnapshot};
use std::sync::Arc;

/// The cold-start traces of one process.
///
/// Built once by the process bootstrap and handed by value (it is cheap to
/// clone) to every component that reports or reads them.
#[derive(Debug, Clone)]
pub struct StartupTraces {
    /// Process start to first contentful paint
    pub fcp: Arc<Trace>,
    /// Process start to the main page being created
    pub page_render: Arc<Trace>,
    /// Process start to the content list being painted
    pub fpt: Arc<Trace>,
}

impl StartupTraces {
    /// Name of the first contentful paint trace.
    pub const FCP: &'static str = "FCP";
    /// Name of the page ready trace.
    pub const PAGE_RENDER: &'static str = "RenderTrace";
    /// Name of the full paint trace.
    pub const FPT: &'static str = "FPT";

    /// Create un-started traces on the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create un-started traces sharing `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            fcp: Arc::new(Trace::with_clock(Self::FCP, Arc::clone(&clock))),
            page_render: Arc::new(Trace::with_clock(Self::PAGE_RENDER, Arc::clone(&clock))),
            fpt: Arc::new(Trace::with_clock(Self::FPT, clock)),
        }
    }

    /// Start every trace. Called once at the top of process initialization;
    /// repeated calls have no effect.
    pub fn begin(&self) {
        let _span = tracing::info_span!(target: "startup", "Application#onCreate").entered();
        for trace in self.all() {
            trace.start();
        }
        tracing::debug!(target: "startup", "startup traces started");
    }

    /// The trace a paint signal stops.
    pub fn trace_for(&self, signal: PaintSignal) -> &Arc<Trace> {
        match signal {
            PaintSignal::PageReady => &self.page_render,
            PaintSignal::FirstContentfulPaint => &self.fcp,
            PaintSignal::FullyPainted => &self.fpt,
        }
    }

    /// All traces in start order.
    pub fn all(&self) -> [&Arc<Trace>; 3] {
        [&self.fcp, &self.page_render, &self.fpt]
    }

    /// Whether every trace has stopped.
    pub fn is_complete(&self) -> bool {
        self.all().iter().all(|t| t.is_stopped())
    }

    /// Snapshots of every trace.
    pub fn snapshots(&self) -> Vec<TraceSnapshot> {
        self.all().iter().map(|t| t.snapshot()).collect()
    }
}

impl Default for StartupTraces {
    fn default() -> Self {
        Self::new()
    }
}
