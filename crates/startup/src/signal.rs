//! Paint signals and the single entry point that turns them into measurements.

use crate::traces::StartupTraces;
use perftrace::{BudgetReport, BudgetViolation, PaintBudget, TraceSink};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// A completion event observed during a cold start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaintSignal {
    /// The main page was created
    PageReady,
    /// The first meaningful content became visible
    FirstContentfulPaint,
    /// The content list showed its first items
    FullyPainted,
}

impl PaintSignal {
    /// All signals.
    pub const ALL: [PaintSignal; 3] = [
        PaintSignal::PageReady,
        PaintSignal::FirstContentfulPaint,
        PaintSignal::FullyPainted,
    ];

    /// The label measurements are reported under.
    pub fn label(self) -> &'static str {
        match self {
            PaintSignal::PageReady => "Page Ready",
            PaintSignal::FirstContentfulPaint => "First Content Painted Time",
            PaintSignal::FullyPainted => "Fully Painted Time",
        }
    }

    /// The budget that applies to this signal.
    pub fn budget_ms(self, budget: &PaintBudget) -> f64 {
        match self {
            PaintSignal::PageReady => budget.max_page_ready_ms,
            PaintSignal::FirstContentfulPaint => budget.max_first_contentful_paint_ms,
            PaintSignal::FullyPainted => budget.max_full_paint_ms,
        }
    }
}

impl fmt::Display for PaintSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Stops traces in response to paint signals and reports each one once.
///
/// Every producer holds an `Arc<PaintReporter>` and calls [`report`] whenever
/// it believes its completion condition holds. Producers never coordinate:
/// the trace's own first-stop-wins rule decides which call reports, and
/// every other call is a no-op.
///
/// [`report`]: PaintReporter::report
pub struct PaintReporter {
    traces: StartupTraces,
    sink: Arc<dyn TraceSink>,
    budget: PaintBudget,
    violations: Mutex<Vec<BudgetViolation>>,
}

impl PaintReporter {
    /// Create a reporter over `traces` that forwards to `sink`.
    pub fn new(traces: StartupTraces, sink: Arc<dyn TraceSink>) -> Self {
        Self::with_budget(traces, sink, PaintBudget::default())
    }

    /// Create a reporter that also checks measurements against `budget`.
    pub fn with_budget(traces: StartupTraces, sink: Arc<dyn TraceSink>, budget: PaintBudget) -> Self {
        Self {
            traces,
            sink,
            budget,
            violations: Mutex::new(Vec::new()),
        }
    }

    /// The traces this reporter stops.
    pub fn traces(&self) -> &StartupTraces {
        &self.traces
    }

    /// Stop the signal's trace now.
    ///
    /// Returns the duration if this call stopped the trace and the
    /// measurement was reported, `None` otherwise.
    pub fn report(&self, signal: PaintSignal) -> Option<i64> {
        let trace = self.traces.trace_for(signal);
        if trace.is_stopped() || !trace.stop() {
            return None;
        }
        self.publish(signal)
    }

    /// Stop the signal's trace at an explicit timestamp.
    pub fn report_at(&self, signal: PaintSignal, end_ms: i64) -> Option<i64> {
        if !self.traces.trace_for(signal).stop_at(end_ms) {
            return None;
        }
        self.publish(signal)
    }

    fn publish(&self, signal: PaintSignal) -> Option<i64> {
        let trace = self.traces.trace_for(signal);
        let duration_ms = match trace.try_duration() {
            Ok(ms) => ms,
            Err(e) => {
                tracing::warn!(target: "startup", signal = %signal, "Dropping measurement: {}", e);
                return None;
            }
        };

        self.sink.record(signal.label(), duration_ms);

        if let Some(violation) =
            PaintBudget::check(trace.name(), duration_ms as f64, signal.budget_ms(&self.budget))
        {
            tracing::warn!(target: "startup", "Paint budget exceeded: {}", violation);
            self.violations
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(violation);
        }

        Some(duration_ms)
    }

    /// Violations seen so far.
    pub fn budget_report(&self) -> BudgetReport {
        let violations = self
            .violations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        BudgetReport::from_violations(violations)
    }
}

impl fmt::Debug for PaintReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaintReporter")
            .field("traces", &self.traces)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}
