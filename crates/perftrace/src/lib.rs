//! Performance Traces
//!
//! This crate provides the measurement primitive for cold-start and paint
//! latencies:
//! - [`Trace`]: a named timer with idempotent, thread-safe start/stop
//! - Clocks: epoch-anchored monotonic, process-relative monotonic and manual (for tests and replays)
//! - Sinks that receive finished measurements (logging, metrics)
//! - Metrics collection and paint budgets with violation detection
//!
//! # Feature Flags
//!
//! - `telemetry` (default): Enables recording into [`TraceMetrics`]
//!
//! # Example
//!
//! ```rust
//! use perftrace::{LogSink, Trace, TraceSink};
//!
//! let fcp = Trace::new("FCP");
//! fcp.start();
//!
//! // Any number of call sites may race to stop the trace.
//! // Only the one that wins reports.
//! if fcp.stop() {
//!     LogSink.record("First Content Painted Time", fcp.duration());
//! }
//! assert!(!fcp.stop());
//! ```

mod budget;
mod clock;
mod error;
mod metrics;
mod sink;
mod trace;

pub use budget::*;
pub use clock::*;
pub use error::{TraceError, TraceResult};
pub use metrics::*;
pub use sink::*;
pub use trace::{Trace, TraceSnapshot};
