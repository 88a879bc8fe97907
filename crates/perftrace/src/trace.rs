//! The named start/stop trace.

use crate::clock::{Clock, SystemClock};
use crate::error::{TraceError, TraceResult};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;

/// A named timer measuring exactly one interval.
///
/// `start` and `stop` are idempotent: only the first call in each direction
/// has an effect, and every later call is silently ignored, even when it
/// passes a different timestamp. Several independent call sites can therefore
/// race to stop the same trace without coordinating; the one whose `stop`
/// returns `true` is the one that should report the measurement.
///
/// All methods take `&self`. Each transition is claimed with a
/// compare-and-set before its timestamp is written, and the public
/// `started`/`stopped` flags are only raised after the timestamp is stored.
/// A reader that sees `is_stopped() == true` always reads the final end
/// timestamp.
///
/// A trace cannot be restarted. Measure a new interval with a new trace.
///
/// # Example
///
/// ```rust
/// use perftrace::{ManualClock, Trace};
/// use std::sync::Arc;
///
/// let clock = Arc::new(ManualClock::new(100));
/// let fcp = Trace::with_clock("FCP", clock.clone());
/// fcp.start();
///
/// clock.set(250);
/// assert!(fcp.stop());
/// assert!(!fcp.stop_at(400));
/// assert_eq!(fcp.duration(), 150);
/// ```
#[derive(Debug)]
pub struct Trace {
    name: String,
    clock: Arc<dyn Clock>,
    start_ms: AtomicI64,
    end_ms: AtomicI64,
    start_claimed: AtomicBool,
    stop_claimed: AtomicBool,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl Trace {
    /// Create an un-started trace reading the epoch-anchored [`SystemClock`].
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_clock(name, Arc::new(SystemClock))
    }

    /// Create an un-started trace reading the given clock.
    pub fn with_clock(name: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
            start_ms: AtomicI64::new(0),
            end_ms: AtomicI64::new(0),
            start_claimed: AtomicBool::new(false),
            stop_claimed: AtomicBool::new(false),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// Create a trace that is already started and stopped.
    ///
    /// The start timestamp is zero, not the current time, so `duration()`
    /// equals `end_ms`. This represents intervals whose beginning is implied
    /// (for example, a launch time measured elsewhere) but whose completion
    /// instant is known.
    pub fn completed(name: impl Into<String>, end_ms: i64) -> Self {
        Self::completed_with_clock(name, end_ms, Arc::new(SystemClock))
    }

    /// Like [`Trace::completed`], but `elapsed_since_start` reads `clock`.
    pub fn completed_with_clock(name: impl Into<String>, end_ms: i64, clock: Arc<dyn Clock>) -> Self {
        Self {
            name: name.into(),
            clock,
            start_ms: AtomicI64::new(0),
            end_ms: AtomicI64::new(end_ms),
            start_claimed: AtomicBool::new(true),
            stop_claimed: AtomicBool::new(true),
            started: AtomicBool::new(true),
            stopped: AtomicBool::new(true),
        }
    }

    /// The trace name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capture the start timestamp if this is the first call.
    ///
    /// Returns `true` if this call started the trace.
    pub fn start(&self) -> bool {
        if self
            .start_claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        let now = self.clock.now_millis();
        self.start_ms.store(now, Ordering::SeqCst);
        self.started.store(true, Ordering::SeqCst);

        tracing::trace!(target: "perf::trace", name = %self.name, start_ms = now, "trace started");
        true
    }

    /// Stop the trace at the current clock time if this is the first call.
    ///
    /// Returns `true` if this call stopped the trace.
    pub fn stop(&self) -> bool {
        if self.stop_claimed.load(Ordering::SeqCst) {
            return false;
        }
        self.stop_at(self.clock.now_millis())
    }

    /// Stop the trace at `end_ms` if this is the first call.
    ///
    /// Later calls are ignored whatever timestamp they carry. Returns `true`
    /// if this call stopped the trace.
    pub fn stop_at(&self, end_ms: i64) -> bool {
        if self
            .stop_claimed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        self.end_ms.store(end_ms, Ordering::SeqCst);
        self.stopped.store(true, Ordering::SeqCst);

        tracing::trace!(target: "perf::trace", name = %self.name, end_ms, "trace stopped");
        true
    }

    /// Whether `start` has taken effect.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Whether `stop` has taken effect.
    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// The start timestamp, zero until started.
    #[inline]
    pub fn start_timestamp(&self) -> i64 {
        self.start_ms.load(Ordering::SeqCst)
    }

    /// The end timestamp, zero until stopped.
    #[inline]
    pub fn end_timestamp(&self) -> i64 {
        self.end_ms.load(Ordering::SeqCst)
    }

    /// `end - start` in milliseconds.
    ///
    /// Only meaningful once the trace is stopped. Before that the end
    /// timestamp is still zero and the result is `-start` (or zero for a
    /// trace that was never started). Callers that cannot rule this out
    /// should use [`Trace::try_duration`].
    #[inline]
    pub fn duration(&self) -> i64 {
        self.end_timestamp().wrapping_sub(self.start_timestamp())
    }

    /// Like [`Trace::duration`], but fails unless the trace has been both
    /// started and stopped.
    pub fn try_duration(&self) -> TraceResult<i64> {
        if !self.is_stopped() {
            return Err(TraceError::NotStopped {
                name: self.name.clone(),
            });
        }
        if !self.is_started() {
            return Err(TraceError::NotStarted {
                name: self.name.clone(),
            });
        }
        Ok(self.duration())
    }

    /// Milliseconds from the start timestamp to now, ignoring stop state.
    ///
    /// Expects `start` to have been called; otherwise the start timestamp is
    /// zero and the result is simply the current clock reading.
    #[inline]
    pub fn elapsed_since_start(&self) -> i64 {
        self.clock.now_millis().wrapping_sub(self.start_timestamp())
    }

    /// Like [`Trace::elapsed_since_start`], but fails if the trace was never started.
    pub fn try_elapsed_since_start(&self) -> TraceResult<i64> {
        if !self.is_started() {
            return Err(TraceError::NotStarted {
                name: self.name.clone(),
            });
        }
        Ok(self.elapsed_since_start())
    }

    /// Copy the current state.
    pub fn snapshot(&self) -> TraceSnapshot {
        let started = self.is_started();
        let stopped = self.is_stopped();
        TraceSnapshot {
            name: self.name.clone(),
            start_ms: self.start_timestamp(),
            end_ms: self.end_timestamp(),
            started,
            stopped,
            duration_ms: (started && stopped).then(|| self.duration()),
        }
    }
}

/// A point-in-time copy of a trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceSnapshot {
    /// Trace name
    pub name: String,
    /// Start timestamp in milliseconds
    pub start_ms: i64,
    /// End timestamp in milliseconds
    pub end_ms: i64,
    /// Whether the trace had started
    pub started: bool,
    /// Whether the trace had stopped
    pub stopped: bool,
    /// Duration, present only when started and stopped
    pub duration_ms: Option<i64>,
}
