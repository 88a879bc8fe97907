//! Millisecond clocks that traces read their timestamps from.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

/// A source of millisecond timestamps.
///
/// Implementations must be cheap to call and must never block; a trace reads
/// the clock inside `start`, `stop` and `elapsed_since_start`.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in milliseconds.
    fn now_millis(&self) -> i64;
}

/// Milliseconds since the Unix epoch that never go backwards.
///
/// The wall clock is read once per process and paired with an [`Instant`];
/// later readings add the monotonic time elapsed since then. Timestamps
/// supplied by other parts of the system (such as a process launch time)
/// share the epoch base, while NTP steps or manual clock changes cannot
/// make a running trace report a negative duration.
///
/// This is the default clock for traces.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Epoch milliseconds at the process anchor.
    pub fn anchor_millis() -> i64 {
        anchor().1
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        let &(origin, epoch_ms) = anchor();
        epoch_ms.saturating_add(millis_since(origin))
    }
}

static PROCESS_ANCHOR: OnceLock<(Instant, i64)> = OnceLock::new();

fn anchor() -> &'static (Instant, i64) {
    PROCESS_ANCHOR.get_or_init(|| (Instant::now(), chrono::Utc::now().timestamp_millis()))
}

fn millis_since(origin: Instant) -> i64 {
    i64::try_from(origin.elapsed().as_millis()).unwrap_or(i64::MAX)
}

/// Monotonic clock counting milliseconds from the process anchor shared
/// with [`SystemClock`].
///
/// Unaffected by wall clock adjustments, but its values are only comparable
/// within a single process.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl MonotonicClock {
    /// The instant that timestamp zero corresponds to.
    pub fn origin() -> Instant {
        anchor().0
    }
}

impl Clock for MonotonicClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        millis_since(Self::origin())
    }
}

/// A clock that only moves when told to.
///
/// Shared between threads through `Arc`, which makes it suitable for
/// simulating a timeline in tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a clock reading `start_ms`.
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: AtomicI64::new(start_ms),
        }
    }

    /// Jump to an absolute time.
    pub fn set(&self, ms: i64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Move the clock forward and return the new reading.
    ///
    /// Wraps on overflow, matching the atomic add.
    pub fn advance(&self, ms: i64) -> i64 {
        self.now.fetch_add(ms, Ordering::SeqCst).wrapping_add(ms)
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}
