//! Destinations for finished trace durations.

use crate::metrics::TraceMetrics;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives `(label, duration)` pairs for finished traces.
pub trait TraceSink: Send + Sync {
    /// Record one finished measurement.
    fn record(&self, label: &str, duration_ms: i64);
}

impl<S: TraceSink + ?Sized> TraceSink for Arc<S> {
    fn record(&self, label: &str, duration_ms: i64) {
        (**self).record(label, duration_ms)
    }
}

/// Writes each measurement as a `tracing` event on the `perf` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn record(&self, label: &str, duration_ms: i64) {
        tracing::info!(target: "perf", label, duration_ms, "{}\t{}", label, duration_ms);
    }
}

/// Records measurements into a shared [`TraceMetrics`].
#[derive(Debug, Clone, Default)]
pub struct MetricsSink {
    metrics: Arc<Mutex<TraceMetrics>>,
}

impl MetricsSink {
    /// Record into a fresh collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record into an existing collector.
    pub fn with_metrics(metrics: Arc<Mutex<TraceMetrics>>) -> Self {
        Self { metrics }
    }

    /// The underlying collector.
    pub fn metrics(&self) -> &Arc<Mutex<TraceMetrics>> {
        &self.metrics
    }
}

impl TraceSink for MetricsSink {
    fn record(&self, label: &str, duration_ms: i64) {
        self.metrics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .record(label, duration_ms);
    }
}

/// Forwards every measurement to each inner sink in order.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn TraceSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: impl TraceSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Number of inner sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether there are no inner sinks.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl TraceSink for FanoutSink {
    fn record(&self, label: &str, duration_ms: i64) {
        for sink in &self.sinks {
            sink.record(label, duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_sink_records() {
        let sink = MetricsSink::new();
        sink.record("Page Ready", 320);

        let metrics = sink.metrics().lock().unwrap();
        assert_eq!(metrics.samples("Page Ready"), &[320.0]);
    }

    #[test]
    fn test_metrics_sink_records_after_poisoned_lock() {
        let sink = MetricsSink::new();
        sink.record("FCP", 10);

        let metrics = Arc::clone(sink.metrics());
        let result = std::thread::spawn(move || {
            let _guard = metrics.lock().unwrap();
            panic!("holder panicked");
        })
        .join();
        assert!(result.is_err());
        assert!(sink.metrics().is_poisoned());

        sink.record("FCP", 20);

        let metrics = sink.metrics().lock().unwrap_or_else(PoisonError::into_inner);
        assert_eq!(metrics.samples("FCP"), &[10.0, 20.0]);
    }

    #[test]
    fn test_fanout_reaches_every_sink() {
        let first = MetricsSink::new();
        let second = MetricsSink::new();
        let fanout = FanoutSink::new()
            .with(LogSink)
            .with(first.clone())
            .with(second.clone());
        assert_eq!(fanout.len(), 3);

        fanout.record("FCP", 42);

        assert_eq!(first.metrics().lock().unwrap().last("FCP"), Some(42.0));
        assert_eq!(second.metrics().lock().unwrap().last("FCP"), Some(42.0));
    }

    #[test]
    fn test_arc_sink() {
        let sink: Arc<dyn TraceSink> = Arc::new(MetricsSink::new());
        sink.record("FPT", 1);
    }
}
