//! Collection of finished trace durations

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Bounded per-label history of trace durations.
///
/// Not synchronized on its own; share it behind a `Mutex` (see
/// [`crate::MetricsSink`]).
#[derive(Debug, Clone)]
pub struct TraceMetrics {
    /// Durations in milliseconds, keyed by label
    samples: HashMap<String, VecDeque<f64>>,
    /// Maximum samples to keep per label (to prevent unbounded growth)
    max_samples: usize,
    /// Whether metrics collection is enabled
    enabled: bool,
}

impl TraceMetrics {
    /// Create a new collector with default settings.
    pub fn new() -> Self {
        Self {
            samples: HashMap::new(),
            max_samples: 1000,
            enabled: true,
        }
    }

    /// Set the maximum number of samples to keep per label.
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max.max(1);
        self
    }

    /// Enable or disable collection.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if collection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a finished duration under `label`.
    #[cfg(feature = "telemetry")]
    pub fn record(&mut self, label: &str, duration_ms: i64) {
        if !self.enabled {
            return;
        }

        let times = self.samples.entry(label.to_string()).or_default();

        if times.len() >= self.max_samples {
            times.pop_front();
        }
        times.push_back(duration_ms as f64);

        tracing::trace!(
            target: "perf::metrics",
            label,
            duration_ms,
            "duration recorded"
        );
    }

    /// Record a finished duration (no-op when telemetry is disabled).
    #[cfg(not(feature = "telemetry"))]
    #[inline]
    pub fn record(&mut self, _label: &str, _duration_ms: i64) {}

    /// Samples for a label, oldest first.
    pub fn samples(&self, label: &str) -> Vec<f64> {
        self.samples
            .get(label)
            .map(|times| times.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Most recent sample for a label.
    pub fn last(&self, label: &str) -> Option<f64> {
        self.samples.get(label).and_then(|times| times.back().copied())
    }

    /// Statistics for every label.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            stats: self
                .samples
                .iter()
                .map(|(label, times)| {
                    let (front, back) = times.as_slices();
                    (label.clone(), TimingStats::from_samples(&[front, back].concat()))
                })
                .collect(),
            total_samples: self.samples.values().map(VecDeque::len).sum(),
        }
    }

    /// Drop all samples.
    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

impl Default for TraceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of collected durations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    /// Statistics for each label
    pub stats: HashMap<String, TimingStats>,
    /// Total number of samples across labels
    pub total_samples: usize,
}

/// Statistical summary of timing data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingStats {
    /// Number of samples
    pub count: usize,
    /// Minimum time in milliseconds
    pub min_ms: f64,
    /// Maximum time in milliseconds
    pub max_ms: f64,
    /// Mean time in milliseconds
    pub mean_ms: f64,
    /// Median time in milliseconds
    pub median_ms: f64,
    /// 95th percentile in milliseconds
    pub p95_ms: f64,
    /// 99th percentile in milliseconds
    pub p99_ms: f64,
    /// Standard deviation in milliseconds
    pub std_dev_ms: f64,
    /// Total time in milliseconds
    pub total_ms: f64,
}

impl TimingStats {
    /// Calculate statistics from a slice of samples.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len();
        let mut sorted: Vec<f64> = samples.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let total_ms: f64 = samples.iter().sum();
        let mean_ms = total_ms / count as f64;

        let median_ms = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        let variance: f64 =
            samples.iter().map(|x| (x - mean_ms).powi(2)).sum::<f64>() / count as f64;

        Self {
            count,
            min_ms: sorted[0],
            max_ms: sorted[count - 1],
            mean_ms,
            median_ms,
            p95_ms: percentile(&sorted, 95.0),
            p99_ms: percentile(&sorted, 99.0),
            std_dev_ms: variance.sqrt(),
            total_ms,
        }
    }
}

/// Linear-interpolated percentile over sorted samples.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        len => {
            let rank = (p / 100.0) * (len - 1) as f64;
            let lower = rank.floor() as usize;
            let upper = (rank.ceil() as usize).min(len - 1);
            let fraction = rank - lower as f64;
            sorted[lower] + fraction * (sorted[upper] - sorted[lower])
        }
    }
}
