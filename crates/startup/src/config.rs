//! Startup instrumentation configuration.

use crate::error::{ConfigError, ConfigResult};
use perftrace::PaintBudget;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Visibility fraction used when a producer is given no explicit threshold.
pub const DEFAULT_VISIBILITY_THRESHOLD: f32 = 0.3;

/// Configuration for cold-start instrumentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartupConfig {
    /// Fraction of the page title that must be on screen to count as first contentful paint
    pub header_visibility_threshold: f32,
    /// Fraction of the loading indicator that must be on screen to count as first contentful paint
    pub loader_visibility_threshold: f32,
    /// Paint latency budget
    pub budget: PaintBudget,
    /// Maximum samples kept per label by the metrics collector
    pub max_samples: usize,
    /// Whether finished traces are also written as `tracing` events
    pub log_to_tracing: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            header_visibility_threshold: 1.0,
            loader_visibility_threshold: 0.5,
            budget: PaintBudget::default(),
            max_samples: 1000,
            log_to_tracing: true,
        }
    }
}

impl StartupConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the header visibility threshold.
    pub fn with_header_threshold(mut self, threshold: f32) -> Self {
        self.header_visibility_threshold = threshold;
        self
    }

    /// Set the loading indicator visibility threshold.
    pub fn with_loader_threshold(mut self, threshold: f32) -> Self {
        self.loader_visibility_threshold = threshold;
        self
    }

    /// Set the paint budget.
    pub fn with_budget(mut self, budget: PaintBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Set the per-label sample cap.
    pub fn with_max_samples(mut self, max: usize) -> Self {
        self.max_samples = max;
        self
    }

    /// Enable or disable `tracing` output for finished traces.
    pub fn with_log_to_tracing(mut self, enabled: bool) -> Self {
        self.log_to_tracing = enabled;
        self
    }

    /// Parse and validate a JSON document. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load from `path` if it exists, falling back to defaults on any error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(target: "startup", "Failed to load startup config, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Check thresholds and budgets.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_threshold(self.header_visibility_threshold)?;
        validate_threshold(self.loader_visibility_threshold)?;

        let budgets = [
            ("firstContentfulPaint", self.budget.max_first_contentful_paint_ms),
            ("fullPaint", self.budget.max_full_paint_ms),
            ("pageReady", self.budget.max_page_ready_ms),
        ];
        for (category, value) in budgets {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::InvalidBudget { category, value });
            }
        }
        Ok(())
    }
}

/// Accept fractions in (0, 1].
pub fn validate_threshold(threshold: f32) -> ConfigResult<f32> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(threshold)
    } else {
        Err(ConfigError::InvalidThreshold(threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = StartupConfig::default();
        assert_eq!(config.header_visibility_threshold, 1.0);
        assert_eq!(config.loader_visibility_threshold, 0.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = StartupConfig::from_json_str(r#"{"maxSamples": 5}"#).unwrap();
        assert_eq!(config.max_samples, 5);
        assert_eq!(config.loader_visibility_threshold, 0.5);
        assert!(config.log_to_tracing);
    }

    #[test]
    fn test_budget_from_json() {
        let json = r#"{
            "budget": {
                "maxFirstContentfulPaintMs": 600.0,
                "maxFullPaintMs": 1200.0,
                "maxPageReadyMs": 400.0
            }
        }"#;
        let config = StartupConfig::from_json_str(json).unwrap();
        assert_eq!(config.budget.max_first_contentful_paint_ms, 600.0);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = StartupConfig::from_json_str(r#"{"headerVisibilityThreshold": 0.0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThreshold(t) if t == 0.0));

        assert!(validate_threshold(1.01).is_err());
        assert!(validate_threshold(f32::NAN).is_err());
        assert_eq!(validate_threshold(DEFAULT_VISIBILITY_THRESHOLD).unwrap(), 0.3);
    }

    #[test]
    fn test_invalid_budget_rejected() {
        let config = StartupConfig::new().with_budget(PaintBudget::default().with_full_paint(-1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBudget { category: "fullPaint", .. })
        ));
    }

    #[test]
    fn test_nan_and_zero_budgets_rejected() {
        let nan = StartupConfig::new().with_budget(PaintBudget::default().with_page_ready(f64::NAN));
        assert!(matches!(
            nan.validate(),
            Err(ConfigError::InvalidBudget { category: "pageReady", value }) if value.is_nan()
        ));

        let zero = StartupConfig::new().with_budget(PaintBudget::default().with_first_contentful_paint(0.0));
        assert!(matches!(
            zero.validate(),
            Err(ConfigError::InvalidBudget { category: "firstContentfulPaint", .. })
        ));

        let tiny = StartupConfig::new().with_budget(PaintBudget::default().with_page_ready(f64::MIN_POSITIVE));
        assert!(tiny.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"logToTracing": false}}"#).unwrap();

        let config = StartupConfig::from_file(file.path()).unwrap();
        assert!(!config.log_to_tracing);
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("startup.json");
        assert_eq!(StartupConfig::load_or_default(&missing), StartupConfig::default());

        std::fs::write(&missing, "not json").unwrap();
        assert_eq!(StartupConfig::load_or_default(&missing), StartupConfig::default());
    }
}
