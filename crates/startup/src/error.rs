//! Error types for startup instrumentation.

use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A visibility threshold outside (0, 1]
    #[error("Invalid visibility threshold: {0} (expected a fraction in (0, 1])")]
    InvalidThreshold(f32),

    /// A budget that is zero, negative or not a number
    #[error("Invalid budget for {category}: {value}ms")]
    InvalidBudget { category: &'static str, value: f64 },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
