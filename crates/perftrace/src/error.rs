//! Error types for checked trace reads.

use thiserror::Error;

/// Errors returned by the checked accessors of [`crate::Trace`].
///
/// The unchecked accessors never fail; these exist for callers that want to
/// tell an incomplete measurement apart from a real one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraceError {
    /// The trace was read before `start` took effect
    #[error("Trace '{name}' has not been started")]
    NotStarted { name: String },

    /// The trace was read before `stop` took effect
    #[error("Trace '{name}' has not been stopped")]
    NotStopped { name: String },
}

/// Result type for checked trace reads.
pub type TraceResult<T> = Result<T, TraceError>;
