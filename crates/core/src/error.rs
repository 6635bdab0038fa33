//! Errors raised when callers violate the progress model's input contract.

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Rejected inputs. None of these leave the aggregate partially updated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A word was empty after trimming
    #[error("word must not be empty")]
    EmptyWord,

    /// Session accuracy was NaN or infinite
    #[error("invalid accuracy: {0}")]
    InvalidAccuracy(f64),

    /// Unrecognized practice mode name
    #[error("unknown practice mode: {0}")]
    UnknownMode(String),

    /// Unrecognized mastery name
    #[error("unknown mastery level: {0}")]
    UnknownMastery(String),
}
