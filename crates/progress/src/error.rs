//! Tracker errors.

use belajar_core::CoreError;
use belajar_storage::StorageError;

/// Result type for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

/// Errors surfaced by the tracker.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Input rejected; state unchanged
    #[error(transparent)]
    Invalid(#[from] CoreError),

    /// Loading or flushing the stored aggregate failed
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// The background persister stopped abnormally
    #[error("persister failed: {0}")]
    Persister(String),
}
