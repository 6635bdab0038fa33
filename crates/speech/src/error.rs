//! Collaborator errors.

/// Result type for collaborator calls.
pub type Result<T> = std::result::Result<T, SpeechError>;

/// Failures reported by a speech or evaluation service.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// Service not configured or unreachable
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The request was sent but failed
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with something unusable
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
