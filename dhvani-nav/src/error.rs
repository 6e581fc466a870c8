//! Error types for host output backends.
//!
//! Navigation itself never fails: missing world or player state degrades
//! to "no output this tick". Errors only come from the speech and tone
//! backends, and each one disables the affected output for the session.

use thiserror::Error;

/// Failure reported by a speech or tone backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OutputError {
    /// The backend was never initialized or failed to initialize.
    #[error("Output backend unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected a single request.
    #[error("Output request rejected: {0}")]
    Rejected(String),
}

impl OutputError {
    /// Short error code for logging.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "OUTPUT_UNAVAILABLE",
            Self::Rejected(_) => "OUTPUT_REJECTED",
        }
    }

    /// Whether later requests on the same output may still succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result alias for output backends.
pub type Result<T> = std::result::Result<T, OutputError>;
