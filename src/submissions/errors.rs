//! # Submission Errors
//!
//! Error types for the submission repository.

use thiserror::Error;

/// Result type for submission operations
pub type SubmissionResult<T> = Result<T, SubmissionError>;

/// Submission repository errors
#[derive(Debug, Clone, Error)]
pub enum SubmissionError {
    /// Backing store could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// Backing file exists but cannot be parsed
    #[error("Corrupt submission store: {0}")]
    Corrupt(String),

    /// A lock guarding the store was poisoned by a panicking writer
    #[error("Lock poisoned")]
    LockPoisoned,
}

impl SubmissionError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            SubmissionError::Storage(_) => 500,
            SubmissionError::Corrupt(_) => 500,
            SubmissionError::LockPoisoned => 500,
        }
    }
}

impl From<std::io::Error> for SubmissionError {
    fn from(e: std::io::Error) -> Self {
        SubmissionError::Storage(e.to_string())
    }
}
