//! Domain error type shared by the timer, the store and the API layer

use thiserror::Error;

/// Every recoverable failure the tracker can report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// Bad or missing user input; nothing was mutated
    #[error("{0}")]
    Validation(String),
    /// The timer is not in a state that allows the request
    #[error("{0}")]
    Precondition(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// The data file could not be read or written
    #[error("persistence failed: {0}")]
    Persistence(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Map a poisoned lock into an internal error
    pub fn lock<T>(what: &str, err: std::sync::PoisonError<T>) -> Self {
        Self::Internal(format!("Failed to lock {}: {}", what, err))
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Persistence(err.to_string())
    }
}

pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
