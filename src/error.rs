//! Error types for the focus timer

use thiserror::Error;

/// Errors raised by timer operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// An operation's precondition was not met; state is unchanged
    #[error("validation error: {0}")]
    Validation(String),

    /// Shared state could not be locked
    #[error("lock error: {0}")]
    Lock(String),
}

impl TimerError {
    pub fn validation(message: impl Into<String>) -> Self {
        TimerError::Validation(message.into())
    }

    /// The human-readable message without the kind prefix
    pub fn message(&self) -> &str {
        match self {
            TimerError::Validation(message) | TimerError::Lock(message) => message,
        }
    }

    /// Validation errors are expected user mistakes rather than faults
    pub fn is_validation(&self) -> bool {
        matches!(self, TimerError::Validation(_))
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, TimerError>;
