//! Error types for task domain parsing.

use thiserror::Error;

/// Errors returned while parsing domain values from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The deadline is not a `YYYY-MM-DD` calendar date.
    #[error("invalid deadline '{0}', expected YYYY-MM-DD")]
    InvalidDeadline(String),

    /// The sort criterion is not one of the supported choices.
    #[error("unknown sort choice: {0}")]
    UnknownSortChoice(String),
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
