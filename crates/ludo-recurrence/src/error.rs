//! Error types for ludo-recurrence operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// The rule is structurally incomplete or uses an unknown value
    /// (e.g. a monthly frequency without a monthly pattern).
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The rule is well-formed but rejected by the planner's policy
    /// (start in the past, end before start, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, RecurrenceError>;
