//! Error types for replay-calendar operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// An event or fragment violates the input contract (negative duration,
    /// end before start, out-of-range instant).
    #[error("Invalid event '{id}': {field} {reason}")]
    InvalidEvent {
        id: String,
        field: &'static str,
        reason: String,
    },

    /// A roster lookup missed. Upstream data is allowed to be incomplete
    /// (banned or deleted accounts), so callers are expected to recover.
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),
}

impl CalendarError {
    pub(crate) fn invalid_event(
        id: impl Into<String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        CalendarError::InvalidEvent {
            id: id.into(),
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
