//! Domain errors - error types for the domain layer
//!
//! Expected toggle behavior (re-voting, re-bookmarking) is a normal control
//! path and never an error; this enum covers the genuine failure cases plus
//! wrapped infrastructure failures.

use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Subject not found: {0}")]
    SubjectNotFound(Snowflake),

    #[error("Poll not found: {0}")]
    PollNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid poll option {index}: poll has {option_count} options")]
    InvalidOption { index: usize, option_count: usize },

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Poll has closed: {0}")]
    PollClosed(Snowflake),

    // =========================================================================
    // Concurrency
    // =========================================================================
    #[error("Commit lost the race for its subject; reload and retry")]
    StoreConflict,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::SubjectNotFound(_) => "UNKNOWN_SUBJECT",
            Self::PollNotFound(_) => "UNKNOWN_POLL",
            Self::InvalidOption { .. } => "INVALID_OPTION",
            Self::PollClosed(_) => "POLL_CLOSED",
            Self::StoreConflict => "STORE_CONFLICT",
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SubjectNotFound(_) | Self::PollNotFound(_))
    }

    /// Check if the caller may retry the whole operation with a fresh read
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreConflict)
    }
}
