//! Database row models for the engagement tables

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Row of the binary_votes table
#[derive(Debug, Clone, FromRow)]
pub struct BinaryVoteRow {
    pub user_id: i64,
    pub polarity: i16,
}

impl BinaryVoteRow {
    /// Stored value for an upvote
    pub const UP: i16 = 1;
    /// Stored value for a downvote
    pub const DOWN: i16 = -1;
}

/// Version-and-expiry row of the polls table
#[derive(Debug, Clone, FromRow)]
pub struct PollRow {
    pub version: i64,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Row of the poll_options table
#[derive(Debug, Clone, FromRow)]
pub struct PollOptionRow {
    pub option_index: i32,
    pub text: String,
}

/// Row of the poll_votes table
#[derive(Debug, Clone, FromRow)]
pub struct PollVoteRow {
    pub option_index: i32,
    pub user_id: i64,
}
