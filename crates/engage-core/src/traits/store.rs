//! Aggregation store trait (port) - the persistence boundary
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. The store owns per-subject serialization:
//! every load returns a versioned snapshot and every commit is atomic and
//! rejected with `StoreConflict` when the snapshot is stale. Commits on
//! different subjects never block each other.

use async_trait::async_trait;

use crate::entities::{BookmarkState, PollState, VoteState};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, Versioned};

/// Result type for store operations
pub type StoreResult<T> = Result<T, DomainError>;

#[async_trait]
pub trait AggregationStore: Send + Sync {
    /// Load the up/down vote state of a subject
    ///
    /// Fails with `SubjectNotFound` if the subject was never registered.
    async fn load_votes(&self, subject_id: Snowflake) -> StoreResult<Versioned<VoteState>>;

    /// Commit a vote snapshot, all-or-nothing
    ///
    /// Fails with `StoreConflict` if another commit landed since the
    /// snapshot was loaded.
    async fn commit_votes(&self, snapshot: Versioned<VoteState>) -> StoreResult<()>;

    /// Load a poll's option voter sets and expiry
    async fn load_poll(&self, poll_id: Snowflake) -> StoreResult<Versioned<PollState>>;

    /// Commit a poll snapshot, all-or-nothing
    async fn commit_poll(&self, snapshot: Versioned<PollState>) -> StoreResult<()>;

    /// Load a user's saved-subject set
    ///
    /// The set is created implicitly on first access; identity is verified
    /// upstream, so there is no not-found case.
    async fn load_bookmarks(&self, user_id: Snowflake) -> StoreResult<Versioned<BookmarkState>>;

    /// Commit a bookmark snapshot, all-or-nothing
    async fn commit_bookmarks(&self, snapshot: Versioned<BookmarkState>) -> StoreResult<()>;

    /// Register empty vote state for a newly created subject
    async fn create_votes(&self, subject_id: Snowflake) -> StoreResult<()>;

    /// Register a newly created poll with its fixed options
    async fn create_poll(&self, poll: PollState) -> StoreResult<()>;

    /// Drop all reaction state owned by a subject (cascade on delete)
    async fn remove_subject(&self, subject_id: Snowflake) -> StoreResult<()>;
}
