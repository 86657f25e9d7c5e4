//! In-memory implementation of AggregationStore
//!
//! Backed by sharded concurrent maps. Each entry carries a monotonically
//! increasing version; a commit compares versions while holding the entry's
//! shard write lock, so two commits for the same subject can never both
//! succeed from the same snapshot. Entries for different subjects live in
//! independent shards and never contend beyond the map itself.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::instrument;

use engage_core::entities::{BookmarkState, PollState, VoteState};
use engage_core::error::DomainError;
use engage_core::traits::{AggregationStore, StoreResult};
use engage_core::value_objects::{Snowflake, Versioned};

/// One stored state with its commit version
#[derive(Debug)]
struct Entry<T> {
    state: T,
    version: u64,
}

impl<T: Clone> Entry<T> {
    fn new(state: T) -> Self {
        Self { state, version: 0 }
    }

    fn snapshot(&self) -> Versioned<T> {
        Versioned::at(self.state.clone(), self.version)
    }

    fn commit(&mut self, snapshot: Versioned<T>) -> StoreResult<()> {
        if snapshot.version != self.version {
            return Err(DomainError::StoreConflict);
        }
        self.state = snapshot.state;
        self.version += 1;
        Ok(())
    }
}

/// In-memory aggregation store
#[derive(Debug, Default)]
pub struct MemoryAggregationStore {
    votes: DashMap<Snowflake, Entry<VoteState>>,
    polls: DashMap<Snowflake, Entry<PollState>>,
    bookmarks: DashMap<Snowflake, Entry<BookmarkState>>,
}

impl MemoryAggregationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AggregationStore for MemoryAggregationStore {
    #[instrument(skip(self))]
    async fn load_votes(&self, subject_id: Snowflake) -> StoreResult<Versioned<VoteState>> {
        self.votes
            .get(&subject_id)
            .map(|entry| entry.snapshot())
            .ok_or(DomainError::SubjectNotFound(subject_id))
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_votes(&self, snapshot: Versioned<VoteState>) -> StoreResult<()> {
        let subject_id = snapshot.state.subject_id;
        let mut entry = self
            .votes
            .get_mut(&subject_id)
            .ok_or(DomainError::SubjectNotFound(subject_id))?;
        entry.commit(snapshot)
    }

    #[instrument(skip(self))]
    async fn load_poll(&self, poll_id: Snowflake) -> StoreResult<Versioned<PollState>> {
        self.polls
            .get(&poll_id)
            .map(|entry| entry.snapshot())
            .ok_or(DomainError::PollNotFound(poll_id))
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_poll(&self, snapshot: Versioned<PollState>) -> StoreResult<()> {
        let poll_id = snapshot.state.poll_id;
        let mut entry = self
            .polls
            .get_mut(&poll_id)
            .ok_or(DomainError::PollNotFound(poll_id))?;
        entry.commit(snapshot)
    }

    #[instrument(skip(self))]
    async fn load_bookmarks(&self, user_id: Snowflake) -> StoreResult<Versioned<BookmarkState>> {
        let entry = self
            .bookmarks
            .entry(user_id)
            .or_insert_with(|| Entry::new(BookmarkState::new(user_id)));
        Ok(entry.snapshot())
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_bookmarks(&self, snapshot: Versioned<BookmarkState>) -> StoreResult<()> {
        let user_id = snapshot.state.user_id;
        let mut entry = self
            .bookmarks
            .entry(user_id)
            .or_insert_with(|| Entry::new(BookmarkState::new(user_id)));
        entry.commit(snapshot)
    }

    #[instrument(skip(self))]
    async fn create_votes(&self, subject_id: Snowflake) -> StoreResult<()> {
        self.votes
            .entry(subject_id)
            .or_insert_with(|| Entry::new(VoteState::new(subject_id)));
        Ok(())
    }

    #[instrument(skip(self, poll))]
    async fn create_poll(&self, poll: PollState) -> StoreResult<()> {
        self.polls.entry(poll.poll_id).or_insert_with(|| Entry::new(poll));
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_subject(&self, subject_id: Snowflake) -> StoreResult<()> {
        self.votes.remove(&subject_id);
        self.polls.remove(&subject_id);
        // Scrub the subject from every saved set. Touched sets get a version
        // bump so a stale snapshot cannot commit the subject back in.
        for mut entry in self.bookmarks.iter_mut() {
            if entry.state.saved.remove(&subject_id) {
                entry.version += 1;
            }
        }
        Ok(())
    }
}
