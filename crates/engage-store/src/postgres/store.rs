//! PostgreSQL-backed aggregation store
//!
//! Every stateful table family is anchored by a version row. A commit runs
//! in one transaction that first bumps the version with a compare-and-set
//! (`WHERE version = $expected`); zero affected rows means the snapshot is
//! stale and the transaction rolls back, so a losing commit leaves no trace.
//! Membership rows are then rewritten from the snapshot, which keeps the
//! stored sets authoritative and the derived counters drift-free.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use engage_core::entities::{BookmarkState, PollOption, PollState, VoteState};
use engage_core::error::DomainError;
use engage_core::traits::{AggregationStore, StoreResult};
use engage_core::value_objects::{Snowflake, Versioned};

use crate::error::map_db_error;

use super::models::{BinaryVoteRow, PollOptionRow, PollRow, PollVoteRow};

/// PostgreSQL implementation of AggregationStore
#[derive(Clone)]
pub struct PgAggregationStore {
    pool: PgPool,
}

impl PgAggregationStore {
    /// Create a new PgAggregationStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AggregationStore for PgAggregationStore {
    #[instrument(skip(self))]
    async fn load_votes(&self, subject_id: Snowflake) -> StoreResult<Versioned<VoteState>> {
        let version = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT version FROM vote_subjects WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::SubjectNotFound(subject_id))?;

        let rows = sqlx::query_as::<_, BinaryVoteRow>(
            r#"
            SELECT user_id, polarity FROM binary_votes WHERE subject_id = $1
            "#,
        )
        .bind(subject_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut state = VoteState::new(subject_id);
        for row in rows {
            if row.polarity == BinaryVoteRow::UP {
                state.upvotes.insert(Snowflake::new(row.user_id));
            } else {
                state.downvotes.insert(Snowflake::new(row.user_id));
            }
        }

        Ok(Versioned::at(state, version as u64))
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_votes(&self, snapshot: Versioned<VoteState>) -> StoreResult<()> {
        let subject_id = snapshot.state.subject_id;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE vote_subjects SET version = version + 1
            WHERE subject_id = $1 AND version = $2
            "#,
        )
        .bind(subject_id.into_inner())
        .bind(snapshot.version as i64)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            // Dropped transaction rolls back; nothing was applied
            let miss = version_miss(&mut tx, "vote_subjects", "subject_id", subject_id).await?;
            return Err(miss);
        }

        sqlx::query("DELETE FROM binary_votes WHERE subject_id = $1")
            .bind(subject_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        for (voters, polarity) in [
            (&snapshot.state.upvotes, BinaryVoteRow::UP),
            (&snapshot.state.downvotes, BinaryVoteRow::DOWN),
        ] {
            for user_id in voters {
                sqlx::query(
                    r#"
                    INSERT INTO binary_votes (subject_id, user_id, polarity)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(subject_id.into_inner())
                .bind(user_id.into_inner())
                .bind(polarity)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn load_poll(&self, poll_id: Snowflake) -> StoreResult<Versioned<PollState>> {
        let poll = sqlx::query_as::<_, PollRow>(
            r#"
            SELECT version, expires_at FROM polls WHERE poll_id = $1
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::PollNotFound(poll_id))?;

        let option_rows = sqlx::query_as::<_, PollOptionRow>(
            r#"
            SELECT option_index, text FROM poll_options
            WHERE poll_id = $1
            ORDER BY option_index
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let vote_rows = sqlx::query_as::<_, PollVoteRow>(
            r#"
            SELECT option_index, user_id FROM poll_votes WHERE poll_id = $1
            "#,
        )
        .bind(poll_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut options: Vec<PollOption> =
            option_rows.into_iter().map(|row| PollOption::new(row.text)).collect();
        for row in vote_rows {
            if let Some(option) = options.get_mut(row.option_index as usize) {
                option.voters.insert(Snowflake::new(row.user_id));
            }
        }

        let state = PollState {
            poll_id,
            options,
            expires_at: poll.expires_at,
        };

        Ok(Versioned::at(state, poll.version as u64))
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_poll(&self, snapshot: Versioned<PollState>) -> StoreResult<()> {
        let poll_id = snapshot.state.poll_id;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE polls SET version = version + 1
            WHERE poll_id = $1 AND version = $2
            "#,
        )
        .bind(poll_id.into_inner())
        .bind(snapshot.version as i64)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            let miss = version_miss(&mut tx, "polls", "poll_id", poll_id).await?;
            return Err(miss);
        }

        // Options are immutable after creation; only voter membership is rewritten
        sqlx::query("DELETE FROM poll_votes WHERE poll_id = $1")
            .bind(poll_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        for (index, option) in snapshot.state.options.iter().enumerate() {
            for user_id in &option.voters {
                sqlx::query(
                    r#"
                    INSERT INTO poll_votes (poll_id, option_index, user_id)
                    VALUES ($1, $2, $3)
                    "#,
                )
                .bind(poll_id.into_inner())
                .bind(index as i32)
                .bind(user_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn load_bookmarks(&self, user_id: Snowflake) -> StoreResult<Versioned<BookmarkState>> {
        // Bookmark sets come into existence on first access
        sqlx::query(
            r#"
            INSERT INTO user_bookmarks (user_id, version)
            VALUES ($1, 0)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        let version = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT version FROM user_bookmarks WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        let saved = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT subject_id FROM saved_subjects WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut state = BookmarkState::new(user_id);
        state.saved.extend(saved.into_iter().map(Snowflake::new));

        Ok(Versioned::at(state, version as u64))
    }

    #[instrument(skip(self, snapshot))]
    async fn commit_bookmarks(&self, snapshot: Versioned<BookmarkState>) -> StoreResult<()> {
        let user_id = snapshot.state.user_id;
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query(
            r#"
            UPDATE user_bookmarks SET version = version + 1
            WHERE user_id = $1 AND version = $2
            "#,
        )
        .bind(user_id.into_inner())
        .bind(snapshot.version as i64)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            return Err(DomainError::StoreConflict);
        }

        sqlx::query("DELETE FROM saved_subjects WHERE user_id = $1")
            .bind(user_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        for subject_id in &snapshot.state.saved {
            sqlx::query(
                r#"
                INSERT INTO saved_subjects (user_id, subject_id)
                VALUES ($1, $2)
                "#,
            )
            .bind(user_id.into_inner())
            .bind(subject_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn create_votes(&self, subject_id: Snowflake) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vote_subjects (subject_id, version)
            VALUES ($1, 0)
            ON CONFLICT (subject_id) DO NOTHING
            "#,
        )
        .bind(subject_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, poll))]
    async fn create_poll(&self, poll: PollState) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO polls (poll_id, version, expires_at)
            VALUES ($1, 0, $2)
            ON CONFLICT (poll_id) DO NOTHING
            "#,
        )
        .bind(poll.poll_id.into_inner())
        .bind(poll.expires_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        // Poll already registered; options are immutable, leave it alone
        if inserted.rows_affected() == 0 {
            return Ok(());
        }

        for (index, option) in poll.options.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO poll_options (poll_id, option_index, text)
                VALUES ($1, $2, $3)
                "#,
            )
            .bind(poll.poll_id.into_inner())
            .bind(index as i32)
            .bind(&option.text)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn remove_subject(&self, subject_id: Snowflake) -> StoreResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Saved sets losing the subject get a version bump, so a snapshot
        // taken before the cascade cannot commit the subject back in
        sqlx::query(
            r#"
            UPDATE user_bookmarks SET version = version + 1
            WHERE user_id IN (SELECT user_id FROM saved_subjects WHERE subject_id = $1)
            "#,
        )
        .bind(subject_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for statement in [
            "DELETE FROM binary_votes WHERE subject_id = $1",
            "DELETE FROM vote_subjects WHERE subject_id = $1",
            "DELETE FROM poll_votes WHERE poll_id = $1",
            "DELETE FROM poll_options WHERE poll_id = $1",
            "DELETE FROM polls WHERE poll_id = $1",
            "DELETE FROM saved_subjects WHERE subject_id = $1",
        ] {
            sqlx::query(statement)
                .bind(subject_id.into_inner())
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)
    }
}

/// Distinguish a stale snapshot from a deleted subject after a failed
/// compare-and-bump
async fn version_miss(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    table: &str,
    key_column: &str,
    id: Snowflake,
) -> StoreResult<DomainError> {
    let exists = sqlx::query(&format!("SELECT 1 FROM {table} WHERE {key_column} = $1"))
        .bind(id.into_inner())
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_db_error)?;

    Ok(if exists.is_some() {
        DomainError::StoreConflict
    } else if table == "polls" {
        DomainError::PollNotFound(id)
    } else {
        DomainError::SubjectNotFound(id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAggregationStore>();
    }
}
