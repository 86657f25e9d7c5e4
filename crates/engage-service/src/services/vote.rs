//! Vote service
//!
//! Governs mutually exclusive up/down reactions on a single subject
//! (post or comment). Toggling the held polarity retracts it; toggling the
//! other polarity migrates the user across sets. The commit is optimistic:
//! on a lost race the whole load-mutate-commit cycle is re-run.

use engage_core::entities::Polarity;
use engage_core::value_objects::Snowflake;
use tracing::{debug, info, instrument};

use crate::dto::VoteOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Vote service
pub struct VoteService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VoteService<'a> {
    /// Create a new VoteService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle a vote on a subject
    ///
    /// Never fails for repeated calls; re-voting is a normal control path.
    #[instrument(skip(self))]
    pub async fn apply(
        &self,
        subject_id: Snowflake,
        user_id: Snowflake,
        polarity: Polarity,
    ) -> ServiceResult<VoteOutcome> {
        let mut attempts = 0;

        loop {
            let mut snapshot = self.ctx.store().load_votes(subject_id).await?;
            snapshot.state.toggle(user_id, polarity);
            let outcome = VoteOutcome::from_state(&snapshot.state, user_id);

            match self.ctx.store().commit_votes(snapshot).await {
                Ok(()) => {
                    info!(
                        subject_id = %subject_id,
                        user_id = %user_id,
                        score = outcome.score,
                        "Vote toggled"
                    );
                    return Ok(outcome);
                }
                Err(err) if err.is_retryable() && attempts < self.ctx.commit_retries() => {
                    attempts += 1;
                    debug!(
                        subject_id = %subject_id,
                        attempts,
                        "Vote commit lost the race, retrying"
                    );
                    tokio::task::yield_now().await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Read the current score and the user's active polarity, without mutating
    #[instrument(skip(self))]
    pub async fn score(
        &self,
        subject_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<VoteOutcome> {
        let snapshot = self.ctx.store().load_votes(subject_id).await?;
        Ok(VoteOutcome::from_state(&snapshot.state, user_id))
    }
}
