//! Poll service
//!
//! Governs exactly-one-of-N poll voting with revote-by-replacement. Voting
//! fails once the poll's expiry instant has passed; the results read path
//! stays available. There is no operation to fully retract a poll vote.

use chrono::Utc;
use engage_core::value_objects::Snowflake;
use engage_core::DomainError;
use tracing::{debug, info, instrument};

use crate::dto::PollOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Poll service
pub struct PollService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PollService<'a> {
    /// Create a new PollService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Cast or switch a vote on a poll
    ///
    /// Fails with `InvalidOption` for an out-of-range index and `PollClosed`
    /// once the expiry instant has passed. Re-voting the same option is a
    /// normal control path and converges to the same end state.
    #[instrument(skip(self))]
    pub async fn vote(
        &self,
        poll_id: Snowflake,
        user_id: Snowflake,
        option_index: usize,
    ) -> ServiceResult<PollOutcome> {
        let mut attempts = 0;

        loop {
            let mut snapshot = self.ctx.store().load_poll(poll_id).await?;

            if snapshot.state.is_closed(Utc::now()) {
                return Err(DomainError::PollClosed(poll_id).into());
            }

            snapshot.state.cast(user_id, option_index)?;
            let outcome = PollOutcome::from_state(&snapshot.state, user_id);

            match self.ctx.store().commit_poll(snapshot).await {
                Ok(()) => {
                    info!(
                        poll_id = %poll_id,
                        user_id = %user_id,
                        option_index,
                        total_votes = outcome.total_votes,
                        "Poll vote recorded"
                    );
                    return Ok(outcome);
                }
                Err(err) if err.is_retryable() && attempts < self.ctx.commit_retries() => {
                    attempts += 1;
                    debug!(
                        poll_id = %poll_id,
                        attempts,
                        "Poll commit lost the race, retrying"
                    );
                    tokio::task::yield_now().await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Read the current tallies; available even after the poll has closed
    #[instrument(skip(self))]
    pub async fn results(
        &self,
        poll_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<PollOutcome> {
        let snapshot = self.ctx.store().load_poll(poll_id).await?;
        Ok(PollOutcome::from_state(&snapshot.state, user_id))
    }
}
