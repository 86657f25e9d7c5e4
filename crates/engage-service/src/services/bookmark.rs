//! Bookmark service
//!
//! Idempotent save/unsave toggle on a per-user set of subject ids. No
//! counters and no exclusivity with any other reaction kind.

use engage_core::value_objects::Snowflake;
use tracing::{debug, info, instrument};

use crate::dto::SaveOutcome;

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Bookmark service
pub struct BookmarkService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BookmarkService<'a> {
    /// Create a new BookmarkService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Toggle whether a subject is in the user's saved set
    #[instrument(skip(self))]
    pub async fn toggle(
        &self,
        user_id: Snowflake,
        subject_id: Snowflake,
    ) -> ServiceResult<SaveOutcome> {
        let mut attempts = 0;

        loop {
            let mut snapshot = self.ctx.store().load_bookmarks(user_id).await?;
            let saved = snapshot.state.toggle(subject_id);

            match self.ctx.store().commit_bookmarks(snapshot).await {
                Ok(()) => {
                    info!(
                        user_id = %user_id,
                        subject_id = %subject_id,
                        saved,
                        "Bookmark toggled"
                    );
                    return Ok(SaveOutcome { saved });
                }
                Err(err) if err.is_retryable() && attempts < self.ctx.commit_retries() => {
                    attempts += 1;
                    debug!(
                        user_id = %user_id,
                        attempts,
                        "Bookmark commit lost the race, retrying"
                    );
                    tokio::task::yield_now().await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Whether the subject is currently saved, without mutating
    #[instrument(skip(self))]
    pub async fn saved(
        &self,
        user_id: Snowflake,
        subject_id: Snowflake,
    ) -> ServiceResult<SaveOutcome> {
        let snapshot = self.ctx.store().load_bookmarks(user_id).await?;
        Ok(SaveOutcome {
            saved: snapshot.state.is_saved(subject_id),
        })
    }
}
