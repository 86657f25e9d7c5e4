//! Test fixtures - pre-wired contexts and id helpers

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use engage_common::EngineSettings;
use engage_core::entities::PollState;
use engage_core::traits::AggregationStore;
use engage_core::Snowflake;
use engage_service::ServiceContext;
use engage_store::MemoryAggregationStore;

/// Generate a unique test id
pub fn test_id() -> Snowflake {
    static COUNTER: AtomicI64 = AtomicI64::new(1_000_000);
    Snowflake::new(COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// Settings with a retry budget large enough for heavily contended tests
fn test_settings() -> EngineSettings {
    EngineSettings {
        commit_retries: 256,
    }
}

/// Context over a fresh in-memory store with one vote subject registered
pub async fn vote_context(subject_id: Snowflake) -> ServiceContext {
    let store = Arc::new(MemoryAggregationStore::new());
    store.create_votes(subject_id).await.unwrap();
    ServiceContext::new(store, test_settings())
}

/// Context over a fresh in-memory store with one poll registered
pub async fn poll_context<const N: usize>(
    poll_id: Snowflake,
    options: [&str; N],
    expires_at: Option<DateTime<Utc>>,
) -> ServiceContext {
    let store = Arc::new(MemoryAggregationStore::new());
    store
        .create_poll(PollState::new(poll_id, options, expires_at))
        .await
        .unwrap();
    ServiceContext::new(store, test_settings())
}

/// Context over a fresh, empty in-memory store
pub fn bare_context() -> ServiceContext {
    ServiceContext::new(Arc::new(MemoryAggregationStore::new()), test_settings())
}
