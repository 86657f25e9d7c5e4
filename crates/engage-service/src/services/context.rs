//! Service context - dependency container for services
//!
//! Holds the aggregation store handle and the engine tunables shared by all
//! controllers.

use std::sync::Arc;

use engage_common::EngineSettings;
use engage_core::traits::AggregationStore;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    store: Arc<dyn AggregationStore>,
    settings: EngineSettings,
}

impl ServiceContext {
    /// Create a context with explicit settings
    pub fn new(store: Arc<dyn AggregationStore>, settings: EngineSettings) -> Self {
        Self { store, settings }
    }

    /// Create a context with default engine settings
    pub fn with_defaults(store: Arc<dyn AggregationStore>) -> Self {
        Self::new(store, EngineSettings::default())
    }

    /// The aggregation store
    pub fn store(&self) -> &dyn AggregationStore {
        self.store.as_ref()
    }

    /// Retry budget for load-mutate-commit cycles that lose a commit race
    pub fn commit_retries(&self) -> u32 {
        self.settings.commit_retries
    }
}
