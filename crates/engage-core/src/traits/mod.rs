//! Traits (ports) - define the interface for persistence

mod store;

pub use store::{AggregationStore, StoreResult};
