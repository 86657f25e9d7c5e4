//! PostgreSQL implementation of AggregationStore

mod models;
mod store;

pub use store::PgAggregationStore;
