//! # engage-store
//!
//! Infrastructure layer implementing the `AggregationStore` trait from
//! `engage-core`.
//!
//! ## Overview
//!
//! Two implementations are provided:
//!
//! - [`MemoryAggregationStore`] - sharded in-memory maps with per-subject
//!   optimistic versioning; used by tests and single-process deployments.
//! - [`PgAggregationStore`] - PostgreSQL via SQLx with a version column per
//!   subject; commits run in a transaction guarded by a compare-and-bump
//!   version update.
//!
//! Both serialize commits per subject: a commit carrying a stale version
//! fails with `StoreConflict` and never partially applies.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use engage_store::pool::{create_pool, DatabaseConfig};
//! use engage_store::PgAggregationStore;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let store = PgAggregationStore::new(pool);
//!
//!     // Use the store...
//!     Ok(())
//! }
//! ```

mod error;
pub mod memory;
pub mod pool;
pub mod postgres;

// Re-export commonly used types
pub use memory::MemoryAggregationStore;
pub use pool::{create_pool, create_pool_from_env, DatabaseConfig, PgPool};
pub use postgres::PgAggregationStore;
