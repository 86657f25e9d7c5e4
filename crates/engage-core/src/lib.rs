//! # engage-core
//!
//! Domain layer for the engagement aggregation engine: reaction entities,
//! value objects, domain errors, and the `AggregationStore` trait.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{BookmarkState, Polarity, PollOption, PollState, VoteState};
pub use error::DomainError;
pub use traits::{AggregationStore, StoreResult};
pub use value_objects::{Snowflake, SnowflakeParseError, Versioned};
