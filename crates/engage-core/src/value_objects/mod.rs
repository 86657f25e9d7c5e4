//! Value objects - immutable domain primitives

mod snowflake;
mod versioned;

pub use snowflake::{Snowflake, SnowflakeParseError};
pub use versioned::Versioned;
