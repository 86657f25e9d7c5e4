//! Integration test utilities for the engagement engine
//!
//! This crate provides fixtures for running cross-crate scenarios against
//! the in-memory aggregation store.

pub mod fixtures;

pub use fixtures::*;
