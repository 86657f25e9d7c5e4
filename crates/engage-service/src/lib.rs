//! # engage-service
//!
//! Application layer for the engagement engine: the vote, poll, and bookmark
//! controllers, their response DTOs, and the service error type. Controllers
//! run an optimistic load-mutate-commit cycle against the `AggregationStore`
//! and never hold locks of their own.

pub mod dto;
pub mod services;

pub use dto::{PollOptionTally, PollOutcome, SaveOutcome, VoteOutcome};
pub use services::{
    BookmarkService, PollService, ServiceContext, ServiceError, ServiceResult, VoteService,
};
