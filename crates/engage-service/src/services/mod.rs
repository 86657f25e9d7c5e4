//! Service layer - engagement controllers

mod bookmark;
mod context;
mod error;
mod poll;
mod vote;

pub use bookmark::BookmarkService;
pub use context::ServiceContext;
pub use error::{ServiceError, ServiceResult};
pub use poll::PollService;
pub use vote::VoteService;
