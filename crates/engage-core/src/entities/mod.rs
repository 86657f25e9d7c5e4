//! Domain entities - authoritative reaction state per subject

mod bookmark;
mod poll;
mod vote;

pub use bookmark::BookmarkState;
pub use poll::{PollOption, PollState};
pub use vote::{Polarity, VoteState};
