//! Data transfer objects - serialized responses for the presentation layer

mod responses;

pub use responses::{PollOptionTally, PollOutcome, SaveOutcome, VoteOutcome};
