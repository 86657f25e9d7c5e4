//! Response DTOs
//!
//! Every field is recomputed from the committed reaction sets; nothing here
//! is carried over from a prior in-memory value.

use serde::Serialize;

use engage_core::entities::{PollState, VoteState};
use engage_core::value_objects::Snowflake;

/// Result of a binary vote toggle (and of the score read path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VoteOutcome {
    pub score: i64,
    pub user_upvoted: bool,
    pub user_downvoted: bool,
}

impl VoteOutcome {
    /// Derive the outcome for one user from vote state
    pub fn from_state(state: &VoteState, user_id: Snowflake) -> Self {
        Self {
            score: state.score(),
            user_upvoted: state.user_upvoted(user_id),
            user_downvoted: state.user_downvoted(user_id),
        }
    }
}

/// Per-option tally within a poll response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOptionTally {
    pub text: String,
    pub vote_count: usize,
}

/// Result of a poll vote (and of the results read path)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollOutcome {
    pub options: Vec<PollOptionTally>,
    pub total_votes: usize,
    /// Option index the requesting user currently votes for
    pub user_choice: Option<usize>,
}

impl PollOutcome {
    /// Derive the outcome for one user from poll state
    pub fn from_state(state: &PollState, user_id: Snowflake) -> Self {
        Self {
            options: state
                .options
                .iter()
                .map(|option| PollOptionTally {
                    text: option.text.clone(),
                    vote_count: option.vote_count(),
                })
                .collect(),
            total_votes: state.total_votes(),
            user_choice: state.choice_of(user_id),
        }
    }
}

/// Result of a bookmark toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaveOutcome {
    pub saved: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use engage_core::entities::Polarity;

    #[test]
    fn test_vote_outcome_from_state() {
        let mut state = VoteState::new(Snowflake::new(1));
        state.toggle(Snowflake::new(100), Polarity::Up);
        state.toggle(Snowflake::new(200), Polarity::Down);

        let outcome = VoteOutcome::from_state(&state, Snowflake::new(100));
        assert_eq!(outcome.score, 0);
        assert!(outcome.user_upvoted);
        assert!(!outcome.user_downvoted);
    }

    #[test]
    fn test_poll_outcome_from_state() {
        let mut state = PollState::new(Snowflake::new(1), ["A", "B"], None);
        state.cast(Snowflake::new(100), 1).unwrap();

        let outcome = PollOutcome::from_state(&state, Snowflake::new(100));
        assert_eq!(outcome.options.len(), 2);
        assert_eq!(outcome.options[1].vote_count, 1);
        assert_eq!(outcome.total_votes, 1);
        assert_eq!(outcome.user_choice, Some(1));

        let other = PollOutcome::from_state(&state, Snowflake::new(200));
        assert_eq!(other.user_choice, None);
    }

    #[test]
    fn test_outcomes_serialize() {
        let outcome = SaveOutcome { saved: true };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"saved":true}"#);
    }
}
