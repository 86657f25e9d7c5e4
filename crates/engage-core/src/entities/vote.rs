//! Binary vote state - mutually exclusive up/down reactions on one subject
//!
//! The voter sets are authoritative; the score is always derived from set
//! cardinality after mutation, never incremented independently.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Vote direction for binary-vote subjects (posts and comments)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Up,
    Down,
}

impl Polarity {
    /// The opposing direction
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// Up/down reaction sets for a single subject
///
/// Invariant: a user id appears in at most one of the two sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteState {
    pub subject_id: Snowflake,
    pub upvotes: HashSet<Snowflake>,
    pub downvotes: HashSet<Snowflake>,
}

impl VoteState {
    /// Create empty vote state for a freshly created subject
    pub fn new(subject_id: Snowflake) -> Self {
        Self {
            subject_id,
            upvotes: HashSet::new(),
            downvotes: HashSet::new(),
        }
    }

    fn set(&mut self, polarity: Polarity) -> &mut HashSet<Snowflake> {
        match polarity {
            Polarity::Up => &mut self.upvotes,
            Polarity::Down => &mut self.downvotes,
        }
    }

    /// Apply a vote toggle for one user
    ///
    /// Re-applying the polarity the user already holds retracts it; applying
    /// the other polarity migrates the user across sets. The user can never
    /// end up in both sets.
    pub fn toggle(&mut self, user_id: Snowflake, polarity: Polarity) {
        if self.set(polarity).contains(&user_id) {
            self.set(polarity).remove(&user_id);
        } else {
            self.set(polarity.opposite()).remove(&user_id);
            self.set(polarity).insert(user_id);
        }
    }

    /// Net score, recomputed from set cardinality
    pub fn score(&self) -> i64 {
        self.upvotes.len() as i64 - self.downvotes.len() as i64
    }

    /// Whether the user currently holds an upvote
    pub fn user_upvoted(&self, user_id: Snowflake) -> bool {
        self.upvotes.contains(&user_id)
    }

    /// Whether the user currently holds a downvote
    pub fn user_downvoted(&self, user_id: Snowflake) -> bool {
        self.downvotes.contains(&user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(n: i64) -> Snowflake {
        Snowflake::new(n)
    }

    #[test]
    fn test_fresh_subject_scores_zero() {
        let state = VoteState::new(Snowflake::new(1));
        assert_eq!(state.score(), 0);
        assert!(!state.user_upvoted(user(100)));
        assert!(!state.user_downvoted(user(100)));
    }

    #[test]
    fn test_upvote_then_retract() {
        let mut state = VoteState::new(Snowflake::new(1));

        state.toggle(user(100), Polarity::Up);
        assert_eq!(state.score(), 1);
        assert!(state.user_upvoted(user(100)));

        state.toggle(user(100), Polarity::Up);
        assert_eq!(state.score(), 0);
        assert!(!state.user_upvoted(user(100)));
    }

    #[test]
    fn test_downvote_migrates_existing_upvote() {
        let mut state = VoteState::new(Snowflake::new(1));

        state.toggle(user(100), Polarity::Up);
        state.toggle(user(100), Polarity::Down);

        assert_eq!(state.score(), -1);
        assert!(!state.user_upvoted(user(100)));
        assert!(state.user_downvoted(user(100)));
    }

    #[test]
    fn test_never_in_both_sets() {
        let mut state = VoteState::new(Snowflake::new(1));
        let polarities = [Polarity::Up, Polarity::Down, Polarity::Down, Polarity::Up];

        for polarity in polarities {
            state.toggle(user(100), polarity);
            assert!(
                !(state.upvotes.contains(&user(100)) && state.downvotes.contains(&user(100))),
                "user must never hold both polarities"
            );
        }
    }

    #[test]
    fn test_score_tracks_multiple_users() {
        let mut state = VoteState::new(Snowflake::new(1));

        state.toggle(user(1), Polarity::Up);
        state.toggle(user(2), Polarity::Up);
        state.toggle(user(3), Polarity::Down);

        assert_eq!(state.score(), 1);
        assert_eq!(state.upvotes.len(), 2);
        assert_eq!(state.downvotes.len(), 1);
    }

    #[test]
    fn test_polarity_opposite() {
        assert_eq!(Polarity::Up.opposite(), Polarity::Down);
        assert_eq!(Polarity::Down.opposite(), Polarity::Up);
    }
}
