//! Bookmark state - per-user set of saved subjects
//!
//! A pure membership toggle: no counters, no exclusivity with any other
//! reaction kind.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// The set of subject ids one user has saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkState {
    pub user_id: Snowflake,
    pub saved: HashSet<Snowflake>,
}

impl BookmarkState {
    /// Create an empty saved set for a user
    pub fn new(user_id: Snowflake) -> Self {
        Self {
            user_id,
            saved: HashSet::new(),
        }
    }

    /// Toggle membership of a subject, returning the resulting state
    pub fn toggle(&mut self, subject_id: Snowflake) -> bool {
        if self.saved.remove(&subject_id) {
            false
        } else {
            self.saved.insert(subject_id);
            true
        }
    }

    /// Whether the subject is currently saved
    pub fn is_saved(&self, subject_id: Snowflake) -> bool {
        self.saved.contains(&subject_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        let mut state = BookmarkState::new(Snowflake::new(100));
        let subject = Snowflake::new(1);

        assert!(state.toggle(subject));
        assert!(state.is_saved(subject));

        assert!(!state.toggle(subject));
        assert!(!state.is_saved(subject));
    }

    #[test]
    fn test_toggles_are_independent_per_subject() {
        let mut state = BookmarkState::new(Snowflake::new(100));

        state.toggle(Snowflake::new(1));
        state.toggle(Snowflake::new(2));
        state.toggle(Snowflake::new(1));

        assert!(!state.is_saved(Snowflake::new(1)));
        assert!(state.is_saved(Snowflake::new(2)));
        assert_eq!(state.saved.len(), 1);
    }
}
