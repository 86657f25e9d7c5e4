//! Poll state - exactly-one-of-N voting with revote-by-replacement
//!
//! A voter switches their choice by being removed from every option before
//! being inserted into the requested one. There is deliberately no path to
//! fully retract a poll vote; every successful cast leaves the user with
//! exactly one active choice.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// One poll option and the set of users currently voting for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    pub voters: HashSet<Snowflake>,
}

impl PollOption {
    /// Create an option with no voters
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voters: HashSet::new(),
        }
    }

    /// Number of active votes for this option
    #[inline]
    pub fn vote_count(&self) -> usize {
        self.voters.len()
    }
}

/// Reaction state of a single poll
///
/// Options are fixed at creation; only voter membership changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    pub poll_id: Snowflake,
    pub options: Vec<PollOption>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl PollState {
    /// Create a poll from its option texts
    pub fn new<I, S>(poll_id: Snowflake, options: I, expires_at: Option<DateTime<Utc>>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            poll_id,
            options: options.into_iter().map(PollOption::new).collect(),
            expires_at,
        }
    }

    /// Whether voting has closed as of `now`; reads stay available
    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expiry| now > expiry)
    }

    /// Cast or switch a vote
    ///
    /// The user is removed from every option first, then inserted into the
    /// requested one, so membership across all options always sums to one
    /// for any user who has voted.
    pub fn cast(&mut self, user_id: Snowflake, option_index: usize) -> Result<(), DomainError> {
        if option_index >= self.options.len() {
            return Err(DomainError::InvalidOption {
                index: option_index,
                option_count: self.options.len(),
            });
        }

        for option in &mut self.options {
            option.voters.remove(&user_id);
        }
        self.options[option_index].voters.insert(user_id);

        Ok(())
    }

    /// Distinct voters across all options
    pub fn total_votes(&self) -> usize {
        let mut voters: HashSet<Snowflake> = HashSet::new();
        for option in &self.options {
            voters.extend(&option.voters);
        }
        voters.len()
    }

    /// The option index the user currently votes for, if any
    pub fn choice_of(&self, user_id: Snowflake) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option.voters.contains(&user_id))
    }
}
