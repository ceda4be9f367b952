//! Votes and tallies

use crate::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A voter's choice. Encoded on the wire as `0` (no) or `1` (yes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteChoice {
    No,
    Yes,
}

impl VoteChoice {
    pub fn as_u8(self) -> u8 {
        match self {
            VoteChoice::No => 0,
            VoteChoice::Yes => 1,
        }
    }
}

impl TryFrom<u64> for VoteChoice {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(VoteChoice::No),
            1 => Ok(VoteChoice::Yes),
            other => Err(other),
        }
    }
}

/// Per-proposal record of who voted and how.
///
/// Each member votes at most once per proposal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub choices: BTreeMap<Address, VoteChoice>,
    pub voter_count: u64,
}

impl VoteRecord {
    pub fn has_voted(&self, voter: &Address) -> bool {
        self.choices.contains_key(voter)
    }

    pub fn choice_of(&self, voter: &Address) -> Option<VoteChoice> {
        self.choices.get(voter).copied()
    }

    /// Record a vote. Returns false if `voter` has already voted.
    pub fn record(&mut self, voter: Address, choice: VoteChoice) -> bool {
        if self.has_voted(&voter) {
            return false;
        }
        self.choices.insert(voter, choice);
        self.voter_count += 1;
        true
    }
}

/// Aggregate vote counts for a proposal
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTally {
    /// Weighted yes votes
    pub yes_votes: u64,
    /// Weighted no votes
    pub no_votes: u64,
    /// Distinct voters
    pub voter_count: u64,
}

impl VoteTally {
    pub fn participation(&self) -> u64 {
        self.yes_votes.saturating_add(self.no_votes)
    }
}
