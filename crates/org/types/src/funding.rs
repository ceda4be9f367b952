//! Per-proposal escrow ledger
//!
//! Invariant: `total_raised` equals the sum of all contributions at all
//! times. A contribution entry is zero iff the contributor never deposited,
//! withdrew in full, or the pool was distributed.

use crate::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Funds raised against a proposal
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRecord {
    /// Escrowed amount still held for this proposal
    pub total_raised: Amount,
    /// Optional funding goal set at submission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Amount>,
    /// Outstanding balance per contributor
    pub contributions: BTreeMap<Address, Amount>,
    /// First-time contributors, in deposit order
    pub contributors: Vec<Address>,
    /// Amount paid out by distribution (fee + net)
    #[serde(default)]
    pub distributed: Amount,
}

impl FundingRecord {
    pub fn with_target(target: Option<Amount>) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    pub fn contribution_of(&self, contributor: &Address) -> Amount {
        self.contributions.get(contributor).copied().unwrap_or(0)
    }

    /// Credit a deposit. Returns true if this was the contributor's first.
    pub fn credit(&mut self, contributor: Address, amount: Amount) -> bool {
        let first_time = !self.contributions.contains_key(&contributor);
        if first_time {
            self.contributors.push(contributor);
        }
        let balance = self.contributions.entry(contributor).or_insert(0);
        *balance = balance.saturating_add(amount);
        self.total_raised = self.total_raised.saturating_add(amount);
        first_time
    }

    /// Zero a contributor's balance, returning what it held.
    pub fn take_contribution(&mut self, contributor: &Address) -> Amount {
        let amount = match self.contributions.get_mut(contributor) {
            Some(balance) => std::mem::take(balance),
            None => 0,
        };
        self.total_raised = self.total_raised.saturating_sub(amount);
        amount
    }

    /// Zero the whole pool for payout, returning the amount released.
    pub fn release_all(&mut self) -> Amount {
        let released = std::mem::take(&mut self.total_raised);
        for balance in self.contributions.values_mut() {
            *balance = 0;
        }
        self.distributed = self.distributed.saturating_add(released);
        released
    }

    pub fn is_consistent(&self) -> bool {
        self.contributions.values().copied().sum::<Amount>() == self.total_raised
    }

    pub fn info(&self) -> FundingInfo {
        FundingInfo {
            total_raised: self.total_raised,
            target: self.target,
            contributor_count: self.contributors.len() as u64,
            distributed: self.distributed,
        }
    }
}

/// Aggregate funding view
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingInfo {
    /// Currently escrowed
    pub total_raised: Amount,
    /// Funding goal, if any
    pub target: Option<Amount>,
    /// Distinct contributors, including those who withdrew
    pub contributor_count: u64,
    /// Paid out by distribution
    pub distributed: Amount,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credits_accumulate_and_track_first_time() {
        let alice = Address::derive("alice");
        let mut record = FundingRecord::default();
        assert!(record.credit(alice, 5));
        assert!(!record.credit(alice, 2));
        assert_eq!(record.contribution_of(&alice), 7);
        assert_eq!(record.contributors, vec![alice]);
        assert!(record.is_consistent());
    }

    #[test]
    fn full_withdrawal_keeps_contributor_listed() {
        let bob = Address::derive("bob");
        let mut record = FundingRecord::default();
        record.credit(bob, 3);
        assert_eq!(record.take_contribution(&bob), 3);
        assert_eq!(record.take_contribution(&bob), 0);
        assert_eq!(record.total_raised, 0);
        assert_eq!(record.contributors.len(), 1);
        assert!(record.is_consistent());

        // A returning contributor is not appended twice
        assert!(!record.credit(bob, 1));
        assert_eq!(record.contributors.len(), 1);
    }

    #[test]
    fn release_all_preserves_conservation() {
        let mut record = FundingRecord::with_target(Some(10));
        record.credit(Address::derive("a"), 4);
        record.credit(Address::derive("b"), 6);
        assert_eq!(record.release_all(), 10);
        assert_eq!(record.total_raised, 0);
        assert_eq!(record.distributed, 10);
        assert!(record.is_consistent());
        assert_eq!(record.info().contributor_count, 2);
    }
}
