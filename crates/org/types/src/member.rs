//! Membership records

use crate::{Address, Shares, Timestamp};
use serde::{Deserialize, Serialize};

/// Effective vote weight for a share balance: a member with zero shares
/// still counts as one vote.
pub fn voting_power(shares: Shares) -> u64 {
    shares.max(1)
}

/// A registered member of the organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's identity
    pub address: Address,
    /// False once removed
    pub exists: bool,
    /// Stewards may sponsor and execute proposals and move treasury funds
    pub is_steward: bool,
    /// Share balance; vote weight is `max(shares, 1)`
    pub shares: Shares,
    /// When the member was registered
    pub joined_at: Timestamp,
}

impl Member {
    pub fn new(address: Address, shares: Shares, joined_at: Timestamp) -> Self {
        Self {
            address,
            exists: true,
            is_steward: false,
            shares,
            joined_at,
        }
    }

    pub fn voting_power(&self) -> u64 {
        voting_power(self.shares)
    }
}

/// Genesis allocation used when an organization is created
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Genesis member
    pub address: Address,
    /// Initial share balance
    pub shares: Shares,
}

impl Allocation {
    pub fn new(address: Address, shares: Shares) -> Self {
        Self { address, shares }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_shares_still_vote_once() {
        assert_eq!(voting_power(0), 1);
        assert_eq!(voting_power(1), 1);
        assert_eq!(voting_power(50), 50);
    }

    #[test]
    fn new_member_is_not_a_steward() {
        let member = Member::new(Address::derive("dave"), 15, 10);
        assert!(member.exists);
        assert!(!member.is_steward);
        assert_eq!(member.voting_power(), 15);
    }
}
