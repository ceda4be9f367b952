//! Hosting environment: logical clock and value ledger.
//!
//! The router never reads wall-clock time or holds value itself; both come
//! from the [`Host`] passed into every call.

use chrono::Utc;
use org_types::{Address, Amount, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Reasons a value transfer can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransferError {
    #[error("insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: Amount, available: Amount },

    #[error("recipient {0} rejected the transfer")]
    Rejected(Address),

    #[error("balance overflow for {0}")]
    Overflow(Address),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    now: Timestamp,
    balances: BTreeMap<Address, Amount>,
    /// Recipients whose receive hook refuses value
    rejecting: BTreeSet<Address>,
}

impl Host {
    /// Host whose clock starts at the current wall-clock second.
    pub fn new() -> Self {
        Self::at(Utc::now().timestamp().max(0) as Timestamp)
    }

    pub fn at(now: Timestamp) -> Self {
        Self {
            now,
            balances: BTreeMap::new(),
            rejecting: BTreeSet::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    pub fn advance(&mut self, seconds: Timestamp) {
        self.now = self.now.saturating_add(seconds);
    }

    pub fn set_time(&mut self, now: Timestamp) {
        self.now = now;
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Credit new value to an account.
    pub fn mint(&mut self, account: Address, amount: Amount) -> Result<(), TransferError> {
        let balance = self.balances.entry(account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(TransferError::Overflow(account))?;
        Ok(())
    }

    pub fn reject_transfers_to(&mut self, account: Address) {
        self.rejecting.insert(account);
    }

    pub fn accept_transfers_to(&mut self, account: &Address) {
        self.rejecting.remove(account);
    }

    pub fn transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.rejecting.contains(&to) {
            return Err(TransferError::Rejected(to));
        }
        let available = self.balance_of(&from);
        if available < amount {
            return Err(TransferError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TransferError::Overflow(to))?;
        self.balances.insert(from, available - amount);
        self.balances.insert(to, credited);
        Ok(())
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_moves_value() {
        let (a, b) = (Address::derive("a"), Address::derive("b"));
        let mut host = Host::at(0);
        host.mint(a, 10).unwrap();
        host.transfer(a, b, 4).unwrap();
        assert_eq!(host.balance_of(&a), 6);
        assert_eq!(host.balance_of(&b), 4);
    }

    #[test]
    fn self_transfer_is_neutral() {
        let a = Address::derive("a");
        let mut host = Host::at(0);
        host.mint(a, 5).unwrap();
        host.transfer(a, a, 5).unwrap();
        assert_eq!(host.balance_of(&a), 5);
    }

    #[test]
    fn insufficient_balance_is_rejected() {
        let (a, b) = (Address::derive("a"), Address::derive("b"));
        let mut host = Host::at(0);
        host.mint(a, 1).unwrap();
        assert_eq!(
            host.transfer(a, b, 2),
            Err(TransferError::InsufficientBalance {
                required: 2,
                available: 1
            })
        );
        assert_eq!(host.balance_of(&a), 1);
    }

    #[test]
    fn rejecting_recipient_blocks_transfer() {
        let (a, b) = (Address::derive("a"), Address::derive("b"));
        let mut host = Host::at(0);
        host.mint(a, 3).unwrap();
        host.reject_transfers_to(b);
        assert_eq!(host.transfer(a, b, 1), Err(TransferError::Rejected(b)));
        host.accept_transfers_to(&b);
        assert!(host.transfer(a, b, 1).is_ok());
    }

    #[test]
    fn clock_advances() {
        let mut host = Host::at(100);
        host.advance(50);
        assert_eq!(host.now(), 150);
        host.set_time(10);
        assert_eq!(host.now(), 10);
    }
}
