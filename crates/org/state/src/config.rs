//! Configuration store: three namespaced key → value maps.
//!
//! Keys are hashed names (`ConfigKey::named("QUORUM")`), so facets never
//! collide on a key by accident. Unset keys fall back to the defaults below.

use org_types::{Address, ConfigKey, OrgError, OrgResult, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known key names.
pub mod keys {
    pub const VOTING_PERIOD: &str = "VOTING_PERIOD";
    pub const QUORUM: &str = "QUORUM";
    pub const MAJORITY: &str = "MAJORITY";
    /// Alias of `MAJORITY`; takes precedence when set.
    pub const SUPER_MAJORITY: &str = "SUPER_MAJORITY";
    pub const MANAGEMENT_FEE: &str = "MANAGEMENT_FEE";
    pub const FEE_RECIPIENT: &str = "FEE_RECIPIENT";
}

/// 7 days
pub const DEFAULT_VOTING_PERIOD: Timestamp = 7 * 24 * 60 * 60;
/// Percent of total voting power that must participate
pub const DEFAULT_QUORUM: u64 = 20;
/// Percent of participating weight that must vote yes
pub const DEFAULT_MAJORITY: u64 = 50;
/// Basis points of the raised amount taken as a management fee
pub const DEFAULT_MANAGEMENT_FEE_BPS: u64 = 200;
pub const BPS_DENOMINATOR: u64 = 10_000;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigStore {
    numbers: BTreeMap<ConfigKey, u64>,
    addresses: BTreeMap<ConfigKey, Address>,
    strings: BTreeMap<ConfigKey, String>,
}

impl ConfigStore {
    pub fn number(&self, name: &str) -> Option<u64> {
        self.numbers.get(&ConfigKey::named(name)).copied()
    }

    pub fn address(&self, name: &str) -> Option<Address> {
        self.addresses.get(&ConfigKey::named(name)).copied()
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.strings.get(&ConfigKey::named(name)).map(String::as_str)
    }

    /// Set a numeric value, validating well-known keys.
    pub fn set_number(&mut self, name: &str, value: u64) -> OrgResult<()> {
        validate_number(name, value)?;
        self.numbers.insert(ConfigKey::named(name), value);
        Ok(())
    }

    pub fn set_address(&mut self, name: &str, value: Address) -> OrgResult<()> {
        if value.is_zero() {
            return Err(OrgError::ZeroAddress);
        }
        self.addresses.insert(ConfigKey::named(name), value);
        Ok(())
    }

    pub fn set_string(&mut self, name: &str, value: impl Into<String>) {
        self.strings.insert(ConfigKey::named(name), value.into());
    }

    pub fn set_recipient(&mut self, proposal: &ProposalId, recipient: Address) -> OrgResult<()> {
        if recipient.is_zero() {
            return Err(OrgError::ZeroAddress);
        }
        self.addresses.insert(ConfigKey::recipient(proposal), recipient);
        Ok(())
    }

    pub fn voting_period(&self) -> Timestamp {
        self.number(keys::VOTING_PERIOD)
            .unwrap_or(DEFAULT_VOTING_PERIOD)
    }

    pub fn quorum(&self) -> u64 {
        self.number(keys::QUORUM).unwrap_or(DEFAULT_QUORUM)
    }

    pub fn majority(&self) -> u64 {
        self.number(keys::SUPER_MAJORITY)
            .or_else(|| self.number(keys::MAJORITY))
            .unwrap_or(DEFAULT_MAJORITY)
    }

    pub fn management_fee_bps(&self) -> u64 {
        self.number(keys::MANAGEMENT_FEE)
            .unwrap_or(DEFAULT_MANAGEMENT_FEE_BPS)
    }

    pub fn fee_recipient(&self, creator: Address) -> Address {
        self.address(keys::FEE_RECIPIENT).unwrap_or(creator)
    }

    pub fn recipient_for(&self, proposal: &ProposalId, proposer: Address) -> Address {
        self.addresses
            .get(&ConfigKey::recipient(proposal))
            .copied()
            .unwrap_or(proposer)
    }

    pub fn governance(&self, creator: Address) -> GovernanceConfig {
        GovernanceConfig {
            voting_period: self.voting_period(),
            quorum: self.quorum(),
            majority: self.majority(),
            management_fee_bps: self.management_fee_bps(),
            fee_recipient: self.fee_recipient(creator),
        }
    }
}

fn validate_number(name: &str, value: u64) -> OrgResult<()> {
    let reason = match name {
        keys::VOTING_PERIOD if value == 0 => Some("voting period must be positive"),
        keys::QUORUM | keys::MAJORITY | keys::SUPER_MAJORITY if !(1..=100).contains(&value) => {
            Some("percentage must be within 1..=100")
        }
        keys::MANAGEMENT_FEE if value > BPS_DENOMINATOR => Some("fee exceeds 10000 basis points"),
        _ => None,
    };
    match reason {
        Some(reason) => Err(OrgError::InvalidConfigValue {
            key: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

/// Effective governance parameters, defaults applied
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    pub voting_period: Timestamp,
    pub quorum: u64,
    pub majority: u64,
    pub management_fee_bps: u64,
    pub fee_recipient: Address,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let store = ConfigStore::default();
        let creator = Address::derive("creator");
        let config = store.governance(creator);
        assert_eq!(config.voting_period, 604_800);
        assert_eq!(config.quorum, 20);
        assert_eq!(config.majority, 50);
        assert_eq!(config.management_fee_bps, 200);
        assert_eq!(config.fee_recipient, creator);
    }

    #[test]
    fn super_majority_takes_precedence() {
        let mut store = ConfigStore::default();
        store.set_number(keys::MAJORITY, 60).unwrap();
        assert_eq!(store.majority(), 60);
        store.set_number(keys::SUPER_MAJORITY, 67).unwrap();
        assert_eq!(store.majority(), 67);
    }

    #[test]
    fn well_known_keys_are_validated() {
        let mut store = ConfigStore::default();
        assert!(store.set_number(keys::QUORUM, 0).is_err());
        assert!(store.set_number(keys::QUORUM, 101).is_err());
        assert!(store.set_number(keys::MANAGEMENT_FEE, 10_001).is_err());
        assert!(store.set_number(keys::VOTING_PERIOD, 0).is_err());
        assert!(store.set_number("CUSTOM_LIMIT", 0).is_ok());
        assert_eq!(store.quorum(), DEFAULT_QUORUM);
    }

    #[test]
    fn recipient_defaults_to_proposer() {
        let mut store = ConfigStore::default();
        let proposer = Address::derive("proposer");
        let id = ProposalId::derive(5, &proposer, 0);
        assert_eq!(store.recipient_for(&id, proposer), proposer);

        let payee = Address::derive("payee");
        store.set_recipient(&id, payee).unwrap();
        assert_eq!(store.recipient_for(&id, proposer), payee);
        assert_eq!(store.set_recipient(&id, Address::ZERO), Err(OrgError::ZeroAddress));
    }

    #[test]
    fn string_values_are_namespaced() {
        let mut store = ConfigStore::default();
        store.set_string("DESCRIPTION", "pooled fund");
        assert_eq!(store.string("DESCRIPTION"), Some("pooled fund"));
        assert_eq!(store.string("description"), None);
    }
}
