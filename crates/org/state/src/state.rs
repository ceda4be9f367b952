use crate::config::ConfigStore;
use org_types::{
    Address, FundingRecord, Member, OrgError, OrgMetadata, OrgResult, Proposal, ProposalId,
    VoteRecord,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Namespace the state record is addressed by. Bumped with [`STATE_VERSION`].
pub const STATE_NAMESPACE: &str = "org.diamond.storage.v1";
pub const STATE_VERSION: u32 = 1;

/// Storage slot derived from the namespace.
pub fn storage_slot() -> [u8; 32] {
    *blake3::hash(STATE_NAMESPACE.as_bytes()).as_bytes()
}

/// Unordered steward set with O(1) swap-and-pop removal.
///
/// Removal moves the last steward into the vacated position, so list order
/// is not preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StewardSet {
    list: Vec<Address>,
    index: BTreeMap<Address, usize>,
}

impl StewardSet {
    pub fn contains(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    pub fn insert(&mut self, address: Address) -> bool {
        if self.contains(&address) {
            return false;
        }
        self.index.insert(address, self.list.len());
        self.list.push(address);
        true
    }

    pub fn remove(&mut self, address: &Address) -> bool {
        let Some(position) = self.index.remove(address) else {
            return false;
        };
        self.list.swap_remove(position);
        if let Some(moved) = self.list.get(position) {
            self.index.insert(*moved, position);
        }
        true
    }

    pub fn as_slice(&self) -> &[Address] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

/// The single shared state record of an organization.
///
/// Every facet receives a mutable reference to the same instance for the
/// duration of a call. Facets hold no persistent fields of their own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgState {
    pub version: u32,
    pub namespace: String,

    /// `None` until the initialization facet has run
    pub metadata: Option<OrgMetadata>,

    // Membership
    pub members: BTreeMap<Address, Member>,
    pub member_list: Vec<Address>,
    pub member_count: u64,
    pub stewards: StewardSet,
    pub investor_whitelist: BTreeSet<Address>,
    pub proposer_whitelist: BTreeSet<Address>,
    /// Σ max(shares, 1) over members, maintained on every membership change
    pub total_voting_power: u64,

    // Proposals
    pub proposals: BTreeMap<ProposalId, Proposal>,
    pub proposal_ids: Vec<ProposalId>,
    pub proposal_nonce: u64,

    // Governance
    pub votes: BTreeMap<ProposalId, VoteRecord>,

    // Treasury
    pub funding: BTreeMap<ProposalId, FundingRecord>,

    pub config: ConfigStore,
}

impl Default for OrgState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            namespace: STATE_NAMESPACE.to_string(),
            metadata: None,
            members: BTreeMap::new(),
            member_list: Vec::new(),
            member_count: 0,
            stewards: StewardSet::default(),
            investor_whitelist: BTreeSet::new(),
            proposer_whitelist: BTreeSet::new(),
            total_voting_power: 0,
            proposals: BTreeMap::new(),
            proposal_ids: Vec::new(),
            proposal_nonce: 0,
            votes: BTreeMap::new(),
            funding: BTreeMap::new(),
            config: ConfigStore::default(),
        }
    }
}

impl OrgState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata.is_some()
    }

    pub fn metadata(&self) -> OrgResult<&OrgMetadata> {
        self.metadata.as_ref().ok_or(OrgError::NotInitialized)
    }

    pub fn require_initialized(&self) -> OrgResult<()> {
        self.metadata().map(|_| ())
    }

    pub fn creator(&self) -> OrgResult<Address> {
        Ok(self.metadata()?.creator)
    }

    pub fn member(&self, address: &Address) -> Option<&Member> {
        self.members.get(address).filter(|m| m.exists)
    }

    pub fn is_member(&self, address: &Address) -> bool {
        self.member(address).is_some()
    }

    pub fn is_steward(&self, address: &Address) -> bool {
        self.stewards.contains(address)
    }

    pub fn proposal(&self, id: &ProposalId) -> OrgResult<&Proposal> {
        self.proposals
            .get(id)
            .ok_or(OrgError::ProposalNotFound(*id))
    }

    pub fn proposal_mut(&mut self, id: &ProposalId) -> OrgResult<&mut Proposal> {
        self.proposals
            .get_mut(id)
            .ok_or(OrgError::ProposalNotFound(*id))
    }

    /// Recompute Σ max(shares, 1) by iteration. Used to check the cached
    /// aggregate; never on the hot path.
    pub fn recomputed_voting_power(&self) -> u64 {
        self.members
            .values()
            .filter(|m| m.exists)
            .map(Member::voting_power)
            .sum()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_versioned_and_uninitialized() {
        let state = OrgState::new();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.namespace, STATE_NAMESPACE);
        assert!(!state.is_initialized());
        assert_eq!(state.require_initialized(), Err(OrgError::NotInitialized));
        assert_eq!(storage_slot(), storage_slot());
    }

    #[test]
    fn steward_swap_remove_keeps_index_consistent() {
        let [a, b, c] = ["a", "b", "c"].map(Address::derive);
        let mut set = StewardSet::default();
        assert!(set.insert(a));
        assert!(set.insert(b));
        assert!(set.insert(c));
        assert!(!set.insert(b));

        assert!(set.remove(&a));
        assert_eq!(set.as_slice(), &[c, b]);
        assert!(set.remove(&b));
        assert_eq!(set.as_slice(), &[c]);
        assert!(!set.remove(&b));
        assert!(set.contains(&c));
        assert!(set.remove(&c));
        assert!(set.is_empty());
    }

    #[test]
    fn missing_proposal_is_not_found() {
        let state = OrgState::new();
        let id = ProposalId::derive(0, &Address::derive("p"), 0);
        assert_eq!(state.proposal(&id), Err(OrgError::ProposalNotFound(id)));
    }

    #[test]
    fn state_survives_json_export() {
        let mut state = OrgState::new();
        let alice = Address::derive("alice");
        state.members.insert(alice, Member::new(alice, 3, 1));
        state.member_list.push(alice);
        state.stewards.insert(alice);
        state.config.set_string("MOTTO", "together");

        let json = state.to_json().unwrap();
        let restored = OrgState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }
}
