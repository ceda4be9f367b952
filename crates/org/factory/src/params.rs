//! Creation parameters, loadable from JSON.

use org_facets::args::{GenesisMember, InitializeArgs};
use org_state::config::{
    DEFAULT_MAJORITY, DEFAULT_MANAGEMENT_FEE_BPS, DEFAULT_QUORUM, DEFAULT_VOTING_PERIOD,
};
use org_types::{Address, Allocation, OrgError, OrgResult, OrgType, Shares, Timestamp};
use serde::{Deserialize, Serialize};

/// Full creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrgParams {
    pub name: String,
    #[serde(default)]
    pub org_type: OrgType,
    /// Genesis allocations
    #[serde(default)]
    pub members: Vec<Allocation>,
    /// Whether genesis members start as stewards
    #[serde(default = "default_genesis_stewards")]
    pub genesis_stewards: bool,
    #[serde(default)]
    pub voting: VotingParams,
    #[serde(default)]
    pub fees: FeeParams,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingParams {
    #[serde(default = "default_voting_period")]
    pub voting_period: Timestamp,
    #[serde(default = "default_quorum")]
    pub quorum: u64,
    #[serde(default = "default_majority")]
    pub majority: u64,
}

impl Default for VotingParams {
    fn default() -> Self {
        Self {
            voting_period: default_voting_period(),
            quorum: default_quorum(),
            majority: default_majority(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParams {
    #[serde(default = "default_management_fee_bps")]
    pub management_fee_bps: u64,
    /// Defaults to the organization's creator
    #[serde(default)]
    pub fee_recipient: Option<Address>,
}

impl Default for FeeParams {
    fn default() -> Self {
        Self {
            management_fee_bps: default_management_fee_bps(),
            fee_recipient: None,
        }
    }
}

const fn default_genesis_stewards() -> bool {
    true
}

const fn default_voting_period() -> Timestamp {
    DEFAULT_VOTING_PERIOD
}

const fn default_quorum() -> u64 {
    DEFAULT_QUORUM
}

const fn default_majority() -> u64 {
    DEFAULT_MAJORITY
}

const fn default_management_fee_bps() -> u64 {
    DEFAULT_MANAGEMENT_FEE_BPS
}

impl CreateOrgParams {
    pub fn new(name: impl Into<String>, org_type: OrgType) -> Self {
        Self {
            name: name.into(),
            org_type,
            members: Vec::new(),
            genesis_stewards: default_genesis_stewards(),
            voting: VotingParams::default(),
            fees: FeeParams::default(),
        }
    }

    pub fn with_member(mut self, address: Address, shares: Shares) -> Self {
        self.members.push(Allocation::new(address, shares));
        self
    }

    pub fn with_voting(mut self, voting: VotingParams) -> Self {
        self.voting = voting;
        self
    }

    pub fn with_fees(mut self, fees: FeeParams) -> Self {
        self.fees = fees;
        self
    }

    pub fn from_json(json: &str) -> OrgResult<Self> {
        serde_json::from_str(json).map_err(|e| OrgError::InvalidArguments(e.to_string()))
    }

    /// Payload for the `initialize` call attached to the creation cut.
    pub fn initialize_args(&self, creator: Address) -> InitializeArgs {
        InitializeArgs {
            name: self.name.clone(),
            org_type: self.org_type,
            creator: Some(creator),
            members: self
                .members
                .iter()
                .map(|allocation| GenesisMember {
                    address: allocation.address,
                    shares: allocation.shares,
                    steward: self.genesis_stewards,
                })
                .collect(),
            voting_period: Some(self.voting.voting_period),
            quorum: Some(self.voting.quorum),
            majority: Some(self.voting.majority),
            management_fee_bps: Some(self.fees.management_fee_bps),
            fee_recipient: self.fees.fee_recipient,
        }
    }
}
