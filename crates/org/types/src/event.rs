//! Notifications emitted by mutating operations.
//!
//! Events are a side channel for external observers; nothing inside the
//! engine reads them back.

use crate::{
    Address, Amount, OrgType, ProposalId, ProposalKind, ProposalStatus, Selector, Shares,
    Timestamp, VoteChoice,
};
use serde::{Deserialize, Serialize};

/// Registry change requested by a facet cut
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutAction {
    Add,
    Replace,
    Remove,
}

/// Wire summary of one applied cut
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutSummary {
    pub facet: Address,
    pub action: CutAction,
    pub selectors: Vec<Selector>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum OrgEvent {
    // Router
    FacetCut {
        cuts: Vec<CutSummary>,
        initialized: bool,
    },
    OwnershipTransferred {
        previous: Address,
        new_owner: Address,
    },

    // Organization
    Initialized {
        name: String,
        org_type: OrgType,
        creator: Address,
    },
    MetadataUpdated {
        name: String,
        org_type: OrgType,
    },
    ConfigChanged {
        key: String,
        value: String,
    },

    // Membership
    MemberRegistered {
        member: Address,
        shares: Shares,
    },
    MemberRemoved {
        member: Address,
    },
    StewardAdded {
        steward: Address,
    },
    StewardRemoved {
        steward: Address,
    },
    SharesUpdated {
        member: Address,
        old_shares: Shares,
        new_shares: Shares,
    },
    InvestorWhitelisted {
        investor: Address,
    },
    ProposerWhitelisted {
        proposer: Address,
    },

    // Proposals
    ProposalSubmitted {
        proposal: ProposalId,
        proposer: Address,
        kind: ProposalKind,
    },
    ProposalSponsored {
        proposal: ProposalId,
        sponsor: Address,
        voting_deadline: Timestamp,
    },
    ProposalCancelled {
        proposal: ProposalId,
        by: Address,
    },
    ProposalExecuted {
        proposal: ProposalId,
        by: Address,
    },

    // Governance
    VoteCast {
        proposal: ProposalId,
        voter: Address,
        choice: VoteChoice,
        weight: u64,
    },
    ProposalFinalized {
        proposal: ProposalId,
        status: ProposalStatus,
        yes_votes: u64,
        no_votes: u64,
    },

    // Funding
    Deposited {
        proposal: ProposalId,
        contributor: Address,
        amount: Amount,
    },
    Withdrawn {
        proposal: ProposalId,
        contributor: Address,
        amount: Amount,
    },
    Distributed {
        proposal: ProposalId,
        fee_recipient: Address,
        fee: Amount,
        recipient: Address,
        net: Amount,
    },
    EmergencyWithdrawal {
        to: Address,
        amount: Amount,
    },
}

impl OrgEvent {
    pub fn name(&self) -> &'static str {
        match self {
            OrgEvent::FacetCut { .. } => "FacetCut",
            OrgEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            OrgEvent::Initialized { .. } => "Initialized",
            OrgEvent::MetadataUpdated { .. } => "MetadataUpdated",
            OrgEvent::ConfigChanged { .. } => "ConfigChanged",
            OrgEvent::MemberRegistered { .. } => "MemberRegistered",
            OrgEvent::MemberRemoved { .. } => "MemberRemoved",
            OrgEvent::StewardAdded { .. } => "StewardAdded",
            OrgEvent::StewardRemoved { .. } => "StewardRemoved",
            OrgEvent::SharesUpdated { .. } => "SharesUpdated",
            OrgEvent::InvestorWhitelisted { .. } => "InvestorWhitelisted",
            OrgEvent::ProposerWhitelisted { .. } => "ProposerWhitelisted",
            OrgEvent::ProposalSubmitted { .. } => "ProposalSubmitted",
            OrgEvent::ProposalSponsored { .. } => "ProposalSponsored",
            OrgEvent::ProposalCancelled { .. } => "ProposalCancelled",
            OrgEvent::ProposalExecuted { .. } => "ProposalExecuted",
            OrgEvent::VoteCast { .. } => "VoteCast",
            OrgEvent::ProposalFinalized { .. } => "ProposalFinalized",
            OrgEvent::Deposited { .. } => "Deposited",
            OrgEvent::Withdrawn { .. } => "Withdrawn",
            OrgEvent::Distributed { .. } => "Distributed",
            OrgEvent::EmergencyWithdrawal { .. } => "EmergencyWithdrawal",
        }
    }
}

/// An event as recorded by the router
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    pub timestamp: Timestamp,
    pub emitter: Address,
    #[serde(flatten)]
    pub event: OrgEvent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_tag() {
        let event = OrgEvent::StewardAdded {
            steward: Address::derive("alice"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "steward_added");
        assert_eq!(event.name(), "StewardAdded");
    }
}
