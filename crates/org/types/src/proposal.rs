//! Proposals and their lifecycle
//!
//! ```text
//! Pending ──sponsor──▶ Active ──finalize──▶ Passed ──execute──▶ Executed
//!    │                   │  └────finalize──▶ Failed
//!    └──cancel──▶ Cancelled ◀──cancel──┘
//! ```
//!
//! No other transition is legal.

use crate::{Address, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    /// Submitted, awaiting a steward sponsor
    #[default]
    Pending,
    /// Open for voting until the deadline
    Active,
    /// Finalized with quorum and majority met
    Passed,
    /// Finalized without quorum or majority
    Failed,
    /// Withdrawn by the proposer or the controller
    Cancelled,
    /// Carried out by a steward; releases escrowed funds
    Executed,
}

impl ProposalStatus {
    pub fn can_transition_to(self, next: ProposalStatus) -> bool {
        use ProposalStatus::*;
        matches!(
            (self, next),
            (Pending, Active)
                | (Pending, Cancelled)
                | (Active, Passed)
                | (Active, Failed)
                | (Active, Cancelled)
                | (Passed, Executed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProposalStatus::Failed | ProposalStatus::Cancelled | ProposalStatus::Executed
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Active => "active",
            ProposalStatus::Passed => "passed",
            ProposalStatus::Failed => "failed",
            ProposalStatus::Cancelled => "cancelled",
            ProposalStatus::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a proposal asks the organization to decide
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProposalKind {
    /// Raise and disburse funds to a recipient
    #[default]
    Funding,
    /// Change governance parameters
    Governance,
    /// Admit or remove members
    Membership,
    /// Move treasury assets
    Treasury,
    /// Anything else; signalling only
    General,
}

impl FromStr for ProposalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "funding" => Ok(ProposalKind::Funding),
            "governance" => Ok(ProposalKind::Governance),
            "membership" => Ok(ProposalKind::Membership),
            "treasury" => Ok(ProposalKind::Treasury),
            "general" => Ok(ProposalKind::General),
            other => Err(format!("unknown proposal kind: {other}")),
        }
    }
}

/// A single decision request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    /// Derived from the submission nonce, proposer and time
    pub id: ProposalId,
    /// Who submitted it; default payout recipient
    pub proposer: Address,
    /// What the proposal is about
    pub kind: ProposalKind,
    /// Optional free-text title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// When it was submitted
    pub created_at: Timestamp,
    /// Unset until the proposal is sponsored
    pub voting_deadline: Option<Timestamp>,
    /// Weighted yes votes
    pub yes_votes: u64,
    /// Weighted no votes
    pub no_votes: u64,
    /// Current lifecycle status
    pub status: ProposalStatus,
}

impl Proposal {
    pub fn new(
        id: ProposalId,
        proposer: Address,
        kind: ProposalKind,
        title: Option<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            proposer,
            kind,
            title,
            created_at,
            voting_deadline: None,
            yes_votes: 0,
            no_votes: 0,
            status: ProposalStatus::Pending,
        }
    }

    /// `Active` and the deadline has not yet been reached.
    pub fn is_voting_open(&self, now: Timestamp) -> bool {
        self.status == ProposalStatus::Active
            && self.voting_deadline.is_some_and(|deadline| now < deadline)
    }

    /// `Active` and the deadline has been reached.
    pub fn is_finalizable(&self, now: Timestamp) -> bool {
        self.status == ProposalStatus::Active
            && self.voting_deadline.is_some_and(|deadline| now >= deadline)
    }
}
