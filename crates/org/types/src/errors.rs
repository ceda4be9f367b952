//! Error types for organization operations

use crate::{Address, Amount, ProposalId, ProposalStatus, Selector};
use serde::{Deserialize, Serialize};

/// Failure category. Every [`OrgError`] belongs to exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Caller lacks the required role
    Authorization,
    /// Unknown operation, proposal, member or facet
    NotFound,
    /// Operation attempted in the wrong lifecycle state
    InvalidState,
    /// Malformed or out-of-range input
    InvalidInput,
    /// An outbound value transfer did not complete
    TransferFailure,
}

/// Errors that can occur in organization operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrgError {
    // --- Authorization ---
    #[error("caller {0} is not the controller")]
    NotController(Address),

    #[error("caller {0} is not a steward")]
    NotSteward(Address),

    #[error("caller {0} is not a member")]
    NotMember(Address),

    #[error("caller {0} is neither a whitelisted proposer nor a steward")]
    NotAuthorizedProposer(Address),

    #[error("caller {0} is neither the proposer nor the controller")]
    NotProposerOrController(Address),

    #[error("caller {0} is neither a whitelisted investor nor a member")]
    NotInvestorOrMember(Address),

    // --- Not found ---
    #[error("unknown operation: {0}")]
    UnknownOperation(Selector),

    #[error("proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    #[error("member not found: {0}")]
    MemberNotFound(Address),

    // --- Invalid state ---
    #[error("organization not initialized")]
    NotInitialized,

    #[error("organization already initialized")]
    AlreadyInitialized,

    #[error("already a member: {0}")]
    AlreadyMember(Address),

    #[error("steward status of {address} is already {is_steward}")]
    StewardUnchanged { address: Address, is_steward: bool },

    #[error("proposal {proposal} is {status}; cannot {operation}")]
    InvalidStatus {
        proposal: ProposalId,
        status: ProposalStatus,
        operation: &'static str,
    },

    #[error("illegal status transition: {from} -> {to}")]
    InvalidTransition {
        from: ProposalStatus,
        to: ProposalStatus,
    },

    #[error("voting on proposal {0} has closed")]
    VotingClosed(ProposalId),

    #[error("voting on proposal {0} is still open")]
    VotingStillOpen(ProposalId),

    #[error("{voter} has already voted on proposal {proposal}")]
    AlreadyVoted { proposal: ProposalId, voter: Address },

    #[error("{contributor} has no contribution to proposal {proposal}")]
    NoContribution {
        proposal: ProposalId,
        contributor: Address,
    },

    #[error("nothing raised for proposal {0}")]
    NothingToDistribute(ProposalId),

    #[error("selector already registered: {0}")]
    SelectorAlreadyRegistered(Selector),

    #[error("selector not registered: {0}")]
    SelectorNotRegistered(Selector),

    #[error("selector {selector} is already served by facet {facet}")]
    SameFacetReplacement { selector: Selector, facet: Address },

    #[error("facet address {0} is already bound to a different implementation")]
    FacetAddressConflict(Address),

    // --- Invalid input ---
    #[error("zero address")]
    ZeroAddress,

    #[error("batch length mismatch: {addresses} addresses, {shares} share entries")]
    BatchLengthMismatch { addresses: usize, shares: usize },

    #[error("invalid vote choice {0}: expected 0 (no) or 1 (yes)")]
    InvalidVoteChoice(u64),

    #[error("deposit requires a positive value")]
    ZeroValueDeposit,

    #[error("operation {0} does not accept value")]
    NonPayable(Selector),

    #[error("facet cut has no selectors")]
    EmptyCut,

    #[error("facet cut is missing the facet implementation for {0}")]
    MissingFacet(Address),

    #[error("facet {facet} does not implement selector {selector}")]
    SelectorNotImplemented { selector: Selector, facet: Address },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("invalid value for {key}: {reason}")]
    InvalidConfigValue { key: String, reason: String },

    // --- Transfer failure ---
    #[error("transfer of {amount} to {to} failed: {reason}")]
    TransferFailed {
        to: Address,
        amount: Amount,
        reason: String,
    },
}

impl OrgError {
    pub fn kind(&self) -> ErrorKind {
        use OrgError::*;
        match self {
            NotController(_)
            | NotSteward(_)
            | NotMember(_)
            | NotAuthorizedProposer(_)
            | NotProposerOrController(_)
            | NotInvestorOrMember(_) => ErrorKind::Authorization,

            UnknownOperation(_) | ProposalNotFound(_) | MemberNotFound(_) => ErrorKind::NotFound,

            NotInitialized
            | AlreadyInitialized
            | AlreadyMember(_)
            | StewardUnchanged { .. }
            | InvalidStatus { .. }
            | InvalidTransition { .. }
            | VotingClosed(_)
            | VotingStillOpen(_)
            | AlreadyVoted { .. }
            | NoContribution { .. }
            | NothingToDistribute(_)
            | SelectorAlreadyRegistered(_)
            | SelectorNotRegistered(_)
            | SameFacetReplacement { .. }
            | FacetAddressConflict(_) => ErrorKind::InvalidState,

            ZeroAddress
            | BatchLengthMismatch { .. }
            | InvalidVoteChoice(_)
            | ZeroValueDeposit
            | NonPayable(_)
            | EmptyCut
            | MissingFacet(_)
            | SelectorNotImplemented { .. }
            | InvalidArguments(_)
            | InvalidConfigValue { .. } => ErrorKind::InvalidInput,

            TransferFailed { .. } => ErrorKind::TransferFailure,
        }
    }
}

/// Result type alias for organization operations
pub type OrgResult<T> = Result<T, OrgError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_map_to_categories() {
        let who = Address::derive("mallory");
        assert_eq!(OrgError::NotSteward(who).kind(), ErrorKind::Authorization);
        assert_eq!(
            OrgError::UnknownOperation(Selector::from_name("nope")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(OrgError::AlreadyInitialized.kind(), ErrorKind::InvalidState);
        assert_eq!(OrgError::InvalidVoteChoice(7).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            OrgError::TransferFailed {
                to: who,
                amount: 1,
                reason: "rejected".into()
            }
            .kind(),
            ErrorKind::TransferFailure
        );
    }

    #[test]
    fn invalid_status_names_the_operation() {
        let id = ProposalId::derive(1, &Address::derive("p"), 0);
        let err = OrgError::InvalidStatus {
            proposal: id,
            status: ProposalStatus::Executed,
            operation: "sponsor",
        };
        let s = err.to_string();
        assert!(s.contains("executed"));
        assert!(s.contains("sponsor"));
    }
}
