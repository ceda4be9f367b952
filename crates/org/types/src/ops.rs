//! Operation names of the standard facet set.
//!
//! Each name hashes to its [`Selector`](crate::Selector) via
//! [`Selector::from_name`](crate::Selector::from_name).

// Initialization
pub const INITIALIZE: &str = "initialize";

// Membership
pub const REGISTER_MEMBER: &str = "registerMember";
pub const REMOVE_MEMBER: &str = "removeMember";
pub const ADD_STEWARD: &str = "addSteward";
pub const REMOVE_STEWARD: &str = "removeSteward";
pub const UPDATE_SHARES: &str = "updateShares";
pub const WHITELIST_INVESTOR: &str = "whitelistInvestor";
pub const WHITELIST_PROPOSER: &str = "whitelistProposer";
pub const BATCH_REGISTER_MEMBERS: &str = "batchRegisterMembers";
pub const IS_MEMBER: &str = "isMember";
pub const IS_STEWARD: &str = "isSteward";
pub const GET_MEMBER: &str = "getMember";
pub const GET_SHARES: &str = "getShares";
pub const MEMBER_COUNT: &str = "memberCount";
pub const GET_MEMBERS: &str = "getMembers";
pub const GET_STEWARDS: &str = "getStewards";
pub const IS_WHITELISTED_INVESTOR: &str = "isWhitelistedInvestor";
pub const IS_WHITELISTED_PROPOSER: &str = "isWhitelistedProposer";

// Proposal lifecycle
pub const SUBMIT_PROPOSAL: &str = "submitProposal";
pub const SPONSOR_PROPOSAL: &str = "sponsorProposal";
pub const CANCEL_PROPOSAL: &str = "cancelProposal";
pub const EXECUTE_PROPOSAL: &str = "executeProposal";
pub const GET_PROPOSAL: &str = "getProposal";
pub const PROPOSAL_COUNT: &str = "proposalCount";
pub const GET_PROPOSAL_IDS: &str = "getProposalIds";
pub const GET_PROPOSALS_BY_STATUS: &str = "getProposalsByStatus";
pub const IS_VOTING_OPEN: &str = "isVotingOpen";

// Governance
pub const SUBMIT_VOTE: &str = "submitVote";
pub const FINALIZE_PROPOSAL: &str = "finalizeProposal";
pub const HAS_VOTED: &str = "hasVoted";
pub const GET_VOTE: &str = "getVote";
pub const GET_VOTE_TALLY: &str = "getVoteTally";
pub const TOTAL_VOTING_POWER: &str = "totalVotingPower";
pub const GET_QUORUM: &str = "getQuorum";
pub const GET_MAJORITY: &str = "getMajority";

// Funding
pub const DEPOSIT: &str = "deposit";
pub const WITHDRAW: &str = "withdraw";
pub const DISTRIBUTE: &str = "distribute";
pub const EMERGENCY_WITHDRAW: &str = "emergencyWithdraw";
pub const GET_FUNDING_INFO: &str = "getFundingInfo";
pub const GET_CONTRIBUTION: &str = "getContribution";
pub const GET_CONTRIBUTORS: &str = "getContributors";
pub const HELD_BALANCE: &str = "heldBalance";

// Configuration
pub const SET_NUMBER: &str = "setNumber";
pub const SET_ADDRESS: &str = "setAddress";
pub const SET_STRING: &str = "setString";
pub const SET_PROPOSAL_RECIPIENT: &str = "setProposalRecipient";
pub const UPDATE_METADATA: &str = "updateMetadata";
pub const GET_NUMBER: &str = "getNumber";
pub const GET_ADDRESS: &str = "getAddress";
pub const GET_STRING: &str = "getString";
pub const GET_ORG_INFO: &str = "getOrgInfo";
pub const GET_GOVERNANCE_CONFIG: &str = "getGovernanceConfig";
