//! Typed client over an organization's operation envelope.
//!
//! Every method encodes its arguments with `serde_json`, dispatches one
//! [`Envelope`] through the router and decodes the typed result. Views are
//! dispatched with the organization's own address as caller.

use org_facets::args::{
    self, AddressArgs, BatchRegisterArgs, ContributorArgs, KeyArgs, MetadataArgs, NoArgs,
    ProposalArgs, RecipientArgs, RegisterMemberArgs, SetAddressArgs, SetNumberArgs,
    SetStringArgs, StatusArgs, SubmitProposalArgs, UpdateSharesArgs, VoteArgs, VoterArgs,
};
use org_router::{Envelope, FacetCut, FacetInfo, Host, Router};
use org_state::{GovernanceConfig, OrgState};
use org_types::{
    ops, Address, Amount, EventRecord, FundingInfo, Member, OrgError, OrgInfo, OrgResult, OrgType,
    Proposal, ProposalId, ProposalKind, ProposalStatus, Shares, VoteChoice, VoteTally,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

pub struct Organization {
    router: Router,
}

impl fmt::Debug for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Organization")
            .field("address", &self.router.address())
            .field("owner", &self.router.owner())
            .finish()
    }
}

impl Organization {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn address(&self) -> Address {
        self.router.address()
    }

    /// Current controller
    pub fn owner(&self) -> Address {
        self.router.owner()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn state(&self) -> &OrgState {
        self.router.state()
    }

    pub fn events(&self) -> &[EventRecord] {
        self.router.events()
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        self.router.drain_events()
    }

    pub fn facets(&self) -> Vec<FacetInfo> {
        self.router.facets()
    }

    pub fn supports_operation(&self, operation: &str) -> bool {
        self.router.supports_operation(operation)
    }

    /// Dispatch a raw envelope.
    pub fn dispatch(&mut self, host: &mut Host, envelope: Envelope) -> OrgResult<Value> {
        self.router.dispatch(host, envelope)
    }

    fn call<A: Serialize, R: DeserializeOwned>(
        &mut self,
        host: &mut Host,
        caller: Address,
        operation: &str,
        payload: &A,
        value: Amount,
    ) -> OrgResult<R> {
        let envelope = Envelope::new(caller, operation, args::encode(payload)?).with_value(value);
        let output = self.router.dispatch(host, envelope)?;
        serde_json::from_value(output).map_err(|e| OrgError::InvalidArguments(e.to_string()))
    }

    fn exec<A: Serialize>(
        &mut self,
        host: &mut Host,
        caller: Address,
        operation: &str,
        payload: &A,
    ) -> OrgResult<()> {
        self.call::<A, Value>(host, caller, operation, payload, 0)
            .map(|_| ())
    }

    fn view<A: Serialize, R: DeserializeOwned>(
        &mut self,
        host: &mut Host,
        operation: &str,
        payload: &A,
    ) -> OrgResult<R> {
        let caller = self.address();
        self.call(host, caller, operation, payload, 0)
    }

    // --- Router ---

    pub fn transfer_ownership(
        &mut self,
        host: &Host,
        caller: Address,
        new_owner: Address,
    ) -> OrgResult<()> {
        self.router.transfer_ownership(host, caller, new_owner)
    }

    pub fn diamond_cut(
        &mut self,
        host: &mut Host,
        caller: Address,
        cuts: Vec<FacetCut>,
        init: Option<(&str, Value)>,
    ) -> OrgResult<()> {
        self.router.diamond_cut(host, caller, cuts, init)
    }

    // --- Membership ---

    pub fn register_member(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
        shares: Shares,
    ) -> OrgResult<()> {
        self.exec(
            host,
            caller,
            ops::REGISTER_MEMBER,
            &RegisterMemberArgs { address, shares },
        )
    }

    pub fn remove_member(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::REMOVE_MEMBER, &AddressArgs { address })
    }

    pub fn add_steward(&mut self, host: &mut Host, caller: Address, address: Address) -> OrgResult<()> {
        self.exec(host, caller, ops::ADD_STEWARD, &AddressArgs { address })
    }

    pub fn remove_steward(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::REMOVE_STEWARD, &AddressArgs { address })
    }

    pub fn update_shares(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
        shares: Shares,
    ) -> OrgResult<()> {
        self.exec(
            host,
            caller,
            ops::UPDATE_SHARES,
            &UpdateSharesArgs { address, shares },
        )
    }

    pub fn whitelist_investor(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::WHITELIST_INVESTOR, &AddressArgs { address })
    }

    pub fn whitelist_proposer(
        &mut self,
        host: &mut Host,
        caller: Address,
        address: Address,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::WHITELIST_PROPOSER, &AddressArgs { address })
    }

    pub fn batch_register_members(
        &mut self,
        host: &mut Host,
        caller: Address,
        addresses: Vec<Address>,
        shares: Vec<Shares>,
    ) -> OrgResult<()> {
        self.exec(
            host,
            caller,
            ops::BATCH_REGISTER_MEMBERS,
            &BatchRegisterArgs { addresses, shares },
        )
    }

    pub fn is_member(&mut self, host: &mut Host, address: Address) -> OrgResult<bool> {
        self.view(host, ops::IS_MEMBER, &AddressArgs { address })
    }

    pub fn is_steward(&mut self, host: &mut Host, address: Address) -> OrgResult<bool> {
        self.view(host, ops::IS_STEWARD, &AddressArgs { address })
    }

    pub fn member(&mut self, host: &mut Host, address: Address) -> OrgResult<Option<Member>> {
        self.view(host, ops::GET_MEMBER, &AddressArgs { address })
    }

    pub fn shares(&mut self, host: &mut Host, address: Address) -> OrgResult<Shares> {
        self.view(host, ops::GET_SHARES, &AddressArgs { address })
    }

    pub fn member_count(&mut self, host: &mut Host) -> OrgResult<u64> {
        self.view(host, ops::MEMBER_COUNT, &NoArgs {})
    }

    pub fn members(&mut self, host: &mut Host) -> OrgResult<Vec<Address>> {
        self.view(host, ops::GET_MEMBERS, &NoArgs {})
    }

    pub fn stewards(&mut self, host: &mut Host) -> OrgResult<Vec<Address>> {
        self.view(host, ops::GET_STEWARDS, &NoArgs {})
    }

    pub fn is_whitelisted_investor(&mut self, host: &mut Host, address: Address) -> OrgResult<bool> {
        self.view(host, ops::IS_WHITELISTED_INVESTOR, &AddressArgs { address })
    }

    pub fn is_whitelisted_proposer(&mut self, host: &mut Host, address: Address) -> OrgResult<bool> {
        self.view(host, ops::IS_WHITELISTED_PROPOSER, &AddressArgs { address })
    }

    // --- Proposals ---

    pub fn submit_proposal(
        &mut self,
        host: &mut Host,
        caller: Address,
        kind: ProposalKind,
    ) -> OrgResult<ProposalId> {
        self.submit_proposal_with(
            host,
            caller,
            SubmitProposalArgs {
                kind,
                ..SubmitProposalArgs::default()
            },
        )
    }

    /// Submit with a title and / or funding target.
    pub fn submit_proposal_with(
        &mut self,
        host: &mut Host,
        caller: Address,
        args: SubmitProposalArgs,
    ) -> OrgResult<ProposalId> {
        self.call(host, caller, ops::SUBMIT_PROPOSAL, &args, 0)
    }

    pub fn sponsor_proposal(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::SPONSOR_PROPOSAL, &ProposalArgs { proposal })
    }

    pub fn cancel_proposal(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::CANCEL_PROPOSAL, &ProposalArgs { proposal })
    }

    pub fn execute_proposal(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::EXECUTE_PROPOSAL, &ProposalArgs { proposal })
    }

    pub fn proposal(&mut self, host: &mut Host, proposal: ProposalId) -> OrgResult<Proposal> {
        self.view(host, ops::GET_PROPOSAL, &ProposalArgs { proposal })
    }

    pub fn proposal_count(&mut self, host: &mut Host) -> OrgResult<u64> {
        self.view(host, ops::PROPOSAL_COUNT, &NoArgs {})
    }

    pub fn proposal_ids(&mut self, host: &mut Host) -> OrgResult<Vec<ProposalId>> {
        self.view(host, ops::GET_PROPOSAL_IDS, &NoArgs {})
    }

    pub fn proposals_by_status(
        &mut self,
        host: &mut Host,
        status: ProposalStatus,
    ) -> OrgResult<Vec<ProposalId>> {
        self.view(host, ops::GET_PROPOSALS_BY_STATUS, &StatusArgs { status })
    }

    pub fn is_voting_open(&mut self, host: &mut Host, proposal: ProposalId) -> OrgResult<bool> {
        self.view(host, ops::IS_VOTING_OPEN, &ProposalArgs { proposal })
    }

    // --- Governance ---

    pub fn vote(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
        choice: VoteChoice,
    ) -> OrgResult<()> {
        self.vote_raw(host, caller, proposal, u64::from(choice.as_u8()))
    }

    /// Vote with the wire encoding of the choice (0 = no, 1 = yes).
    pub fn vote_raw(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
        choice: u64,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::SUBMIT_VOTE, &VoteArgs { proposal, choice })
    }

    pub fn finalize_proposal(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<ProposalStatus> {
        self.call(host, caller, ops::FINALIZE_PROPOSAL, &ProposalArgs { proposal }, 0)
    }

    pub fn has_voted(
        &mut self,
        host: &mut Host,
        proposal: ProposalId,
        voter: Address,
    ) -> OrgResult<bool> {
        self.view(host, ops::HAS_VOTED, &VoterArgs { proposal, voter })
    }

    pub fn vote_of(
        &mut self,
        host: &mut Host,
        proposal: ProposalId,
        voter: Address,
    ) -> OrgResult<Option<VoteChoice>> {
        let raw: Option<u8> = self.view(host, ops::GET_VOTE, &VoterArgs { proposal, voter })?;
        raw.map(|choice| VoteChoice::try_from(u64::from(choice)).map_err(OrgError::InvalidVoteChoice))
            .transpose()
    }

    pub fn vote_tally(&mut self, host: &mut Host, proposal: ProposalId) -> OrgResult<VoteTally> {
        self.view(host, ops::GET_VOTE_TALLY, &ProposalArgs { proposal })
    }

    pub fn total_voting_power(&mut self, host: &mut Host) -> OrgResult<u64> {
        self.view(host, ops::TOTAL_VOTING_POWER, &NoArgs {})
    }

    pub fn quorum(&mut self, host: &mut Host) -> OrgResult<u64> {
        self.view(host, ops::GET_QUORUM, &NoArgs {})
    }

    pub fn majority(&mut self, host: &mut Host) -> OrgResult<u64> {
        self.view(host, ops::GET_MAJORITY, &NoArgs {})
    }

    // --- Funding ---

    pub fn deposit(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
        amount: Amount,
    ) -> OrgResult<()> {
        self.call::<_, Value>(host, caller, ops::DEPOSIT, &ProposalArgs { proposal }, amount)
            .map(|_| ())
    }

    pub fn withdraw(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<Amount> {
        self.call(host, caller, ops::WITHDRAW, &ProposalArgs { proposal }, 0)
    }

    pub fn distribute(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
    ) -> OrgResult<()> {
        self.exec(host, caller, ops::DISTRIBUTE, &ProposalArgs { proposal })
    }

    pub fn emergency_withdraw(&mut self, host: &mut Host, caller: Address) -> OrgResult<Amount> {
        self.call(host, caller, ops::EMERGENCY_WITHDRAW, &NoArgs {}, 0)
    }

    pub fn funding_info(&mut self, host: &mut Host, proposal: ProposalId) -> OrgResult<FundingInfo> {
        self.view(host, ops::GET_FUNDING_INFO, &ProposalArgs { proposal })
    }

    pub fn contribution(
        &mut self,
        host: &mut Host,
        proposal: ProposalId,
        contributor: Address,
    ) -> OrgResult<Amount> {
        self.view(
            host,
            ops::GET_CONTRIBUTION,
            &ContributorArgs {
                proposal,
                contributor,
            },
        )
    }

    pub fn contributors(
        &mut self,
        host: &mut Host,
        proposal: ProposalId,
    ) -> OrgResult<Vec<Address>> {
        self.view(host, ops::GET_CONTRIBUTORS, &ProposalArgs { proposal })
    }

    pub fn held_balance(&mut self, host: &mut Host) -> OrgResult<Amount> {
        self.view(host, ops::HELD_BALANCE, &NoArgs {})
    }

    // --- Configuration ---

    pub fn set_number(
        &mut self,
        host: &mut Host,
        caller: Address,
        key: &str,
        value: u64,
    ) -> OrgResult<()> {
        let payload = SetNumberArgs {
            key: key.to_string(),
            value,
        };
        self.exec(host, caller, ops::SET_NUMBER, &payload)
    }

    pub fn set_address(
        &mut self,
        host: &mut Host,
        caller: Address,
        key: &str,
        value: Address,
    ) -> OrgResult<()> {
        let payload = SetAddressArgs {
            key: key.to_string(),
            value,
        };
        self.exec(host, caller, ops::SET_ADDRESS, &payload)
    }

    pub fn set_string(
        &mut self,
        host: &mut Host,
        caller: Address,
        key: &str,
        value: &str,
    ) -> OrgResult<()> {
        let payload = SetStringArgs {
            key: key.to_string(),
            value: value.to_string(),
        };
        self.exec(host, caller, ops::SET_STRING, &payload)
    }

    pub fn set_proposal_recipient(
        &mut self,
        host: &mut Host,
        caller: Address,
        proposal: ProposalId,
        recipient: Address,
    ) -> OrgResult<()> {
        self.exec(
            host,
            caller,
            ops::SET_PROPOSAL_RECIPIENT,
            &RecipientArgs {
                proposal,
                recipient,
            },
        )
    }

    pub fn update_metadata(
        &mut self,
        host: &mut Host,
        caller: Address,
        name: &str,
        org_type: OrgType,
    ) -> OrgResult<()> {
        let payload = MetadataArgs {
            name: name.to_string(),
            org_type,
        };
        self.exec(host, caller, ops::UPDATE_METADATA, &payload)
    }

    pub fn number(&mut self, host: &mut Host, key: &str) -> OrgResult<Option<u64>> {
        self.view(host, ops::GET_NUMBER, &KeyArgs { key: key.to_string() })
    }

    pub fn address_value(&mut self, host: &mut Host, key: &str) -> OrgResult<Option<Address>> {
        self.view(host, ops::GET_ADDRESS, &KeyArgs { key: key.to_string() })
    }

    pub fn string(&mut self, host: &mut Host, key: &str) -> OrgResult<Option<String>> {
        self.view(host, ops::GET_STRING, &KeyArgs { key: key.to_string() })
    }

    pub fn org_info(&mut self, host: &mut Host) -> OrgResult<Option<OrgInfo>> {
        self.view(host, ops::GET_ORG_INFO, &NoArgs {})
    }

    pub fn governance_config(&mut self, host: &mut Host) -> OrgResult<GovernanceConfig> {
        self.view(host, ops::GET_GOVERNANCE_CONFIG, &NoArgs {})
    }
}
