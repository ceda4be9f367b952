//! Proposal lifecycle facet: submit, sponsor, cancel and execute.
//!
//! Governance owns the `Active → {Passed, Failed}` edge; every other status
//! change happens here. All of them go through [`transition`], which
//! refuses any edge outside the lifecycle graph.

use crate::args::{decode, encode, NoArgs, ProposalArgs, StatusArgs, SubmitProposalArgs};
use org_router::{Facet, Invocation};
use org_types::{
    ops, FundingRecord, OrgError, OrgEvent, OrgResult, Proposal, ProposalId, ProposalStatus,
    VoteRecord,
};
use serde_json::{json, Value};
use tracing::info;

/// Move a proposal along one edge of the lifecycle graph.
pub(crate) fn transition(proposal: &mut Proposal, next: ProposalStatus) -> OrgResult<()> {
    if !proposal.status.can_transition_to(next) {
        return Err(OrgError::InvalidTransition {
            from: proposal.status,
            to: next,
        });
    }
    proposal.status = next;
    Ok(())
}

/// Fail with `InvalidStatus` unless the proposal is in one of `allowed`.
pub(crate) fn expect_status(
    proposal: &Proposal,
    allowed: &[ProposalStatus],
    operation: &'static str,
) -> OrgResult<()> {
    if allowed.contains(&proposal.status) {
        Ok(())
    } else {
        Err(OrgError::InvalidStatus {
            proposal: proposal.id,
            status: proposal.status,
            operation,
        })
    }
}

pub struct ProposalFacet;

impl ProposalFacet {
    pub const OPERATIONS: &'static [&'static str] = &[
        ops::SUBMIT_PROPOSAL,
        ops::SPONSOR_PROPOSAL,
        ops::CANCEL_PROPOSAL,
        ops::EXECUTE_PROPOSAL,
        ops::GET_PROPOSAL,
        ops::PROPOSAL_COUNT,
        ops::GET_PROPOSAL_IDS,
        ops::GET_PROPOSALS_BY_STATUS,
        ops::IS_VOTING_OPEN,
    ];

    fn submit(&self, inv: &mut Invocation<'_>, args: SubmitProposalArgs) -> OrgResult<ProposalId> {
        let caller = inv.caller();
        if !inv.state.proposer_whitelist.contains(&caller) && !inv.state.is_steward(&caller) {
            return Err(OrgError::NotAuthorizedProposer(caller));
        }
        let now = inv.now();
        let state = &mut *inv.state;
        let id = ProposalId::derive(now, &caller, state.proposal_nonce);
        state.proposal_nonce += 1;

        state
            .proposals
            .insert(id, Proposal::new(id, caller, args.kind, args.title, now));
        state.proposal_ids.push(id);
        state.votes.insert(id, VoteRecord::default());
        state.funding.insert(id, FundingRecord::with_target(args.target));

        inv.emit(OrgEvent::ProposalSubmitted {
            proposal: id,
            proposer: caller,
            kind: args.kind,
        });
        Ok(id)
    }

    fn sponsor(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<()> {
        inv.require_steward()?;
        let deadline = inv.now().saturating_add(inv.state.config.voting_period());
        let proposal = inv.state.proposal_mut(&id)?;
        expect_status(proposal, &[ProposalStatus::Pending], ops::SPONSOR_PROPOSAL)?;
        transition(proposal, ProposalStatus::Active)?;
        proposal.voting_deadline = Some(deadline);

        info!(proposal = %id, voting_deadline = deadline, "Proposal sponsored");
        let sponsor = inv.caller();
        inv.emit(OrgEvent::ProposalSponsored {
            proposal: id,
            sponsor,
            voting_deadline: deadline,
        });
        Ok(())
    }

    fn cancel(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<()> {
        let caller = inv.caller();
        let is_controller = inv.is_controller();
        let proposal = inv.state.proposal_mut(&id)?;
        if proposal.proposer != caller && !is_controller {
            return Err(OrgError::NotProposerOrController(caller));
        }
        expect_status(
            proposal,
            &[ProposalStatus::Pending, ProposalStatus::Active],
            ops::CANCEL_PROPOSAL,
        )?;
        transition(proposal, ProposalStatus::Cancelled)?;

        info!(proposal = %id, by = %caller, "Proposal cancelled");
        inv.emit(OrgEvent::ProposalCancelled {
            proposal: id,
            by: caller,
        });
        Ok(())
    }

    fn execute(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<()> {
        inv.require_steward()?;
        let proposal = inv.state.proposal_mut(&id)?;
        expect_status(proposal, &[ProposalStatus::Passed], ops::EXECUTE_PROPOSAL)?;
        transition(proposal, ProposalStatus::Executed)?;

        info!(proposal = %id, "Proposal executed");
        let by = inv.caller();
        inv.emit(OrgEvent::ProposalExecuted { proposal: id, by });
        Ok(())
    }
}

impl Facet for ProposalFacet {
    fn name(&self) -> &'static str {
        "proposal"
    }

    fn operations(&self) -> &'static [&'static str] {
        Self::OPERATIONS
    }

    fn invoke(
        &self,
        inv: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<Value> {
        match operation {
            ops::GET_PROPOSAL => {
                let ProposalArgs { proposal } = decode(args)?;
                encode(inv.state.proposal(&proposal)?)
            }
            ops::PROPOSAL_COUNT => {
                let NoArgs {} = decode(args)?;
                Ok(json!(inv.state.proposal_ids.len() as u64))
            }
            ops::GET_PROPOSAL_IDS => encode(&inv.state.proposal_ids),
            ops::GET_PROPOSALS_BY_STATUS => {
                let StatusArgs { status } = decode(args)?;
                let state = &*inv.state;
                let ids: Vec<ProposalId> = state
                    .proposal_ids
                    .iter()
                    .filter(|id| state.proposals.get(*id).is_some_and(|p| p.status == status))
                    .copied()
                    .collect();
                encode(&ids)
            }
            ops::IS_VOTING_OPEN => {
                let ProposalArgs { proposal } = decode(args)?;
                let now = inv.now();
                Ok(json!(inv.state.proposal(&proposal)?.is_voting_open(now)))
            }
            _ => {
                inv.state.require_initialized()?;
                match operation {
                    ops::SUBMIT_PROPOSAL => {
                        let id = self.submit(inv, decode(args)?)?;
                        encode(&id)
                    }
                    ops::SPONSOR_PROPOSAL => {
                        let ProposalArgs { proposal } = decode(args)?;
                        self.sponsor(inv, proposal).map(|()| Value::Null)
                    }
                    ops::CANCEL_PROPOSAL => {
                        let ProposalArgs { proposal } = decode(args)?;
                        self.cancel(inv, proposal).map(|()| Value::Null)
                    }
                    ops::EXECUTE_PROPOSAL => {
                        let ProposalArgs { proposal } = decode(args)?;
                        self.execute(inv, proposal).map(|()| Value::Null)
                    }
                    other => Err(OrgError::UnknownOperation(org_types::Selector::from_name(
                        other,
                    ))),
                }
            }
        }
    }
}
