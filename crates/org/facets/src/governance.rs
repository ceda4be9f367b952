//! Governance facet: weighted voting and finalization.
//!
//! Finalization is the consensus step. It turns the accumulated yes / no
//! weights into one binding `Passed` or `Failed` status, and can happen at
//! most once because it requires the proposal to still be `Active`.

use crate::args::{decode, encode, NoArgs, ProposalArgs, VoteArgs, VoterArgs};
use crate::proposal::{expect_status, transition};
use org_router::{Facet, Invocation};
use org_types::{
    ops, voting_power, OrgError, OrgEvent, OrgResult, ProposalId, ProposalStatus, VoteChoice,
    VoteTally,
};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Whether a tally passes under integer-percentage `quorum` and `majority`.
///
/// Quorum: `(yes + no) * 100 >= total_power * quorum`.
/// Majority: `yes > no` and `yes * 100 >= (yes + no) * majority`.
/// Products are taken in `u128` so no tally can overflow.
pub fn tally_passes(yes: u64, no: u64, total_power: u64, quorum: u64, majority: u64) -> bool {
    let (yes, no) = (u128::from(yes), u128::from(no));
    let participation = yes + no;
    let quorum_met = participation * 100 >= u128::from(total_power) * u128::from(quorum);
    let majority_met = yes > no && yes * 100 >= participation * u128::from(majority);
    quorum_met && majority_met
}

pub struct GovernanceFacet;

impl GovernanceFacet {
    pub const OPERATIONS: &'static [&'static str] = &[
        ops::SUBMIT_VOTE,
        ops::FINALIZE_PROPOSAL,
        ops::HAS_VOTED,
        ops::GET_VOTE,
        ops::GET_VOTE_TALLY,
        ops::TOTAL_VOTING_POWER,
        ops::GET_QUORUM,
        ops::GET_MAJORITY,
    ];

    fn submit_vote(&self, inv: &mut Invocation<'_>, args: VoteArgs) -> OrgResult<()> {
        let choice =
            VoteChoice::try_from(args.choice).map_err(OrgError::InvalidVoteChoice)?;
        let id = args.proposal;
        let (voter, now) = (inv.caller(), inv.now());

        let proposal = inv.state.proposal(&id)?;
        expect_status(proposal, &[ProposalStatus::Active], ops::SUBMIT_VOTE)?;
        if !proposal.is_voting_open(now) {
            return Err(OrgError::VotingClosed(id));
        }
        let weight = inv
            .state
            .member(&voter)
            .map(|m| voting_power(m.shares))
            .ok_or(OrgError::NotMember(voter))?;

        let record = inv.state.votes.entry(id).or_default();
        if !record.record(voter, choice) {
            return Err(OrgError::AlreadyVoted {
                proposal: id,
                voter,
            });
        }
        let proposal = inv.state.proposal_mut(&id)?;
        match choice {
            VoteChoice::Yes => proposal.yes_votes = proposal.yes_votes.saturating_add(weight),
            VoteChoice::No => proposal.no_votes = proposal.no_votes.saturating_add(weight),
        }

        debug!(proposal = %id, %voter, ?choice, weight, "Vote cast");
        inv.emit(OrgEvent::VoteCast {
            proposal: id,
            voter,
            choice,
            weight,
        });
        Ok(())
    }

    fn finalize(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<ProposalStatus> {
        let now = inv.now();
        let quorum = inv.state.config.quorum();
        let majority = inv.state.config.majority();
        let total_power = inv.state.total_voting_power;

        let proposal = inv.state.proposal_mut(&id)?;
        expect_status(proposal, &[ProposalStatus::Active], ops::FINALIZE_PROPOSAL)?;
        if !proposal.is_finalizable(now) {
            return Err(OrgError::VotingStillOpen(id));
        }
        let (yes_votes, no_votes) = (proposal.yes_votes, proposal.no_votes);
        let outcome = if tally_passes(yes_votes, no_votes, total_power, quorum, majority) {
            ProposalStatus::Passed
        } else {
            ProposalStatus::Failed
        };
        transition(proposal, outcome)?;

        info!(
            proposal = %id,
            status = %outcome,
            yes_votes,
            no_votes,
            total_power,
            quorum,
            majority,
            "Proposal finalized"
        );
        inv.emit(OrgEvent::ProposalFinalized {
            proposal: id,
            status: outcome,
            yes_votes,
            no_votes,
        });
        Ok(outcome)
    }
}

impl Facet for GovernanceFacet {
    fn name(&self) -> &'static str {
        "governance"
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
            ops::SUBMIT_VOTE => {
                inv.state.require_initialized()?;
                self.submit_vote(inv, decode(args)?)?;
                Ok(Value::Null)
            }
            ops::FINALIZE_PROPOSAL => {
                inv.state.require_initialized()?;
                let ProposalArgs { proposal } = decode(args)?;
                encode(&self.finalize(inv, proposal)?)
            }
            ops::HAS_VOTED => {
                let VoterArgs { proposal, voter } = decode(args)?;
                inv.state.proposal(&proposal)?;
                let voted = inv
                    .state
                    .votes
                    .get(&proposal)
                    .is_some_and(|record| record.has_voted(&voter));
                Ok(json!(voted))
            }
            ops::GET_VOTE => {
                let VoterArgs { proposal, voter } = decode(args)?;
                inv.state.proposal(&proposal)?;
                let choice = inv
                    .state
                    .votes
                    .get(&proposal)
                    .and_then(|record| record.choice_of(&voter));
                Ok(json!(choice.map(VoteChoice::as_u8)))
            }
            ops::GET_VOTE_TALLY => {
                let ProposalArgs { proposal } = decode(args)?;
                let record = inv.state.proposal(&proposal)?;
                let tally = VoteTally {
                    yes_votes: record.yes_votes,
                    no_votes: record.no_votes,
                    voter_count: inv
                        .state
                        .votes
                        .get(&proposal)
                        .map_or(0, |votes| votes.voter_count),
                };
                encode(&tally)
            }
            ops::TOTAL_VOTING_POWER => Ok(json!(inv.state.total_voting_power)),
            ops::GET_QUORUM => {
                let NoArgs {} = decode(args)?;
                Ok(json!(inv.state.config.quorum()))
            }
            ops::GET_MAJORITY => {
                let NoArgs {} = decode(args)?;
                Ok(json!(inv.state.config.majority()))
            }
            other => Err(OrgError::UnknownOperation(org_types::Selector::from_name(
                other,
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::Fixture;
    use org_state::config::DEFAULT_VOTING_PERIOD;
    use org_types::Address;
    use proptest::prelude::*;

    #[test]
    fn tally_rules_at_defaults() {
        // 20% quorum of 100 is 20 weight
        assert!(tally_passes(20, 0, 100, 20, 50));
        assert!(!tally_passes(19, 0, 100, 20, 50));
        // a tie never passes, even at a 50% majority
        assert!(!tally_passes(30, 30, 100, 20, 50));
        assert!(tally_passes(31, 30, 100, 20, 50));
        // super-majority
        assert!(!tally_passes(60, 40, 100, 20, 67));
        assert!(tally_passes(67, 33, 100, 20, 67));
        assert!(!tally_passes(0, 0, 0, 20, 50));
    }

    proptest! {
        #[test]
        fn tally_never_passes_without_strict_lead(
            yes in 0u64..u64::MAX,
            no in 0u64..u64::MAX,
            total in 0u64..u64::MAX,
            quorum in 1u64..=100,
            majority in 1u64..=100,
        ) {
            if tally_passes(yes, no, total, quorum, majority) {
                prop_assert!(yes > no);
            }
        }
    }

    #[test]
    fn vote_weight_is_at_least_one() {
        let mut fx = Fixture::initialized();
        let steward = fx.steward("s");
        let zero = fx.member("zero", 0);
        let heavy = fx.member("heavy", 40);
        let id = fx.active_proposal(steward);

        fx.call(zero, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 1}))
            .unwrap();
        fx.call(heavy, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 0}))
            .unwrap();
        let tally: VoteTally =
            serde_json::from_value(fx.view(ops::GET_VOTE_TALLY, json!({"proposal": id})))
                .unwrap();
        assert_eq!(
            tally,
            VoteTally {
                yes_votes: 1,
                no_votes: 40,
                voter_count: 2
            }
        );
        assert_eq!(
            fx.view(ops::GET_VOTE, json!({"proposal": id, "voter": heavy})),
            json!(0)
        );
        assert_eq!(
            fx.view(ops::GET_VOTE, json!({"proposal": id, "voter": steward})),
            Value::Null
        );
    }

    #[test]
    fn second_vote_changes_nothing() {
        let mut fx = Fixture::initialized();
        let steward = fx.steward("s");
        let voter = fx.member("v", 5);
        let id = fx.active_proposal(steward);
        fx.call(voter, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 1}))
            .unwrap();
        assert_eq!(
            fx.call(voter, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 0})),
            Err(OrgError::AlreadyVoted {
                proposal: id,
                voter
            })
        );
        let proposal = fx.state().proposal(&id).unwrap();
        assert_eq!((proposal.yes_votes, proposal.no_votes), (5, 0));
        assert_eq!(fx.state().votes[&id].voter_count, 1);
        assert_eq!(
            fx.view(ops::HAS_VOTED, json!({"proposal": id, "voter": voter})),
            json!(true)
        );
    }

    #[test]
    fn vote_preconditions() {
        let mut fx = Fixture::initialized();
        let steward = fx.steward("s");
        let outsider = Address::derive("outsider");
        let pending = fx.submit(steward);
        let active = fx.active_proposal(steward);

        assert_eq!(
            fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": active, "choice": 2})),
            Err(OrgError::InvalidVoteChoice(2))
        );
        assert_eq!(
            fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": active, "choice": 256})),
            Err(OrgError::InvalidVoteChoice(256))
        );
        assert_eq!(
            fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": active, "choice": u64::MAX})),
            Err(OrgError::InvalidVoteChoice(u64::MAX))
        );
        assert!(matches!(
            fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": pending, "choice": 1})),
            Err(OrgError::InvalidStatus {
                status: ProposalStatus::Pending,
                ..
            })
        ));
        assert_eq!(
            fx.call(outsider, ops::SUBMIT_VOTE, json!({"proposal": active, "choice": 1})),
            Err(OrgError::NotMember(outsider))
        );

        fx.host.advance(DEFAULT_VOTING_PERIOD);
        assert_eq!(
            fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": active, "choice": 1})),
            Err(OrgError::VotingClosed(active))
        );
    }

    #[test]
    fn finalize_waits_for_deadline_and_runs_once() {
        let mut fx = Fixture::initialized();
        let steward = fx.steward("s");
        let id = fx.active_proposal(steward);
        fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 1}))
            .unwrap();

        assert_eq!(
            fx.call(steward, ops::FINALIZE_PROPOSAL, json!({"proposal": id})),
            Err(OrgError::VotingStillOpen(id))
        );
        fx.host.advance(DEFAULT_VOTING_PERIOD);
        let status = fx
            .call(steward, ops::FINALIZE_PROPOSAL, json!({"proposal": id}))
            .unwrap();
        assert_eq!(status, json!("passed"));
        assert!(matches!(
            fx.call(steward, ops::FINALIZE_PROPOSAL, json!({"proposal": id})),
            Err(OrgError::InvalidStatus {
                status: ProposalStatus::Passed,
                ..
            })
        ));
    }

    #[test]
    fn low_turnout_fails() {
        let mut fx = Fixture::initialized();
        let steward = fx.steward("s");
        fx.member("whale", 100);
        let id = fx.active_proposal(steward);
        fx.call(steward, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 1}))
            .unwrap();
        fx.host.advance(DEFAULT_VOTING_PERIOD);
        fx.call(steward, ops::FINALIZE_PROPOSAL, json!({"proposal": id}))
            .unwrap();
        assert_eq!(
            fx.state().proposal(&id).unwrap().status,
            ProposalStatus::Failed
        );
    }

    #[test]
    fn super_majority_overrides_majority() {
        let mut fx = Fixture::initialized();
        fx.owner_call(ops::SET_NUMBER, json!({"key": "MAJORITY", "value": 60}))
            .unwrap();
        assert_eq!(fx.view(ops::GET_MAJORITY, json!({})), json!(60));
        fx.owner_call(ops::SET_NUMBER, json!({"key": "SUPER_MAJORITY", "value": 75}))
            .unwrap();
        assert_eq!(fx.view(ops::GET_MAJORITY, json!({})), json!(75));
        assert_eq!(fx.view(ops::GET_QUORUM, json!({})), json!(20));
    }
}
