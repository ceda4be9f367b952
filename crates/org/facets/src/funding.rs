//! Funding facet: escrow of contributions per proposal.
//!
//! Value only leaves through [`Invocation::send`], which queues the payout
//! until the facet returns. Each operation here therefore finishes its own
//! bookkeeping before any transfer is attempted, and a failed transfer
//! unwinds that bookkeeping with the rest of the call.

use crate::args::{decode, encode, ContributorArgs, NoArgs, ProposalArgs};
use crate::proposal::expect_status;
use org_router::{Facet, Invocation};
use org_state::config::BPS_DENOMINATOR;
use org_types::{
    ops, Amount, FundingRecord, OrgError, OrgEvent, OrgResult, ProposalId, ProposalStatus,
};
use serde_json::{json, Value};
use tracing::info;

/// Split `total` into `(fee, net)` for a fee in basis points.
pub fn split_fee(total: Amount, fee_bps: u64) -> (Amount, Amount) {
    let fee = u128::from(total) * u128::from(fee_bps.min(BPS_DENOMINATOR))
        / u128::from(BPS_DENOMINATOR);
    // fee <= total, so the narrowing cannot fail
    let fee = Amount::try_from(fee).unwrap_or(total);
    (fee, total - fee)
}

pub struct FundingFacet;

impl FundingFacet {
    pub const OPERATIONS: &'static [&'static str] = &[
        ops::DEPOSIT,
        ops::WITHDRAW,
        ops::DISTRIBUTE,
        ops::EMERGENCY_WITHDRAW,
        ops::GET_FUNDING_INFO,
        ops::GET_CONTRIBUTION,
        ops::GET_CONTRIBUTORS,
        ops::HELD_BALANCE,
    ];

    pub const PAYABLE: &'static [&'static str] = &[ops::DEPOSIT];

    fn deposit(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<()> {
        let (contributor, amount) = (inv.caller(), inv.value());
        if amount == 0 {
            return Err(OrgError::ZeroValueDeposit);
        }
        let proposal = inv.state.proposal(&id)?;
        expect_status(
            proposal,
            &[ProposalStatus::Active, ProposalStatus::Passed],
            ops::DEPOSIT,
        )?;
        let whitelisted = inv.state.investor_whitelist.contains(&contributor);
        if !whitelisted && !inv.state.is_member(&contributor) {
            return Err(OrgError::NotInvestorOrMember(contributor));
        }

        inv.state
            .funding
            .entry(id)
            .or_default()
            .credit(contributor, amount);
        info!(proposal = %id, %contributor, amount, "Deposit received");
        inv.emit(OrgEvent::Deposited {
            proposal: id,
            contributor,
            amount,
        });
        Ok(())
    }

    fn withdraw(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<Amount> {
        let contributor = inv.caller();
        let proposal = inv.state.proposal(&id)?;
        expect_status(
            proposal,
            &[ProposalStatus::Failed, ProposalStatus::Cancelled],
            ops::WITHDRAW,
        )?;

        let amount = inv
            .state
            .funding
            .entry(id)
            .or_default()
            .take_contribution(&contributor);
        if amount == 0 {
            return Err(OrgError::NoContribution {
                proposal: id,
                contributor,
            });
        }
        inv.send(contributor, amount)?;

        info!(proposal = %id, %contributor, amount, "Contribution withdrawn");
        inv.emit(OrgEvent::Withdrawn {
            proposal: id,
            contributor,
            amount,
        });
        Ok(amount)
    }

    fn distribute(&self, inv: &mut Invocation<'_>, id: ProposalId) -> OrgResult<()> {
        inv.require_steward()?;
        let creator = inv.state.creator()?;
        let proposal = inv.state.proposal(&id)?;
        expect_status(proposal, &[ProposalStatus::Executed], ops::DISTRIBUTE)?;
        let proposer = proposal.proposer;

        let config = &inv.state.config;
        let fee_recipient = config.fee_recipient(creator);
        let recipient = config.recipient_for(&id, proposer);
        let fee_bps = config.management_fee_bps();

        let record = inv.state.funding.entry(id).or_default();
        if record.total_raised == 0 {
            return Err(OrgError::NothingToDistribute(id));
        }
        let (fee, net) = split_fee(record.total_raised, fee_bps);
        record.release_all();

        inv.send(fee_recipient, fee)?;
        inv.send(recipient, net)?;

        info!(
            proposal = %id,
            %fee_recipient,
            fee,
            %recipient,
            net,
            "Funds distributed"
        );
        inv.emit(OrgEvent::Distributed {
            proposal: id,
            fee_recipient,
            fee,
            recipient,
            net,
        });
        Ok(())
    }

    fn emergency_withdraw(&self, inv: &mut Invocation<'_>) -> OrgResult<Amount> {
        inv.require_controller()?;
        let to = inv.controller();
        let amount = inv.held_balance();
        inv.send(to, amount)?;

        info!(%to, amount, "Emergency withdrawal");
        inv.emit(OrgEvent::EmergencyWithdrawal { to, amount });
        Ok(amount)
    }
}

impl Facet for FundingFacet {
    fn name(&self) -> &'static str {
        "funding"
    }

    fn operations(&self) -> &'static [&'static str] {
        Self::OPERATIONS
    }

    fn payable(&self) -> &'static [&'static str] {
        Self::PAYABLE
    }

    fn invoke(
        &self,
        inv: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<Value> {
        match operation {
            ops::GET_FUNDING_INFO => {
                let ProposalArgs { proposal } = decode(args)?;
                inv.state.proposal(&proposal)?;
                let info = inv
                    .state
                    .funding
                    .get(&proposal)
                    .map(FundingRecord::info)
                    .unwrap_or_default();
                encode(&info)
            }
            ops::GET_CONTRIBUTION => {
                let ContributorArgs {
                    proposal,
                    contributor,
                } = decode(args)?;
                inv.state.proposal(&proposal)?;
                let amount = inv
                    .state
                    .funding
                    .get(&proposal)
                    .map_or(0, |record| record.contribution_of(&contributor));
                Ok(json!(amount))
            }
            ops::GET_CONTRIBUTORS => {
                let ProposalArgs { proposal } = decode(args)?;
                inv.state.proposal(&proposal)?;
                let contributors = inv
                    .state
                    .funding
                    .get(&proposal)
                    .map(|record| record.contributors.clone())
                    .unwrap_or_default();
                encode(&contributors)
            }
            ops::HELD_BALANCE => Ok(json!(inv.held_balance())),
            _ => {
                inv.state.require_initialized()?;
                match operation {
                    ops::DEPOSIT => {
                        let ProposalArgs { proposal } = decode(args)?;
                        self.deposit(inv, proposal).map(|()| Value::Null)
                    }
                    ops::WITHDRAW => {
                        let ProposalArgs { proposal } = decode(args)?;
                        Ok(json!(self.withdraw(inv, proposal)?))
                    }
                    ops::DISTRIBUTE => {
                        let ProposalArgs { proposal } = decode(args)?;
                        self.distribute(inv, proposal).map(|()| Value::Null)
                    }
                    ops::EMERGENCY_WITHDRAW => {
                        let NoArgs {} = decode(args)?;
                        Ok(json!(self.emergency_withdraw(inv)?))
                    }
                    other => Err(OrgError::UnknownOperation(org_types::Selector::from_name(
                        other,
                    ))),
                }
            }
        }
    }
}
