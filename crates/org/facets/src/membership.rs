//! Membership facet: members, stewards, share weights and allow-lists.
//!
//! Every mutation keeps `total_voting_power` equal to Σ max(shares, 1) by
//! applying the delta of the member it touches, never by iteration.

use crate::args::{
    decode, encode, AddressArgs, BatchRegisterArgs, RegisterMemberArgs, UpdateSharesArgs,
};
use org_router::{Facet, Invocation};
use org_types::{ops, voting_power, Address, Member, OrgError, OrgEvent, OrgResult, Shares};
use serde_json::{json, Value};
use tracing::debug;

pub struct MembershipFacet;

impl MembershipFacet {
    pub const OPERATIONS: &'static [&'static str] = &[
        ops::REGISTER_MEMBER,
        ops::REMOVE_MEMBER,
        ops::ADD_STEWARD,
        ops::REMOVE_STEWARD,
        ops::UPDATE_SHARES,
        ops::WHITELIST_INVESTOR,
        ops::WHITELIST_PROPOSER,
        ops::BATCH_REGISTER_MEMBERS,
        ops::IS_MEMBER,
        ops::IS_STEWARD,
        ops::GET_MEMBER,
        ops::GET_SHARES,
        ops::MEMBER_COUNT,
        ops::GET_MEMBERS,
        ops::GET_STEWARDS,
        ops::IS_WHITELISTED_INVESTOR,
        ops::IS_WHITELISTED_PROPOSER,
    ];
}

impl Facet for MembershipFacet {
    fn name(&self) -> &'static str {
        "membership"
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
            ops::IS_MEMBER => {
                let AddressArgs { address } = decode(args)?;
                Ok(json!(inv.state.is_member(&address)))
            }
            ops::IS_STEWARD => {
                let AddressArgs { address } = decode(args)?;
                Ok(json!(inv.state.is_steward(&address)))
            }
            ops::GET_MEMBER => {
                let AddressArgs { address } = decode(args)?;
                encode(&inv.state.member(&address))
            }
            ops::GET_SHARES => {
                let AddressArgs { address } = decode(args)?;
                Ok(json!(inv.state.member(&address).map_or(0, |m| m.shares)))
            }
            ops::MEMBER_COUNT => Ok(json!(inv.state.member_count)),
            ops::GET_MEMBERS => encode(&inv.state.member_list),
            ops::GET_STEWARDS => encode(&inv.state.stewards.as_slice()),
            ops::IS_WHITELISTED_INVESTOR => {
                let AddressArgs { address } = decode(args)?;
                Ok(json!(inv.state.investor_whitelist.contains(&address)))
            }
            ops::IS_WHITELISTED_PROPOSER => {
                let AddressArgs { address } = decode(args)?;
                Ok(json!(inv.state.proposer_whitelist.contains(&address)))
            }
            _ => {
                inv.state.require_initialized()?;
                inv.require_controller()?;
                self.mutate(inv, operation, args)?;
                Ok(Value::Null)
            }
        }
    }
}

impl MembershipFacet {
    fn mutate(
        &self,
        inv: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<()> {
        match operation {
            ops::REGISTER_MEMBER => {
                let RegisterMemberArgs { address, shares } = decode(args)?;
                register(inv, address, shares)
            }
            ops::REMOVE_MEMBER => {
                let AddressArgs { address } = decode(args)?;
                remove(inv, address)
            }
            ops::ADD_STEWARD => {
                let AddressArgs { address } = decode(args)?;
                grant_steward(inv, address)
            }
            ops::REMOVE_STEWARD => {
                let AddressArgs { address } = decode(args)?;
                revoke_steward(inv, address)
            }
            ops::UPDATE_SHARES => {
                let UpdateSharesArgs { address, shares } = decode(args)?;
                update_shares(inv, address, shares)
            }
            ops::WHITELIST_INVESTOR => {
                let AddressArgs { address } = decode(args)?;
                nonzero(address)?;
                if inv.state.investor_whitelist.insert(address) {
                    inv.emit(OrgEvent::InvestorWhitelisted { investor: address });
                }
                Ok(())
            }
            ops::WHITELIST_PROPOSER => {
                let AddressArgs { address } = decode(args)?;
                nonzero(address)?;
                if inv.state.proposer_whitelist.insert(address) {
                    inv.emit(OrgEvent::ProposerWhitelisted { proposer: address });
                }
                Ok(())
            }
            ops::BATCH_REGISTER_MEMBERS => {
                let BatchRegisterArgs { addresses, shares } = decode(args)?;
                if addresses.len() != shares.len() {
                    return Err(OrgError::BatchLengthMismatch {
                        addresses: addresses.len(),
                        shares: shares.len(),
                    });
                }
                // a failure part way through is undone by the router
                for (address, shares) in addresses.into_iter().zip(shares) {
                    register(inv, address, shares)?;
                }
                Ok(())
            }
            other => Err(OrgError::UnknownOperation(org_types::Selector::from_name(other))),
        }
    }
}

fn nonzero(address: Address) -> OrgResult<()> {
    if address.is_zero() {
        Err(OrgError::ZeroAddress)
    } else {
        Ok(())
    }
}

pub(crate) fn register(
    inv: &mut Invocation<'_>,
    address: Address,
    shares: Shares,
) -> OrgResult<()> {
    nonzero(address)?;
    if inv.state.is_member(&address) {
        return Err(OrgError::AlreadyMember(address));
    }
    let now = inv.now();
    let state = &mut *inv.state;
    state.members.insert(address, Member::new(address, shares, now));
    state.member_list.push(address);
    state.member_count += 1;
    state.total_voting_power = state.total_voting_power.saturating_add(voting_power(shares));
    debug!(member = %address, shares, "Member registered");
    inv.emit(OrgEvent::MemberRegistered {
        member: address,
        shares,
    });
    Ok(())
}

fn remove(inv: &mut Invocation<'_>, address: Address) -> OrgResult<()> {
    let power = inv
        .state
        .member(&address)
        .map(Member::voting_power)
        .ok_or(OrgError::MemberNotFound(address))?;
    if inv.state.is_steward(&address) {
        revoke_steward(inv, address)?;
    }
    let state = &mut *inv.state;
    state.members.remove(&address);
    if let Some(position) = state.member_list.iter().position(|m| *m == address) {
        state.member_list.swap_remove(position);
    }
    state.member_count = state.member_count.saturating_sub(1);
    state.total_voting_power = state.total_voting_power.saturating_sub(power);
    inv.emit(OrgEvent::MemberRemoved { member: address });
    Ok(())
}

/// Grant steward status, registering the address with zero shares first
/// if it is not yet a member.
pub(crate) fn grant_steward(inv: &mut Invocation<'_>, address: Address) -> OrgResult<()> {
    if inv.state.is_steward(&address) {
        return Err(OrgError::StewardUnchanged {
            address,
            is_steward: true,
        });
    }
    if !inv.state.is_member(&address) {
        register(inv, address, 0)?;
    }
    inv.state.stewards.insert(address);
    if let Some(member) = inv.state.members.get_mut(&address) {
        member.is_steward = true;
    }
    inv.emit(OrgEvent::StewardAdded { steward: address });
    Ok(())
}

fn revoke_steward(inv: &mut Invocation<'_>, address: Address) -> OrgResult<()> {
    if !inv.state.stewards.remove(&address) {
        return Err(OrgError::StewardUnchanged {
            address,
            is_steward: false,
        });
    }
    if let Some(member) = inv.state.members.get_mut(&address) {
        member.is_steward = false;
    }
    inv.emit(OrgEvent::StewardRemoved { steward: address });
    Ok(())
}

fn update_shares(inv: &mut Invocation<'_>, address: Address, shares: Shares) -> OrgResult<()> {
    let state = &mut *inv.state;
    let member = state
        .members
        .get_mut(&address)
        .filter(|m| m.exists)
        .ok_or(OrgError::MemberNotFound(address))?;
    let old_shares = std::mem::replace(&mut member.shares, shares);
    state.total_voting_power = state
        .total_voting_power
        .saturating_sub(voting_power(old_shares))
        .saturating_add(voting_power(shares));
    inv.emit(OrgEvent::SharesUpdated {
        member: address,
        old_shares,
        new_shares: shares,
    });
    Ok(())
}
