//! Execution context handed to a facet for one call.
//!
//! Carries the original caller's identity, the shared state, and the queue
//! of outbound transfers and events. Transfers are settled by the router
//! only after the facet has returned, so every state change of the call is
//! final before value leaves the organization.

use org_state::OrgState;
use org_types::{Address, Amount, OrgError, OrgEvent, OrgResult, Timestamp};

/// Value queued to leave the router once the call commits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub to: Address,
    pub amount: Amount,
}

pub struct Invocation<'a> {
    caller: Address,
    value: Amount,
    now: Timestamp,
    this: Address,
    owner: Address,
    held_balance: Amount,
    pub state: &'a mut OrgState,
    outbound: Vec<Transfer>,
    events: Vec<OrgEvent>,
}

impl<'a> Invocation<'a> {
    pub fn new(
        caller: Address,
        value: Amount,
        now: Timestamp,
        this: Address,
        owner: Address,
        held_balance: Amount,
        state: &'a mut OrgState,
    ) -> Self {
        Self {
            caller,
            value,
            now,
            this,
            owner,
            held_balance,
            state,
            outbound: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Value transferred in with this call (already credited to the router)
    pub fn value(&self) -> Amount {
        self.value
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    /// Address of the router executing the call
    pub fn this(&self) -> Address {
        self.this
    }

    /// The organization's controller: the router owner
    pub fn controller(&self) -> Address {
        self.owner
    }

    pub fn is_controller(&self) -> bool {
        self.caller == self.owner
    }

    pub fn require_controller(&self) -> OrgResult<()> {
        if self.is_controller() {
            Ok(())
        } else {
            Err(OrgError::NotController(self.caller))
        }
    }

    pub fn require_steward(&self) -> OrgResult<()> {
        if self.state.is_steward(&self.caller) {
            Ok(())
        } else {
            Err(OrgError::NotSteward(self.caller))
        }
    }

    /// Router balance not yet committed to an outbound transfer
    pub fn held_balance(&self) -> Amount {
        let queued: Amount = self.outbound.iter().map(|t| t.amount).sum();
        self.held_balance.saturating_sub(queued)
    }

    /// Queue `amount` for `to`. Zero amounts are skipped.
    pub fn send(&mut self, to: Address, amount: Amount) -> OrgResult<()> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.held_balance();
        if amount > available {
            return Err(OrgError::TransferFailed {
                to,
                amount,
                reason: format!("insufficient held balance: {available}"),
            });
        }
        self.outbound.push(Transfer { to, amount });
        Ok(())
    }

    pub fn emit(&mut self, event: OrgEvent) {
        self.events.push(event);
    }

    pub fn finish(self) -> (Vec<Transfer>, Vec<OrgEvent>) {
        (self.outbound, self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_is_the_owner() {
        let mut state = OrgState::new();
        let owner = Address::derive("owner");
        let inv = Invocation::new(owner, 0, 0, Address::derive("router"), owner, 0, &mut state);
        assert!(inv.require_controller().is_ok());

        let mut state = OrgState::new();
        let other = Address::derive("other");
        let inv = Invocation::new(other, 0, 0, Address::derive("router"), owner, 0, &mut state);
        assert_eq!(inv.require_controller(), Err(OrgError::NotController(other)));
        assert_eq!(inv.require_steward(), Err(OrgError::NotSteward(other)));
    }

    #[test]
    fn queued_transfers_reserve_held_balance() {
        let mut state = OrgState::new();
        let who = Address::derive("who");
        let mut inv = Invocation::new(who, 0, 0, Address::derive("router"), who, 10, &mut state);
        inv.send(Address::derive("a"), 6).unwrap();
        inv.send(Address::derive("b"), 0).unwrap();
        assert_eq!(inv.held_balance(), 4);
        assert!(matches!(
            inv.send(Address::derive("c"), 5),
            Err(OrgError::TransferFailed { amount: 5, .. })
        ));
        let (outbound, events) = inv.finish();
        assert_eq!(outbound.len(), 1);
        assert!(events.is_empty());
    }
}
