//! The router: single entry point of an organization.
//!
//! Every inbound call is resolved to a facet by selector and executed
//! against the router's own [`OrgState`] with the original caller's
//! identity. Each dispatch is a transaction: state and ledger are
//! snapshotted first and restored if the facet or any outbound transfer
//! fails.

use crate::facet::{Envelope, FacetCut, FacetInfo};
use crate::host::Host;
use crate::invocation::Invocation;
use crate::registry::FacetRegistry;
use org_state::OrgState;
use org_types::{Address, EventRecord, OrgError, OrgEvent, OrgResult, Selector, Timestamp};
use serde_json::Value;
use tracing::{debug, info, warn};

pub struct Router {
    address: Address,
    owner: Address,
    registry: FacetRegistry,
    state: OrgState,
    events: Vec<EventRecord>,
    next_sequence: u64,
}

impl Router {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            registry: FacetRegistry::new(),
            state: OrgState::new(),
            events: Vec::new(),
            next_sequence: 0,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Read-only view of the shared state.
    pub fn state(&self) -> &OrgState {
        &self.state
    }

    /// One-step ownership handoff. Only the current owner may call this.
    pub fn transfer_ownership(
        &mut self,
        host: &Host,
        caller: Address,
        new_owner: Address,
    ) -> OrgResult<()> {
        self.require_owner(caller)?;
        if new_owner.is_zero() {
            return Err(OrgError::ZeroAddress);
        }
        let previous = std::mem::replace(&mut self.owner, new_owner);
        info!(router = %self.address, %previous, %new_owner, "Ownership transferred");
        self.record(
            host.now(),
            vec![OrgEvent::OwnershipTransferred {
                previous,
                new_owner,
            }],
        );
        Ok(())
    }

    /// Apply a batch of cuts atomically, then run the optional initializer
    /// through the updated registry as the owner.
    ///
    /// Any failure (authorization, a single invalid cut, or the
    /// initializer) leaves the registry and state exactly as they were.
    pub fn diamond_cut(
        &mut self,
        host: &mut Host,
        caller: Address,
        cuts: Vec<FacetCut>,
        init: Option<(&str, Value)>,
    ) -> OrgResult<()> {
        self.require_owner(caller)?;

        let mut next = self.registry.clone();
        for cut in &cuts {
            if let Err(err) = next.apply(cut) {
                warn!(router = %self.address, ?cut, error = %err, "Facet cut rejected");
                return Err(err);
            }
        }
        let previous = std::mem::replace(&mut self.registry, next);

        let initialized = init.is_some();
        if let Some((operation, args)) = init {
            let envelope = Envelope::new(self.owner, operation, args);
            if let Err(err) = self.dispatch(host, envelope) {
                warn!(router = %self.address, operation, error = %err, "Cut initializer failed; cut rolled back");
                self.registry = previous;
                return Err(err);
            }
        }

        info!(
            router = %self.address,
            cuts = cuts.len(),
            selectors = self.registry.selector_count(),
            "Facet cut applied"
        );
        self.record(
            host.now(),
            vec![OrgEvent::FacetCut {
                cuts: cuts.iter().map(FacetCut::summary).collect(),
                initialized,
            }],
        );
        Ok(())
    }

    /// Route one call to its facet and run it as a transaction.
    pub fn dispatch(&mut self, host: &mut Host, envelope: Envelope) -> OrgResult<Value> {
        let (facet_address, facet) = self.registry.resolve(envelope.selector)?;
        let operation = facet
            .operation_for(envelope.selector)
            .ok_or(OrgError::UnknownOperation(envelope.selector))?;
        if envelope.value > 0 && !facet.is_payable(operation) {
            return Err(OrgError::NonPayable(envelope.selector));
        }

        debug!(
            router = %self.address,
            facet = facet.name(),
            %facet_address,
            operation,
            caller = %envelope.caller,
            value = envelope.value,
            "Dispatching"
        );

        let state_snapshot = self.state.clone();
        let host_snapshot = host.clone();

        match self.execute(host, facet.as_ref(), operation, &envelope) {
            Ok((output, events)) => {
                self.record(host.now(), events);
                Ok(output)
            }
            Err(err) => {
                self.state = state_snapshot;
                *host = host_snapshot;
                warn!(
                    router = %self.address,
                    operation,
                    caller = %envelope.caller,
                    kind = ?err.kind(),
                    error = %err,
                    "Operation rejected; state restored"
                );
                Err(err)
            }
        }
    }

    fn execute(
        &mut self,
        host: &mut Host,
        facet: &dyn crate::facet::Facet,
        operation: &'static str,
        envelope: &Envelope,
    ) -> OrgResult<(Value, Vec<OrgEvent>)> {
        if envelope.value > 0 {
            host.transfer(envelope.caller, self.address, envelope.value)
                .map_err(|err| OrgError::TransferFailed {
                    to: self.address,
                    amount: envelope.value,
                    reason: err.to_string(),
                })?;
        }

        let mut invocation = Invocation::new(
            envelope.caller,
            envelope.value,
            host.now(),
            self.address,
            self.owner,
            host.balance_of(&self.address),
            &mut self.state,
        );
        let output = facet.invoke(&mut invocation, operation, &envelope.args)?;
        let (outbound, events) = invocation.finish();

        for transfer in outbound {
            host.transfer(self.address, transfer.to, transfer.amount)
                .map_err(|err| OrgError::TransferFailed {
                    to: transfer.to,
                    amount: transfer.amount,
                    reason: err.to_string(),
                })?;
            debug!(router = %self.address, to = %transfer.to, amount = transfer.amount, "Value sent");
        }
        Ok((output, events))
    }

    fn require_owner(&self, caller: Address) -> OrgResult<()> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(OrgError::NotController(caller))
        }
    }

    fn record(&mut self, timestamp: Timestamp, events: Vec<OrgEvent>) {
        for event in events {
            debug!(router = %self.address, event = event.name(), "Event");
            self.events.push(EventRecord {
                sequence: self.next_sequence,
                timestamp,
                emitter: self.address,
                event,
            });
            self.next_sequence += 1;
        }
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<EventRecord> {
        std::mem::take(&mut self.events)
    }

    // --- Loupe ---

    pub fn facets(&self) -> Vec<FacetInfo> {
        self.registry.facets()
    }

    pub fn facet_selectors(&self, facet: &Address) -> Vec<Selector> {
        self.registry.facet_selectors(facet)
    }

    pub fn facet_addresses(&self) -> Vec<Address> {
        self.registry.facet_addresses()
    }

    pub fn facet_address(&self, selector: Selector) -> Option<Address> {
        self.registry.facet_address(selector)
    }

    pub fn supports_operation(&self, operation: &str) -> bool {
        self.facet_address(Selector::from_name(operation)).is_some()
    }
}
