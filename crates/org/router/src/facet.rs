//! Facets: replaceable units of logic registered against operation selectors.

use crate::invocation::Invocation;
use org_types::{Address, CutAction, CutSummary, OrgResult, Selector};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// A module of operations executed against the router's shared state.
///
/// Implementors must not hold persistent state of their own: everything an
/// operation reads or writes goes through [`Invocation::state`]. This is
/// what keeps a facet replaceable without data migration.
pub trait Facet: Send + Sync {
    fn name(&self) -> &'static str;

    /// Operation names this facet implements
    fn operations(&self) -> &'static [&'static str];

    /// Subset of [`operations`](Facet::operations) that accept value
    fn payable(&self) -> &'static [&'static str] {
        &[]
    }

    /// Execute `operation` with a JSON argument payload.
    fn invoke(
        &self,
        invocation: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<Value>;

    fn selectors(&self) -> Vec<Selector> {
        self.operations()
            .iter()
            .map(|op| Selector::from_name(op))
            .collect()
    }

    fn operation_for(&self, selector: Selector) -> Option<&'static str> {
        self.operations()
            .iter()
            .copied()
            .find(|op| Selector::from_name(op) == selector)
    }

    fn is_payable(&self, operation: &str) -> bool {
        self.payable().contains(&operation)
    }
}

/// One entry of a cut batch
#[derive(Clone)]
pub struct FacetCut {
    pub address: Address,
    pub action: CutAction,
    pub selectors: Vec<Selector>,
    /// Implementation for `Add` / `Replace`; ignored for `Remove`
    pub facet: Option<Arc<dyn Facet>>,
}

impl FacetCut {
    pub fn add(address: Address, facet: Arc<dyn Facet>, selectors: Vec<Selector>) -> Self {
        Self {
            address,
            action: CutAction::Add,
            selectors,
            facet: Some(facet),
        }
    }

    /// Add every operation the facet implements.
    pub fn add_all(address: Address, facet: Arc<dyn Facet>) -> Self {
        let selectors = facet.selectors();
        Self::add(address, facet, selectors)
    }

    pub fn replace(address: Address, facet: Arc<dyn Facet>, selectors: Vec<Selector>) -> Self {
        Self {
            address,
            action: CutAction::Replace,
            selectors,
            facet: Some(facet),
        }
    }

    pub fn remove(selectors: Vec<Selector>) -> Self {
        Self {
            address: Address::ZERO,
            action: CutAction::Remove,
            selectors,
            facet: None,
        }
    }

    pub fn summary(&self) -> CutSummary {
        CutSummary {
            facet: self.address,
            action: self.action,
            selectors: self.selectors.clone(),
        }
    }
}

impl fmt::Debug for FacetCut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetCut")
            .field("address", &self.address)
            .field("action", &self.action)
            .field("selectors", &self.selectors)
            .field("facet", &self.facet.as_ref().map(|facet| facet.name()))
            .finish()
    }
}

/// Loupe view of one registered facet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetInfo {
    pub address: Address,
    pub name: String,
    pub selectors: Vec<Selector>,
}

/// Inbound call: operation selector, argument payload and caller context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub caller: Address,
    pub selector: Selector,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub value: u64,
}

impl Envelope {
    pub fn new(caller: Address, operation: &str, args: Value) -> Self {
        Self {
            caller,
            selector: Selector::from_name(operation),
            args,
            value: 0,
        }
    }

    pub fn with_value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Pinger;

    impl Facet for Pinger {
        fn name(&self) -> &'static str {
            "pinger"
        }

        fn operations(&self) -> &'static [&'static str] {
            &["ping", "pay"]
        }

        fn payable(&self) -> &'static [&'static str] {
            &["pay"]
        }

        fn invoke(
            &self,
            _invocation: &mut Invocation<'_>,
            operation: &'static str,
            _args: &Value,
        ) -> OrgResult<Value> {
            Ok(json!(operation))
        }
    }

    #[test]
    fn selectors_resolve_back_to_operations() {
        let pinger = Pinger;
        assert_eq!(pinger.selectors().len(), 2);
        assert_eq!(pinger.operation_for(Selector::from_name("ping")), Some("ping"));
        assert_eq!(pinger.operation_for(Selector::from_name("pong")), None);
        assert!(pinger.is_payable("pay"));
        assert!(!pinger.is_payable("ping"));
    }

    #[test]
    fn remove_cut_uses_sentinel_address() {
        let cut = FacetCut::remove(vec![Selector::from_name("ping")]);
        assert!(cut.address.is_zero());
        assert!(cut.facet.is_none());
        assert_eq!(cut.summary().action, CutAction::Remove);
    }

    #[test]
    fn envelope_hashes_operation_name() {
        let caller = Address::derive("caller");
        let envelope = Envelope::new(caller, "ping", json!({})).with_value(3);
        assert_eq!(envelope.selector, Selector::from_name("ping"));
        assert_eq!(envelope.value, 3);
    }
}
