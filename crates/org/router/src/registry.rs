//! Selector → facet mapping and the add/replace/remove protocol.

use crate::facet::{Facet, FacetCut, FacetInfo};
use org_types::{Address, CutAction, OrgError, OrgResult, Selector};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

#[derive(Clone)]
struct FacetEntry {
    facet: Arc<dyn Facet>,
    selectors: Vec<Selector>,
}

#[derive(Clone, Default)]
pub struct FacetRegistry {
    routes: BTreeMap<Selector, Address>,
    facets: BTreeMap<Address, FacetEntry>,
    /// Facet addresses in registration order
    order: Vec<Address>,
}

impl FacetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a selector to its facet.
    pub fn resolve(&self, selector: Selector) -> OrgResult<(Address, Arc<dyn Facet>)> {
        let address = self
            .routes
            .get(&selector)
            .ok_or(OrgError::UnknownOperation(selector))?;
        let entry = self
            .facets
            .get(address)
            .ok_or(OrgError::UnknownOperation(selector))?;
        Ok((*address, Arc::clone(&entry.facet)))
    }

    /// Apply one cut. Validates the whole cut before touching the maps, so a
    /// failed cut leaves this registry unchanged.
    pub fn apply(&mut self, cut: &FacetCut) -> OrgResult<()> {
        if cut.selectors.is_empty() {
            return Err(OrgError::EmptyCut);
        }
        let mut seen = BTreeSet::new();
        if let Some(duplicate) = cut.selectors.iter().find(|s| !seen.insert(**s)) {
            return Err(OrgError::SelectorAlreadyRegistered(*duplicate));
        }
        match cut.action {
            CutAction::Add => {
                let facet = self.validate_implementation(cut)?;
                for selector in &cut.selectors {
                    if self.routes.contains_key(selector) {
                        return Err(OrgError::SelectorAlreadyRegistered(*selector));
                    }
                }
                for selector in &cut.selectors {
                    self.route(*selector, cut.address, &facet);
                }
            }
            CutAction::Replace => {
                let facet = self.validate_implementation(cut)?;
                for selector in &cut.selectors {
                    match self.routes.get(selector) {
                        None => return Err(OrgError::SelectorNotRegistered(*selector)),
                        Some(current) if *current == cut.address => {
                            return Err(OrgError::SameFacetReplacement {
                                selector: *selector,
                                facet: cut.address,
                            })
                        }
                        Some(_) => {}
                    }
                }
                for selector in &cut.selectors {
                    self.unroute(*selector);
                    self.route(*selector, cut.address, &facet);
                }
            }
            CutAction::Remove => {
                for selector in &cut.selectors {
                    if !self.routes.contains_key(selector) {
                        return Err(OrgError::SelectorNotRegistered(*selector));
                    }
                }
                for selector in &cut.selectors {
                    self.unroute(*selector);
                }
            }
        }
        Ok(())
    }

    fn validate_implementation(&self, cut: &FacetCut) -> OrgResult<Arc<dyn Facet>> {
        if cut.address.is_zero() {
            return Err(OrgError::ZeroAddress);
        }
        let facet = cut
            .facet
            .as_ref()
            .ok_or(OrgError::MissingFacet(cut.address))?;
        // one address serves exactly one implementation while it has routes
        if let Some(entry) = self.facets.get(&cut.address) {
            if !Arc::ptr_eq(&entry.facet, facet) {
                return Err(OrgError::FacetAddressConflict(cut.address));
            }
        }
        let implemented = facet.selectors();
        if let Some(missing) = cut.selectors.iter().find(|s| !implemented.contains(*s)) {
            return Err(OrgError::SelectorNotImplemented {
                selector: *missing,
                facet: cut.address,
            });
        }
        Ok(Arc::clone(facet))
    }

    fn route(&mut self, selector: Selector, address: Address, facet: &Arc<dyn Facet>) {
        let entry = self.facets.entry(address).or_insert_with(|| FacetEntry {
            facet: Arc::clone(facet),
            selectors: Vec::new(),
        });
        if entry.selectors.is_empty() {
            entry.facet = Arc::clone(facet);
            self.order.push(address);
        }
        entry.selectors.push(selector);
        self.routes.insert(selector, address);
    }

    fn unroute(&mut self, selector: Selector) {
        let Some(address) = self.routes.remove(&selector) else {
            return;
        };
        let now_empty = match self.facets.get_mut(&address) {
            Some(entry) => {
                entry.selectors.retain(|s| *s != selector);
                entry.selectors.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.facets.remove(&address);
            self.order.retain(|a| *a != address);
        }
    }

    pub fn facets(&self) -> Vec<FacetInfo> {
        self.order
            .iter()
            .filter_map(|address| {
                self.facets.get(address).map(|entry| FacetInfo {
                    address: *address,
                    name: entry.facet.name().to_string(),
                    selectors: entry.selectors.clone(),
                })
            })
            .collect()
    }

    pub fn facet_selectors(&self, facet: &Address) -> Vec<Selector> {
        self.facets
            .get(facet)
            .map(|entry| entry.selectors.clone())
            .unwrap_or_default()
    }

    pub fn facet_addresses(&self) -> Vec<Address> {
        self.order.clone()
    }

    pub fn facet_address(&self, selector: Selector) -> Option<Address> {
        self.routes.get(&selector).copied()
    }

    pub fn selector_count(&self) -> usize {
        self.routes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::Invocation;
    use org_types::OrgResult;
    use serde_json::{json, Value};

    struct Named(&'static str, &'static [&'static str]);

    impl Facet for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn operations(&self) -> &'static [&'static str] {
            self.1
        }

        fn invoke(
            &self,
            _invocation: &mut Invocation<'_>,
            _operation: &'static str,
            _args: &Value,
        ) -> OrgResult<Value> {
            Ok(json!(self.0))
        }
    }

    fn sel(name: &str) -> Selector {
        Selector::from_name(name)
    }

    fn v1() -> Arc<dyn Facet> {
        Arc::new(Named("v1", &["a", "b"]))
    }

    fn v2() -> Arc<dyn Facet> {
        Arc::new(Named("v2", &["a", "b", "c"]))
    }

    #[test]
    fn add_then_resolve() {
        let addr = Address::derive("v1");
        let mut registry = FacetRegistry::new();
        registry.apply(&FacetCut::add_all(addr, v1())).unwrap();
        let (resolved, facet) = registry.resolve(sel("a")).unwrap();
        assert_eq!(resolved, addr);
        assert_eq!(facet.name(), "v1");
        assert_eq!(registry.facet_selectors(&addr), vec![sel("a"), sel("b")]);
        assert!(matches!(
            registry.resolve(sel("zzz")),
            Err(OrgError::UnknownOperation(_))
        ));
    }

    #[test]
    fn add_rejects_duplicates_and_sentinel() {
        let mut registry = FacetRegistry::new();
        registry
            .apply(&FacetCut::add_all(Address::derive("v1"), v1()))
            .unwrap();
        assert_eq!(
            registry.apply(&FacetCut::add(Address::derive("v2"), v2(), vec![sel("c"), sel("a")])),
            Err(OrgError::SelectorAlreadyRegistered(sel("a")))
        );
        // the valid selector in the failed cut was not applied
        assert_eq!(registry.facet_address(sel("c")), None);
        assert_eq!(
            registry.apply(&FacetCut::add(Address::ZERO, v2(), vec![sel("c")])),
            Err(OrgError::ZeroAddress)
        );
    }

    #[test]
    fn cut_rejects_repeated_selector() {
        let mut registry = FacetRegistry::new();
        assert_eq!(
            registry.apply(&FacetCut::add(Address::derive("v1"), v1(), vec![sel("a"), sel("a")])),
            Err(OrgError::SelectorAlreadyRegistered(sel("a")))
        );
        assert_eq!(registry.selector_count(), 0);
    }

    #[test]
    fn add_rejects_unimplemented_selector() {
        let addr = Address::derive("v1");
        let mut registry = FacetRegistry::new();
        assert_eq!(
            registry.apply(&FacetCut::add(addr, v1(), vec![sel("c")])),
            Err(OrgError::SelectorNotImplemented {
                selector: sel("c"),
                facet: addr
            })
        );
        assert_eq!(
            registry.apply(&FacetCut::add(addr, v1(), vec![])),
            Err(OrgError::EmptyCut)
        );
    }

    #[test]
    fn replace_moves_selectors_and_drops_empty_facets() {
        let (a1, a2) = (Address::derive("v1"), Address::derive("v2"));
        let mut registry = FacetRegistry::new();
        registry.apply(&FacetCut::add_all(a1, v1())).unwrap();
        registry
            .apply(&FacetCut::replace(a2, v2(), vec![sel("a"), sel("b")]))
            .unwrap();
        assert_eq!(registry.facet_address(sel("a")), Some(a2));
        assert_eq!(registry.facet_addresses(), vec![a2]);
        assert!(registry.facet_selectors(&a1).is_empty());
        assert_eq!(registry.resolve(sel("b")).unwrap().1.name(), "v2");
    }

    #[test]
    fn replace_failures() {
        let a1 = Address::derive("v1");
        let mut registry = FacetRegistry::new();
        registry.apply(&FacetCut::add_all(a1, v1())).unwrap();
        assert_eq!(
            registry.apply(&FacetCut::replace(Address::derive("v2"), v2(), vec![sel("c")])),
            Err(OrgError::SelectorNotRegistered(sel("c")))
        );
        assert_eq!(
            registry.apply(&FacetCut::replace(a1, v1(), vec![sel("a")])),
            Err(OrgError::SameFacetReplacement {
                selector: sel("a"),
                facet: a1
            })
        );
        assert_eq!(
            registry.apply(&FacetCut::replace(Address::ZERO, v2(), vec![sel("a")])),
            Err(OrgError::ZeroAddress)
        );
    }

    #[test]
    fn address_cannot_switch_implementation_while_routed() {
        let addr = Address::derive("shared");
        let mut registry = FacetRegistry::new();
        registry
            .apply(&FacetCut::add(addr, v1(), vec![sel("a")]))
            .unwrap();

        assert_eq!(
            registry.apply(&FacetCut::add(addr, v2(), vec![sel("c")])),
            Err(OrgError::FacetAddressConflict(addr))
        );
        assert_eq!(registry.facet_address(sel("c")), None);
        assert_eq!(
            registry.apply(&FacetCut::replace(addr, v2(), vec![sel("a")])),
            Err(OrgError::FacetAddressConflict(addr))
        );

        // the same instance may keep growing under its address
        let (_, current) = registry.resolve(sel("a")).unwrap();
        registry
            .apply(&FacetCut::add(addr, current, vec![sel("b")]))
            .unwrap();
        assert_eq!(registry.facet_selectors(&addr), vec![sel("a"), sel("b")]);

        // once fully removed, the address is free for a new implementation
        registry
            .apply(&FacetCut::remove(vec![sel("a"), sel("b")]))
            .unwrap();
        registry
            .apply(&FacetCut::add(addr, v2(), vec![sel("c")]))
            .unwrap();
        let (_, facet) = registry.resolve(sel("c")).unwrap();
        assert_eq!(facet.name(), "v2");
        assert_eq!(facet.operation_for(sel("c")), Some("c"));
    }

    #[test]
    fn remove_clears_mapping() {
        let a1 = Address::derive("v1");
        let mut registry = FacetRegistry::new();
        registry.apply(&FacetCut::add_all(a1, v1())).unwrap();
        registry.apply(&FacetCut::remove(vec![sel("a")])).unwrap();
        assert_eq!(registry.facet_address(sel("a")), None);
        assert_eq!(registry.facet_addresses(), vec![a1]);
        assert_eq!(
            registry.apply(&FacetCut::remove(vec![sel("b"), sel("a")])),
            Err(OrgError::SelectorNotRegistered(sel("a")))
        );
        assert_eq!(registry.facet_address(sel("b")), Some(a1));
        registry.apply(&FacetCut::remove(vec![sel("b")])).unwrap();
        assert!(registry.facets().is_empty());
        assert_eq!(registry.selector_count(), 0);
    }
}
