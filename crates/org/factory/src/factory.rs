//! Organization factory: router instantiation, standard cut, one
//! initialization call, then controller handoff to the requester.

use crate::client::Organization;
use crate::params::CreateOrgParams;
use org_facets::args::encode;
use org_router::{Facet, FacetCut, Host, Router};
use org_types::{ops, Address, Allocation, OrgError, OrgResult, OrgType};
use std::sync::Arc;
use tracing::info;

pub struct OrgFactory {
    address: Address,
    nonce: u64,
    facets: Vec<(Address, Arc<dyn Facet>)>,
}

impl OrgFactory {
    /// Factory installing the standard facet set.
    pub fn new() -> Self {
        Self::with_facets(
            Address::derive("org.factory"),
            org_facets::standard_facets(),
        )
    }

    /// Factory with its own identity and facet set.
    pub fn with_facets(address: Address, facets: Vec<(Address, Arc<dyn Facet>)>) -> Self {
        Self {
            address,
            nonce: 0,
            facets,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Number of organizations created so far
    pub fn created(&self) -> u64 {
        self.nonce
    }

    /// Full creation path.
    ///
    /// The router is owned by the factory while facets are installed and
    /// `initialize` runs, then ownership moves to `requester`, who also
    /// becomes the recorded creator.
    pub fn create(
        &mut self,
        host: &mut Host,
        requester: Address,
        params: CreateOrgParams,
    ) -> OrgResult<Organization> {
        if requester.is_zero() {
            return Err(OrgError::ZeroAddress);
        }
        let router_address = Address::derive_created(&self.address, self.nonce);
        let mut router = Router::new(router_address, self.address);

        let cuts: Vec<FacetCut> = self
            .facets
            .iter()
            .map(|(address, facet)| FacetCut::add_all(*address, Arc::clone(facet)))
            .collect();
        let init = encode(&params.initialize_args(requester))?;
        router.diamond_cut(host, self.address, cuts, Some((ops::INITIALIZE, init)))?;
        router.transfer_ownership(host, self.address, requester)?;
        self.nonce += 1;

        info!(
            organization = %router_address,
            name = %params.name,
            org_type = %params.org_type,
            controller = %requester,
            members = params.members.len(),
            "Organization created"
        );
        Ok(Organization::new(router))
    }

    /// Convenience path: one share per member, defaults for everything
    /// else. Produces the same state as [`create`](Self::create) given the
    /// equivalent [`CreateOrgParams`].
    pub fn create_simple(
        &mut self,
        host: &mut Host,
        requester: Address,
        name: &str,
        org_type: OrgType,
        members: &[Address],
    ) -> OrgResult<Organization> {
        let mut params = CreateOrgParams::new(name, org_type);
        params.members = members
            .iter()
            .map(|address| Allocation::new(*address, 1))
            .collect();
        self.create(host, requester, params)
    }
}

impl Default for OrgFactory {
    fn default() -> Self {
        Self::new()
    }
}
