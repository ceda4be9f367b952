//! Standard Facet Set
//!
//! The business logic of an organization, split into independently
//! replaceable facets that communicate only through the shared
//! [`OrgState`](org_state::OrgState).
//!
//! # Key Concepts
//!
//! - **Init**: one-shot metadata, genesis members and config.
//! - **Membership**: members, stewards, share weights, allow-lists.
//! - **Proposal**: submit / sponsor / cancel / execute lifecycle.
//! - **Governance**: weighted voting and quorum / majority finalization.
//! - **Funding**: escrowed deposits, refunds and fee-split payouts.
//! - **Config**: controller-only configuration and metadata writes.
//!
//! # Architecture
//!
//! Governance and Funding never call each other. Governance writes the
//! `Passed` / `Failed` status on a proposal, Proposal moves it to
//! `Executed`, and Funding only pays out once it reads that status.

#![deny(unsafe_code)]

pub mod args;
mod config;
mod funding;
mod governance;
mod init;
mod membership;
mod proposal;

pub use config::ConfigFacet;
pub use funding::{split_fee, FundingFacet};
pub use governance::{tally_passes, GovernanceFacet};
pub use init::InitFacet;
pub use membership::MembershipFacet;
pub use proposal::ProposalFacet;

use org_router::{Facet, FacetCut};
use org_types::Address;
use std::sync::Arc;

/// Module addresses of the standard facets, derived from stable labels.
pub mod addresses {
    use org_types::Address;

    pub fn init() -> Address {
        Address::derive("org.facet.init")
    }

    pub fn membership() -> Address {
        Address::derive("org.facet.membership")
    }

    pub fn proposal() -> Address {
        Address::derive("org.facet.proposal")
    }

    pub fn governance() -> Address {
        Address::derive("org.facet.governance")
    }

    pub fn funding() -> Address {
        Address::derive("org.facet.funding")
    }

    pub fn config() -> Address {
        Address::derive("org.facet.config")
    }
}

/// The six standard facets with their module addresses.
pub fn standard_facets() -> Vec<(Address, Arc<dyn Facet>)> {
    vec![
        (addresses::init(), Arc::new(InitFacet) as Arc<dyn Facet>),
        (addresses::membership(), Arc::new(MembershipFacet) as Arc<dyn Facet>),
        (addresses::proposal(), Arc::new(ProposalFacet) as Arc<dyn Facet>),
        (addresses::governance(), Arc::new(GovernanceFacet) as Arc<dyn Facet>),
        (addresses::funding(), Arc::new(FundingFacet) as Arc<dyn Facet>),
        (addresses::config(), Arc::new(ConfigFacet) as Arc<dyn Facet>),
    ]
}

/// One `Add` cut per standard facet, covering every operation it serves.
pub fn standard_cut() -> Vec<FacetCut> {
    standard_facets()
        .into_iter()
        .map(|(address, facet)| FacetCut::add_all(address, facet))
        .collect()
}

#[cfg(test)]
pub(crate) mod testkit {
    use super::standard_cut;
    use org_router::{Envelope, Host, Router};
    use org_state::{config::DEFAULT_VOTING_PERIOD, OrgState};
    use org_types::{ops, Address, Amount, OrgResult, ProposalId, Shares};
    use serde_json::{json, Value};

    /// A router with the standard facets installed.
    pub struct Fixture {
        pub router: Router,
        pub host: Host,
        pub owner: Address,
    }

    impl Fixture {
        pub fn bare() -> Self {
            let owner = Address::derive("owner");
            let mut router = Router::new(Address::derive("org"), owner);
            let mut host = Host::at(1_700_000_000);
            router
                .diamond_cut(&mut host, owner, standard_cut(), None)
                .unwrap();
            Self {
                router,
                host,
                owner,
            }
        }

        pub fn initialized() -> Self {
            let mut fx = Self::bare();
            fx.owner_call(ops::INITIALIZE, json!({"name": "Test Org"}))
                .unwrap();
            fx
        }

        pub fn state(&self) -> &OrgState {
            self.router.state()
        }

        pub fn call(&mut self, caller: Address, op: &str, args: Value) -> OrgResult<Value> {
            self.router
                .dispatch(&mut self.host, Envelope::new(caller, op, args))
        }

        pub fn pay(
            &mut self,
            caller: Address,
            op: &str,
            args: Value,
            value: Amount,
        ) -> OrgResult<Value> {
            self.router.dispatch(
                &mut self.host,
                Envelope::new(caller, op, args).with_value(value),
            )
        }

        pub fn owner_call(&mut self, op: &str, args: Value) -> OrgResult<Value> {
            let owner = self.owner;
            self.call(owner, op, args)
        }

        pub fn view(&mut self, op: &str, args: Value) -> Value {
            self.call(Address::derive("observer"), op, args).unwrap()
        }

        pub fn member(&mut self, label: &str, shares: Shares) -> Address {
            let address = Address::derive(label);
            self.owner_call(
                ops::REGISTER_MEMBER,
                json!({"address": address, "shares": shares}),
            )
            .unwrap();
            address
        }

        pub fn steward(&mut self, label: &str) -> Address {
            let address = Address::derive(label);
            self.owner_call(ops::ADD_STEWARD, json!({"address": address}))
                .unwrap();
            address
        }

        /// Whitelisted investor holding `balance` on the host ledger.
        pub fn investor(&mut self, label: &str, balance: Amount) -> Address {
            let address = Address::derive(label);
            self.owner_call(ops::WHITELIST_INVESTOR, json!({"address": address}))
                .unwrap();
            self.host.mint(address, balance).unwrap();
            address
        }

        pub fn submit(&mut self, proposer: Address) -> ProposalId {
            let id = self
                .call(proposer, ops::SUBMIT_PROPOSAL, json!({}))
                .unwrap();
            serde_json::from_value(id).unwrap()
        }

        pub fn active_proposal(&mut self, steward: Address) -> ProposalId {
            let id = self.submit(steward);
            self.call(steward, ops::SPONSOR_PROPOSAL, json!({"proposal": id}))
                .unwrap();
            id
        }

        /// Sponsored, voted yes by `steward`, and finalized after the deadline.
        pub fn passed_proposal(&mut self, steward: Address) -> ProposalId {
            let id = self.active_proposal(steward);
            self.call(steward, ops::SUBMIT_VOTE, json!({"proposal": id, "choice": 1}))
                .unwrap();
            self.host.advance(DEFAULT_VOTING_PERIOD);
            self.call(steward, ops::FINALIZE_PROPOSAL, json!({"proposal": id}))
                .unwrap();
            id
        }
    }
}
