//! Shared setup for the organization integration tests.

#![allow(dead_code)]

use org_factory::{CreateOrgParams, OrgFactory, Organization};
use org_router::Host;
use org_types::{Address, Amount, OrgType, ProposalId, ProposalKind};
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static TRACING: Once = Once::new();

/// Install a test subscriber once per binary. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

pub const GENESIS: u64 = 1_700_000_000;

pub struct World {
    pub factory: OrgFactory,
    pub host: Host,
    pub controller: Address,
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        Self {
            factory: OrgFactory::new(),
            host: Host::at(GENESIS),
            controller: Address::derive("controller"),
        }
    }

    /// Organization with no genesis members.
    pub fn empty_org(&mut self, org_type: OrgType) -> Organization {
        let controller = self.controller;
        self.factory
            .create(
                &mut self.host,
                controller,
                CreateOrgParams::new("Integration Org", org_type),
            )
            .expect("create organization")
    }

    pub fn steward(&mut self, org: &mut Organization, label: &str, shares: u64) -> Address {
        let address = Address::derive(label);
        org.register_member(&mut self.host, self.controller, address, shares)
            .expect("register");
        org.add_steward(&mut self.host, self.controller, address)
            .expect("add steward");
        address
    }

    pub fn member(&mut self, org: &mut Organization, label: &str, shares: u64) -> Address {
        let address = Address::derive(label);
        org.register_member(&mut self.host, self.controller, address, shares)
            .expect("register");
        address
    }

    pub fn investor(&mut self, org: &mut Organization, label: &str, balance: Amount) -> Address {
        let address = Address::derive(label);
        org.whitelist_investor(&mut self.host, self.controller, address)
            .expect("whitelist");
        self.host.mint(address, balance).expect("mint");
        address
    }

    /// Submitted and sponsored by `steward`.
    pub fn active_proposal(&mut self, org: &mut Organization, steward: Address) -> ProposalId {
        let id = org
            .submit_proposal(&mut self.host, steward, ProposalKind::Funding)
            .expect("submit");
        org.sponsor_proposal(&mut self.host, steward, id)
            .expect("sponsor");
        id
    }

    /// Move the clock past the default voting period.
    pub fn close_voting(&mut self) {
        self.host.advance(org_state::config::DEFAULT_VOTING_PERIOD);
    }
}
