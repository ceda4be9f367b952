//! Organization Factory
//!
//! Composition root of the organization engine. Creates routers, installs
//! the standard facet set, runs the one-shot initializer and hands control
//! to the requester.
//!
//! # Key Concepts
//!
//! - **Full creation**: [`OrgFactory::create`] takes [`CreateOrgParams`]
//!   with weighted members, voting and fee parameters.
//! - **Simple creation**: [`OrgFactory::create_simple`] gives each listed
//!   member one share and leaves every other parameter at its default.
//! - **Client**: [`Organization`] wraps a created router and exposes one
//!   typed method per operation.
//!
//! # Example
//!
//! ```
//! use org_factory::{CreateOrgParams, OrgFactory};
//! use org_router::Host;
//! use org_types::{Address, OrgType, ProposalKind};
//!
//! let mut factory = OrgFactory::new();
//! let mut host = Host::at(1_700_000_000);
//! let founder = Address::derive("founder");
//!
//! let params = CreateOrgParams::new("Guild", OrgType::Social).with_member(founder, 10);
//! let mut org = factory.create(&mut host, founder, params).unwrap();
//!
//! let id = org
//!     .submit_proposal(&mut host, founder, ProposalKind::General)
//!     .unwrap();
//! assert_eq!(org.proposal_count(&mut host).unwrap(), 1);
//! assert_eq!(org.proposal(&mut host, id).unwrap().proposer, founder);
//! ```

#![deny(unsafe_code)]

mod client;
mod factory;
mod params;

pub use client::Organization;
pub use factory::OrgFactory;
pub use params::{CreateOrgParams, FeeParams, VotingParams};
