//! Facet Router
//!
//! The single entry point of an organization. Calls arrive as an
//! [`Envelope`] (caller, operation selector, JSON arguments, attached value)
//! and are routed to whichever [`Facet`] currently serves that selector.
//!
//! # Key Concepts
//!
//! - **Facet**: a stateless, replaceable module of operations. All data it
//!   touches lives in the router's [`OrgState`](org_state::OrgState).
//! - **Cut**: an add / replace / remove batch against the selector table,
//!   applied atomically by the owner, optionally followed by an initializer.
//! - **Loupe**: read-only introspection of which facet serves what.
//! - **Host**: the logical clock and value ledger the router runs against.
//!
//! # Architecture
//!
//! ```text
//! Envelope ──> Router ──resolve──> FacetRegistry ──> Arc<dyn Facet>
//!                │                                      │
//!                └── Invocation { caller, &mut OrgState, outbound } ──┘
//!                         │
//!                         └──> settle transfers on Host, or roll back
//! ```
//!
//! Dispatch is transactional: state and ledger are snapshotted before the
//! facet runs and restored on any failure, including a failed payout.

#![deny(unsafe_code)]

mod facet;
mod host;
mod invocation;
mod registry;
mod router;

pub use facet::{Envelope, Facet, FacetCut, FacetInfo};
pub use host::{Host, TransferError};
pub use invocation::{Invocation, Transfer};
pub use registry::FacetRegistry;
pub use router::Router;
