//! Organization Domain Types
//!
//! This crate defines the domain types shared by every layer of the
//! organization engine: the facet router, the shared state store and the
//! standard facet set.
//!
//! # Key Concepts
//!
//! - **Identity**: [`Address`] names principals, facets and the router itself.
//! - **Operation identifiers**: [`Selector`] is the stable 4-byte id an
//!   operation name hashes to. Dispatch never looks at names, only selectors.
//! - **Member / Steward**: weighted membership with a steward role flag.
//!   Effective voting power is `max(shares, 1)`.
//! - **Proposal**: a decision request moving through
//!   `Pending → Active → {Passed, Failed} → Executed` (or `Cancelled`).
//! - **Funding record**: escrow ledger of contributions per proposal.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. Identifier
//! newtypes serialize as `0x`-prefixed hex strings so they can be used as
//! JSON map keys in operation payloads and state exports.

#![deny(unsafe_code)]

mod errors;
mod event;
mod funding;
mod ids;
mod member;
mod metadata;
pub mod ops;
mod proposal;
mod vote;

pub use errors::*;
pub use event::*;
pub use funding::*;
pub use ids::*;
pub use member::*;
pub use metadata::*;
pub use proposal::*;
pub use vote::*;

/// Logical time in seconds since the Unix epoch.
pub type Timestamp = u64;

/// Transferable value, in the host ledger's minor units.
pub type Amount = u64;

/// Member share balance.
pub type Shares = u64;
