//! Shared State Store
//!
//! One versioned [`OrgState`] record per organization, addressed by a
//! stable namespace. Every facet reads and writes this record and nothing
//! else, which is what lets facets be added, replaced or removed without
//! losing data.

#![deny(unsafe_code)]

pub mod config;
mod state;

pub use config::{ConfigStore, GovernanceConfig};
pub use state::{storage_slot, OrgState, StewardSet, STATE_NAMESPACE, STATE_VERSION};
