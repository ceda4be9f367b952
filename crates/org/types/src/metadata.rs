//! Organization metadata

use crate::{Address, Timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Governance archetype of an organization
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgType {
    /// Pooled capital, investor whitelist, proposals fund deals
    #[default]
    Investment,
    /// Grant committee disbursing to external recipients
    Grant,
    /// Protocol parameter governance
    Protocol,
    /// Service collective paying contributors
    Service,
    /// Social club; signalling votes, light treasury
    Social,
}

impl OrgType {
    pub fn as_str(self) -> &'static str {
        match self {
            OrgType::Investment => "investment",
            OrgType::Grant => "grant",
            OrgType::Protocol => "protocol",
            OrgType::Service => "service",
            OrgType::Social => "social",
        }
    }
}

impl fmt::Display for OrgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "investment" => Ok(OrgType::Investment),
            "grant" => Ok(OrgType::Grant),
            "protocol" => Ok(OrgType::Protocol),
            "service" => Ok(OrgType::Service),
            "social" => Ok(OrgType::Social),
            other => Err(format!("unknown organization type: {other}")),
        }
    }
}

/// Identity of an organization. Immutable after initialization except
/// through the explicit metadata update operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgMetadata {
    /// Display name
    pub name: String,
    /// Governance archetype
    pub org_type: OrgType,
    /// Requester of the creation; default fee recipient
    pub creator: Address,
    /// When initialization ran
    pub created_at: Timestamp,
}

impl OrgMetadata {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(i64::try_from(self.created_at).ok()?, 0)
    }
}

/// Organization summary returned by the info view
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgInfo {
    pub metadata: OrgMetadata,
    /// Registered members
    pub member_count: u64,
    /// Members holding the steward role
    pub steward_count: u64,
    /// Proposals ever submitted, in any status
    pub proposal_count: u64,
    /// Σ max(shares, 1) over members
    pub total_voting_power: u64,
}
