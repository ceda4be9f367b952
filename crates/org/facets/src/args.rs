//! Argument payloads for every operation of the standard facets.
//!
//! Callers build these, encode them with `serde_json` into an
//! [`Envelope`](org_router::Envelope), and the facet decodes them back.

use org_types::{
    Address, Amount, OrgError, OrgResult, OrgType, ProposalId, ProposalKind, ProposalStatus,
    Shares,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Decode an argument payload. `null` is read as an empty object so that
/// operations without fields accept either.
pub fn decode<T: DeserializeOwned>(args: &Value) -> OrgResult<T> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args.clone()
    };
    serde_json::from_value(args).map_err(|e| OrgError::InvalidArguments(e.to_string()))
}

pub fn encode<T: Serialize>(value: &T) -> OrgResult<Value> {
    serde_json::to_value(value).map_err(|e| OrgError::InvalidArguments(e.to_string()))
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoArgs {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressArgs {
    pub address: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterMemberArgs {
    pub address: Address,
    #[serde(default)]
    pub shares: Shares,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSharesArgs {
    pub address: Address,
    pub shares: Shares,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRegisterArgs {
    pub addresses: Vec<Address>,
    pub shares: Vec<Shares>,
}

/// Genesis member written by `initialize`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisMember {
    pub address: Address,
    pub shares: Shares,
    #[serde(default)]
    pub steward: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeArgs {
    pub name: String,
    #[serde(default)]
    pub org_type: OrgType,
    /// Defaults to the caller
    #[serde(default)]
    pub creator: Option<Address>,
    #[serde(default)]
    pub members: Vec<GenesisMember>,
    #[serde(default)]
    pub voting_period: Option<u64>,
    #[serde(default)]
    pub quorum: Option<u64>,
    #[serde(default)]
    pub majority: Option<u64>,
    #[serde(default)]
    pub management_fee_bps: Option<u64>,
    #[serde(default)]
    pub fee_recipient: Option<Address>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitProposalArgs {
    #[serde(default)]
    pub kind: ProposalKind,
    #[serde(default)]
    pub title: Option<String>,
    /// Optional funding target
    #[serde(default)]
    pub target: Option<Amount>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalArgs {
    pub proposal: ProposalId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusArgs {
    pub status: ProposalStatus,
}

/// `choice` stays a raw integer on the wire so out-of-range values reach
/// the voting facet and fail there with a typed error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteArgs {
    pub proposal: ProposalId,
    pub choice: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterArgs {
    pub proposal: ProposalId,
    pub voter: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorArgs {
    pub proposal: ProposalId,
    pub contributor: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyArgs {
    pub key: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetNumberArgs {
    pub key: String,
    pub value: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetAddressArgs {
    pub key: String,
    pub value: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStringArgs {
    pub key: String,
    pub value: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientArgs {
    pub proposal: ProposalId,
    pub recipient: Address,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataArgs {
    pub name: String,
    pub org_type: OrgType,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_payload_reads_as_empty_object() {
        let _: NoArgs = decode(&Value::Null).unwrap();
        let args: SubmitProposalArgs = decode(&Value::Null).unwrap();
        assert_eq!(args.kind, ProposalKind::Funding);
        assert_eq!(args.target, None);
    }

    #[test]
    fn malformed_payload_is_invalid_input() {
        let err = decode::<AddressArgs>(&json!({"address": "not-hex"})).unwrap_err();
        assert!(matches!(err, OrgError::InvalidArguments(_)));
        assert_eq!(err.kind(), org_types::ErrorKind::InvalidInput);
    }

    #[test]
    fn shares_default_to_zero() {
        let args: RegisterMemberArgs =
            decode(&json!({"address": Address::derive("a")})).unwrap();
        assert_eq!(args.shares, 0);
    }
}
