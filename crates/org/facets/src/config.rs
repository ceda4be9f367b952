//! Configuration facet: controller-only writes to the config maps and
//! metadata, plus raw and effective views.

use crate::args::{
    decode, encode, KeyArgs, MetadataArgs, NoArgs, RecipientArgs, SetAddressArgs, SetNumberArgs,
    SetStringArgs,
};
use org_router::{Facet, Invocation};
use org_types::{ops, Address, OrgError, OrgEvent, OrgInfo, OrgResult};
use serde_json::{json, Value};
use tracing::info;

pub struct ConfigFacet;

impl ConfigFacet {
    pub const OPERATIONS: &'static [&'static str] = &[
        ops::SET_NUMBER,
        ops::SET_ADDRESS,
        ops::SET_STRING,
        ops::SET_PROPOSAL_RECIPIENT,
        ops::UPDATE_METADATA,
        ops::GET_NUMBER,
        ops::GET_ADDRESS,
        ops::GET_STRING,
        ops::GET_ORG_INFO,
        ops::GET_GOVERNANCE_CONFIG,
    ];

    fn write(
        &self,
        inv: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<()> {
        let (key, value) = match operation {
            ops::SET_NUMBER => {
                let SetNumberArgs { key, value } = decode(args)?;
                inv.state.config.set_number(&key, value)?;
                (key, value.to_string())
            }
            ops::SET_ADDRESS => {
                let SetAddressArgs { key, value } = decode(args)?;
                inv.state.config.set_address(&key, value)?;
                (key, value.to_hex())
            }
            ops::SET_STRING => {
                let SetStringArgs { key, value } = decode(args)?;
                inv.state.config.set_string(&key, value.clone());
                (key, value)
            }
            ops::SET_PROPOSAL_RECIPIENT => {
                let RecipientArgs {
                    proposal,
                    recipient,
                } = decode(args)?;
                inv.state.proposal(&proposal)?;
                inv.state.config.set_recipient(&proposal, recipient)?;
                (format!("RECIPIENT_{}", proposal.to_hex()), recipient.to_hex())
            }
            ops::UPDATE_METADATA => {
                let MetadataArgs { name, org_type } = decode(args)?;
                let metadata = inv.state.metadata.as_mut().ok_or(OrgError::NotInitialized)?;
                metadata.name = name.clone();
                metadata.org_type = org_type;
                info!(%name, %org_type, "Metadata updated");
                inv.emit(OrgEvent::MetadataUpdated { name, org_type });
                return Ok(());
            }
            other => {
                return Err(OrgError::UnknownOperation(org_types::Selector::from_name(
                    other,
                )))
            }
        };
        info!(%key, %value, "Config changed");
        inv.emit(OrgEvent::ConfigChanged { key, value });
        Ok(())
    }
}

impl Facet for ConfigFacet {
    fn name(&self) -> &'static str {
        "config"
    }

    fn operations(&self) -> &'static [&'static str] {
        Self::OPERATIONS
    }

    fn invoke(
        &self,
        inv: &mut Invocation<'_>,
        operation: &'static str,
        args: &Value,
    ) -> OrgResult<Value> {
        match operation {
            ops::GET_NUMBER => {
                let KeyArgs { key } = decode(args)?;
                Ok(json!(inv.state.config.number(&key)))
            }
            ops::GET_ADDRESS => {
                let KeyArgs { key } = decode(args)?;
                encode(&inv.state.config.address(&key))
            }
            ops::GET_STRING => {
                let KeyArgs { key } = decode(args)?;
                Ok(json!(inv.state.config.string(&key)))
            }
            ops::GET_ORG_INFO => {
                let NoArgs {} = decode(args)?;
                let state = &*inv.state;
                let info = state.metadata.clone().map(|metadata| OrgInfo {
                    metadata,
                    member_count: state.member_count,
                    steward_count: state.stewards.len() as u64,
                    proposal_count: state.proposal_ids.len() as u64,
                    total_voting_power: state.total_voting_power,
                });
                encode(&info)
            }
            ops::GET_GOVERNANCE_CONFIG => {
                let NoArgs {} = decode(args)?;
                let creator = inv
                    .state
                    .metadata
                    .as_ref()
                    .map_or(Address::ZERO, |m| m.creator);
                encode(&inv.state.config.governance(creator))
            }
            _ => {
                inv.state.require_initialized()?;
                inv.require_controller()?;
                self.write(inv, operation, args)?;
                Ok(Value::Null)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testkit::Fixture;
    use org_state::GovernanceConfig;
    use org_types::{ops, Address, OrgError, OrgInfo, OrgType, ProposalId};
    use serde_json::{json, Value};

    #[test]
    fn raw_and_effective_views() {
        let mut fx = Fixture::initialized();
        assert_eq!(fx.view(ops::GET_NUMBER, json!({"key": "QUORUM"})), Value::Null);
        let config: GovernanceConfig =
            serde_json::from_value(fx.view(ops::GET_GOVERNANCE_CONFIG, json!({}))).unwrap();
        assert_eq!(config.quorum, 20);
        assert_eq!(config.fee_recipient, fx.owner);

        fx.owner_call(ops::SET_NUMBER, json!({"key": "QUORUM", "value": 40}))
            .unwrap();
        fx.owner_call(ops::SET_STRING, json!({"key": "CHARTER", "value": "ipfs://x"}))
            .unwrap();
        assert_eq!(fx.view(ops::GET_NUMBER, json!({"key": "QUORUM"})), json!(40));
        assert_eq!(
            fx.view(ops::GET_STRING, json!({"key": "CHARTER"})),
            json!("ipfs://x")
        );
        assert_eq!(fx.router.events().last().unwrap().event.name(), "ConfigChanged");
    }

    #[test]
    fn writes_are_validated_and_controller_only() {
        let mut fx = Fixture::initialized();
        let member = fx.member("m", 1);
        assert_eq!(
            fx.call(member, ops::SET_NUMBER, json!({"key": "QUORUM", "value": 40})),
            Err(OrgError::NotController(member))
        );
        assert!(matches!(
            fx.owner_call(ops::SET_NUMBER, json!({"key": "QUORUM", "value": 101})),
            Err(OrgError::InvalidConfigValue { .. })
        ));
        assert!(matches!(
            fx.owner_call(ops::SET_NUMBER, json!({"key": "MANAGEMENT_FEE", "value": 10_001})),
            Err(OrgError::InvalidConfigValue { .. })
        ));
        assert_eq!(
            fx.owner_call(
                ops::SET_ADDRESS,
                json!({"key": "FEE_RECIPIENT", "value": Address::ZERO})
            ),
            Err(OrgError::ZeroAddress)
        );
        let unknown = ProposalId::derive(0, &member, 7);
        assert_eq!(
            fx.owner_call(
                ops::SET_PROPOSAL_RECIPIENT,
                json!({"proposal": unknown, "recipient": member})
            ),
            Err(OrgError::ProposalNotFound(unknown))
        );
    }

    #[test]
    fn metadata_update_and_info() {
        let mut fx = Fixture::initialized();
        fx.steward("s");
        fx.owner_call(
            ops::UPDATE_METADATA,
            json!({"name": "Renamed", "org_type": "grant"}),
        )
        .unwrap();
        let info: OrgInfo =
            serde_json::from_value(fx.view(ops::GET_ORG_INFO, json!({}))).unwrap();
        assert_eq!(info.metadata.name, "Renamed");
        assert_eq!(info.metadata.org_type, OrgType::Grant);
        assert_eq!(info.member_count, 1);
        assert_eq!(info.steward_count, 1);
        assert_eq!(info.total_voting_power, 1);
    }

    #[test]
    fn info_is_null_before_initialization() {
        let mut fx = Fixture::bare();
        assert_eq!(fx.view(ops::GET_ORG_INFO, json!({})), Value::Null);
        assert_eq!(
            fx.owner_call(ops::SET_NUMBER, json!({"key": "QUORUM", "value": 40})),
            Err(OrgError::NotInitialized)
        );
    }
}
