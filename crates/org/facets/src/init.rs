//! Initialization facet. Runs once, as the owner, usually as the
//! initializer attached to the cut that installs the standard facets.

use crate::args::{decode, InitializeArgs};
use crate::membership::{grant_steward, register};
use org_router::{Facet, Invocation};
use org_state::config::keys;
use org_types::{ops, OrgError, OrgEvent, OrgMetadata, OrgResult};
use serde_json::{json, Value};
use tracing::info;

pub struct InitFacet;

impl InitFacet {
    pub const OPERATIONS: &'static [&'static str] = &[ops::INITIALIZE];
}

impl Facet for InitFacet {
    fn name(&self) -> &'static str {
        "init"
    }

    fn operations(&self) -> &'static [&'static str] {
        Self::OPERATIONS
    }

    fn invoke(
        &self,
        inv: &mut Invocation<'_>,
        _operation: &'static str,
        args: &Value,
    ) -> OrgResult<Value> {
        inv.require_controller()?;
        if inv.state.is_initialized() {
            return Err(OrgError::AlreadyInitialized);
        }
        let args: InitializeArgs = decode(args)?;
        let creator = args.creator.unwrap_or(inv.caller());
        if creator.is_zero() {
            return Err(OrgError::ZeroAddress);
        }

        inv.state.metadata = Some(OrgMetadata {
            name: args.name.clone(),
            org_type: args.org_type,
            creator,
            created_at: inv.now(),
        });

        let config = &mut inv.state.config;
        let numbers = [
            (keys::VOTING_PERIOD, args.voting_period),
            (keys::QUORUM, args.quorum),
            (keys::MAJORITY, args.majority),
            (keys::MANAGEMENT_FEE, args.management_fee_bps),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                config.set_number(key, value)?;
            }
        }
        if let Some(recipient) = args.fee_recipient {
            config.set_address(keys::FEE_RECIPIENT, recipient)?;
        }

        for genesis in &args.members {
            register(inv, genesis.address, genesis.shares)?;
            if genesis.steward {
                grant_steward(inv, genesis.address)?;
            }
        }

        info!(
            name = %args.name,
            org_type = %args.org_type,
            %creator,
            members = args.members.len(),
            "Organization initialized"
        );
        inv.emit(OrgEvent::Initialized {
            name: args.name,
            org_type: args.org_type,
            creator,
        });
        Ok(json!(creator))
    }
}
