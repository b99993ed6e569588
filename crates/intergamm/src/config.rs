//! Configuration for the Intergamm module
//!
//! `Params` is the governance-controlled zone graph and denom mapping;
//! `IntergammConfig` adds node-local settings.

use crate::domain::{validate_denom, validate_identifier, IntergammError, RouteInfo, ZoneInfo};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;

/// Zone id of the local chain.
pub const DEFAULT_LOCAL_ZONE_ID: &str = "quasar";

/// Default relative timeout for ICA transactions (10 minutes).
pub const DEFAULT_RELATIVE_TIMEOUT_NANOS: u64 = 10 * 60 * 1_000_000_000;

/// Module parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Local denom -> id of the zone that issues it.
    #[serde(default)]
    pub denom_to_native_zone_id_map: BTreeMap<String, String>,
    /// Osmosis denom -> local denom.
    #[serde(default)]
    pub osmosis_denom_to_quasar_denom_map: BTreeMap<String, String>,
    /// Zone id -> route and next hops.
    #[serde(default)]
    pub complete_zone_info_map: BTreeMap<String, ZoneInfo>,
}

impl Params {
    /// Parse params from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self, IntergammError> {
        let params: Params = serde_json::from_str(json)
            .map_err(|e| IntergammError::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Validate every map entry.
    pub fn validate(&self) -> Result<(), IntergammError> {
        for (denom, native_zone_id) in &self.denom_to_native_zone_id_map {
            validate_denom(denom)?;
            validate_identifier(native_zone_id)?;
        }
        for (osmosis_denom, quasar_denom) in &self.osmosis_denom_to_quasar_denom_map {
            validate_denom(osmosis_denom)?;
            validate_denom(quasar_denom)?;
        }
        for (zone_id, info) in &self.complete_zone_info_map {
            validate_identifier(zone_id)?;
            validate_zone_info(info)?;
        }
        Ok(())
    }
}

fn validate_route_info(info: &RouteInfo) -> Result<(), IntergammError> {
    for id in [
        &info.zone_id,
        &info.chain_id,
        &info.counterparty_zone_id,
        &info.counterparty_chain_id,
        &info.connection_id,
        &info.port_id,
        &info.channel_id,
        &info.counterparty_connection_id,
        &info.counterparty_port_id,
        &info.counterparty_channel_id,
    ] {
        validate_identifier(id)?;
    }
    Ok(())
}

fn validate_zone_info(info: &ZoneInfo) -> Result<(), IntergammError> {
    validate_route_info(&info.zone_route_info)?;
    for (zone_id, hop) in &info.next_zone_route_map {
        validate_identifier(zone_id)?;
        validate_route_info(hop)?;
        if *zone_id != hop.counterparty_zone_id {
            return Err(IntergammError::InvalidParams(format!(
                "counterparty zone ID '{}' of next_zone_route_map member does not match the map key '{}'",
                hop.counterparty_zone_id, zone_id
            )));
        }
        if info.zone_route_info.counterparty_zone_id != hop.zone_id {
            return Err(IntergammError::InvalidParams(format!(
                "zone ID '{}' of next_zone_route_map member does not match counterparty zone ID '{}' of its parent",
                hop.zone_id, info.zone_route_info.counterparty_zone_id
            )));
        }
    }
    Ok(())
}

/// Node configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IntergammConfig {
    /// Zone id of this chain.
    pub local_zone_id: String,
    /// Relative timeout applied when a caller passes `TxTimeout::Absolute(0)`.
    pub default_relative_timeout_nanos: u64,
    /// Zone graph and denom mapping.
    pub params: Params,
}

impl Default for IntergammConfig {
    fn default() -> Self {
        Self {
            local_zone_id: DEFAULT_LOCAL_ZONE_ID.to_string(),
            default_relative_timeout_nanos: DEFAULT_RELATIVE_TIMEOUT_NANOS,
            params: Params::default(),
        }
    }
}

impl IntergammConfig {
    /// Create a configuration with the given params.
    pub fn with_params(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    /// Apply environment overrides.
    ///
    /// # Environment Variables
    ///
    /// - `INTERGAMM_LOCAL_ZONE_ID`: local zone id (default: quasar)
    /// - `INTERGAMM_RELATIVE_TIMEOUT_NANOS`: default relative ICA timeout
    pub fn from_env(params: Params) -> Self {
        let mut config = Self::with_params(params);
        if let Ok(zone) = env::var("INTERGAMM_LOCAL_ZONE_ID") {
            if !zone.is_empty() {
                config.local_zone_id = zone;
            }
        }
        if let Some(nanos) = env::var("INTERGAMM_RELATIVE_TIMEOUT_NANOS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
        {
            config.default_relative_timeout_nanos = nanos;
        }
        config
    }

    /// Validate local settings and params.
    pub fn validate(&self) -> Result<(), IntergammError> {
        validate_identifier(&self.local_zone_id)?;
        if self.default_relative_timeout_nanos == 0 {
            return Err(IntergammError::InvalidParams(
                "default relative timeout cannot be 0".to_string(),
            ));
        }
        self.params.validate()
    }
}
