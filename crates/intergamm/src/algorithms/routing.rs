//! # Zone Routing Table
//!
//! Read-only lookups over the zone graph and the denom -> native zone map.
//! Missing entries are typed errors, never panics.

use crate::config::Params;
use crate::domain::{IntergammError, RouteInfo, ZoneInfo};

/// Borrowed view over the routing section of [`Params`].
#[derive(Clone, Copy, Debug)]
pub struct ZoneRoutingTable<'a> {
    params: &'a Params,
}

impl<'a> ZoneRoutingTable<'a> {
    /// Create a table over the given params.
    pub fn new(params: &'a Params) -> Self {
        Self { params }
    }

    /// Route and next hops of a zone.
    pub fn route_info(&self, zone_id: &str) -> Result<&'a ZoneInfo, IntergammError> {
        self.params
            .complete_zone_info_map
            .get(zone_id)
            .ok_or_else(|| {
                IntergammError::ZoneRouteNotFound(format!(
                    "zone info for zone ID '{}' not specified",
                    zone_id
                ))
            })
    }

    /// Hop from `from_zone_id` toward `toward_zone_id`.
    pub fn next_hop(
        &self,
        from_zone_id: &str,
        toward_zone_id: &str,
    ) -> Result<&'a RouteInfo, IntergammError> {
        self.route_info(from_zone_id)?
            .next_zone_route_map
            .get(toward_zone_id)
            .ok_or_else(|| {
                IntergammError::ZoneRouteNotFound(format!(
                    "zone ID '{}' not found in next_zone_route_map of zone '{}'",
                    toward_zone_id, from_zone_id
                ))
            })
    }

    /// Native zone of a denom.
    pub fn native_zone_of(&self, denom: &str) -> Result<&'a str, IntergammError> {
        self.params
            .denom_to_native_zone_id_map
            .get(denom)
            .map(String::as_str)
            .ok_or_else(|| IntergammError::NativeZoneUnspecified(denom.to_string()))
    }

    /// Local denom that an Osmosis denom maps to, if configured.
    pub fn quasar_denom_of(&self, osmosis_denom: &str) -> Option<&'a str> {
        self.params
            .osmosis_denom_to_quasar_denom_map
            .get(osmosis_denom)
            .map(String::as_str)
    }

    /// Zone info of a denom's native zone.
    pub fn native_zone_info(&self, denom: &str) -> Result<&'a ZoneInfo, IntergammError> {
        let zone_id = self.native_zone_of(denom)?;
        self.route_info(zone_id)
    }
}
