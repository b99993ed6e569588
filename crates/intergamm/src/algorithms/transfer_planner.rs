//! # Transfer Planner
//!
//! One-shot decision between a direct transfer and a transfer forwarded
//! through the token's native zone. Produces exactly one `MsgTransfer`;
//! submission is left to the caller.

use super::forwarding::build_forward_receiver;
use super::routing::ZoneRoutingTable;
use crate::domain::{
    validate_address, validate_coin, Coin, Height, IntergammError, MsgTransfer,
};
use crate::ports::AccountRegistry;
use tracing::debug;

/// Which branch the planner took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferRoute {
    /// Single hop to the receiver.
    Direct,
    /// Routed through the native zone with a packet-forward receiver.
    Forward,
}

/// Transfer executed by an interchain account on a remote zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcaTransferRequest {
    /// Controller owner.
    pub owner: String,
    /// Zone hosting the interchain account that sends the tokens.
    pub ica_zone_id: String,
    /// Token to send.
    pub token: Coin,
    /// Final receiver.
    pub final_receiver: String,
    /// Transfer timeout height on the destination.
    pub timeout_height: Height,
    /// Transfer timeout timestamp (unix nanoseconds).
    pub timeout_timestamp: u64,
}

/// Planned ICA transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IcaTransferPlan {
    /// Branch taken.
    pub route: TransferRoute,
    /// Connection from the local zone to the ICA zone; the transfer is sent over it.
    pub connection_id: String,
    /// Message executed by the interchain account.
    pub transfer: MsgTransfer,
}

/// Plan a transfer executed by `owner`'s interchain account on `ica_zone_id`.
///
/// Direct when the token is native to the ICA zone or the local zone. Otherwise
/// the tokens go to the owner's interchain account on the native zone, which
/// forwards them to the local zone.
pub fn plan_ica_transfer(
    table: &ZoneRoutingTable<'_>,
    accounts: &dyn AccountRegistry,
    local_zone_id: &str,
    request: &IcaTransferRequest,
) -> Result<IcaTransferPlan, IntergammError> {
    validate_address(&request.final_receiver)?;
    validate_coin(&request.token)?;

    let ica_zone_info = table.route_info(&request.ica_zone_id)?;
    let connection_id = ica_zone_info.zone_route_info.connection_id.clone();
    let ica_address = accounts.interchain_account_address(&request.owner, &connection_id)?;
    let native_zone_id = table.native_zone_of(&request.token.denom)?;

    let mut transfer = MsgTransfer {
        token: request.token.clone(),
        sender: ica_address,
        timeout_height: request.timeout_height,
        timeout_timestamp: request.timeout_timestamp,
        ..Default::default()
    };

    let route = if native_zone_id == request.ica_zone_id || native_zone_id == local_zone_id {
        transfer.source_port = ica_zone_info.zone_route_info.counterparty_port_id.clone();
        transfer.source_channel = ica_zone_info.zone_route_info.counterparty_channel_id.clone();
        transfer.receiver = request.final_receiver.clone();
        TransferRoute::Direct
    } else {
        let native_zone_info = table.route_info(native_zone_id)?;
        let ica_from_native = table.next_hop(native_zone_id, &request.ica_zone_id)?;
        let native_connection = &native_zone_info.zone_route_info.connection_id;
        let native_ica_address =
            accounts.interchain_account_address(&request.owner, native_connection)?;

        transfer.source_port = ica_from_native.counterparty_port_id.clone();
        transfer.source_channel = ica_from_native.counterparty_channel_id.clone();
        transfer.receiver = build_forward_receiver(
            &native_ica_address,
            &native_zone_info.zone_route_info.counterparty_port_id,
            &native_zone_info.zone_route_info.counterparty_channel_id,
            &request.final_receiver,
        );
        TransferRoute::Forward
    };

    debug!(
        route = ?route,
        ica_zone_id = %request.ica_zone_id,
        native_zone_id = %native_zone_id,
        token = %request.token,
        "[intergamm] Planned ICA transfer"
    );

    Ok(IcaTransferPlan {
        route,
        connection_id,
        transfer,
    })
}

/// Transfer sent from a local account to another zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalTransferRequest {
    /// Local sender.
    pub sender: String,
    /// Destination zone.
    pub dest_zone_id: String,
    /// Token to send.
    pub token: Coin,
    /// Receiver on the destination zone.
    pub receiver: String,
    /// Timeout height.
    pub timeout_height: Height,
    /// Timeout timestamp (unix nanoseconds).
    pub timeout_timestamp: u64,
}

/// Planned local transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalTransferPlan {
    /// Branch taken.
    pub route: TransferRoute,
    /// Message submitted to the local transfer module.
    pub transfer: MsgTransfer,
}

/// Plan a transfer from the local zone to `dest_zone_id`.
///
/// Direct when the token is native to the local zone or the destination;
/// otherwise sent to the native zone and forwarded from there, with the
/// sender's interchain account on the native zone as intermediate receiver.
pub fn plan_local_transfer(
    table: &ZoneRoutingTable<'_>,
    accounts: &dyn AccountRegistry,
    local_zone_id: &str,
    request: &LocalTransferRequest,
) -> Result<LocalTransferPlan, IntergammError> {
    validate_address(&request.receiver)?;
    validate_coin(&request.token)?;

    let native_zone_id = table.native_zone_of(&request.token.denom)?;

    let mut transfer = MsgTransfer {
        token: request.token.clone(),
        sender: request.sender.clone(),
        timeout_height: request.timeout_height,
        timeout_timestamp: request.timeout_timestamp,
        ..Default::default()
    };

    let route = if native_zone_id == local_zone_id || native_zone_id == request.dest_zone_id {
        let dest_zone_info = table.route_info(&request.dest_zone_id)?;
        transfer.source_port = dest_zone_info.zone_route_info.port_id.clone();
        transfer.source_channel = dest_zone_info.zone_route_info.channel_id.clone();
        transfer.receiver = request.receiver.clone();
        TransferRoute::Direct
    } else {
        let native_zone_info = table.route_info(native_zone_id)?;
        let dest_from_native = table.next_hop(native_zone_id, &request.dest_zone_id)?;
        let native_connection = &native_zone_info.zone_route_info.connection_id;
        let native_ica_address =
            accounts.interchain_account_address(&request.sender, native_connection)?;

        transfer.source_port = native_zone_info.zone_route_info.port_id.clone();
        transfer.source_channel = native_zone_info.zone_route_info.channel_id.clone();
        transfer.receiver = build_forward_receiver(
            &native_ica_address,
            &dest_from_native.port_id,
            &dest_from_native.channel_id,
            &request.receiver,
        );
        TransferRoute::Forward
    };

    Ok(LocalTransferPlan { route, transfer })
}
