//! Shared fixtures for the integration suites.

#![allow(dead_code)]

use bech32::{Bech32, Hrp};
use intergamm::{
    Any, BincodeCodec, BlockContext, Codec, IcaMessage, IcaPacketData, IcaRequest,
    InMemoryAccountRegistry, InMemoryChannelLayer, InMemoryTokenTransfer, IntergammConfig, Keeper,
    Packet, Params, RouteInfo, ZoneInfo,
};
use intergamm::domain::{MsgData, TxMsgData};
use intergamm::handler::encode_acknowledgement;
use intergamm::AckOutcome;
use std::sync::Arc;

pub const LOCAL_ZONE: &str = "quasar";
pub const OSMOSIS_CONNECTION: &str = "connection-1";
pub const HUB_CONNECTION: &str = "connection-2";

pub struct Fixture {
    pub keeper: Keeper,
    pub channels: Arc<InMemoryChannelLayer>,
    pub accounts: Arc<InMemoryAccountRegistry>,
    pub transfers: Arc<InMemoryTokenTransfer>,
}

pub fn address(hrp: &str, byte: u8) -> String {
    bech32::encode::<Bech32>(Hrp::parse(hrp).unwrap(), &[byte; 20]).unwrap()
}

pub fn route(zone: &str, counterparty: &str, n: u32) -> RouteInfo {
    RouteInfo {
        zone_id: zone.into(),
        chain_id: format!("{}-1", zone),
        counterparty_zone_id: counterparty.into(),
        counterparty_chain_id: format!("{}-1", counterparty),
        connection_id: format!("connection-{}", n),
        port_id: "transfer".into(),
        channel_id: format!("channel-{}", n),
        counterparty_connection_id: format!("connection-{}", n + 100),
        counterparty_port_id: "transfer".into(),
        counterparty_channel_id: format!("channel-{}", n + 100),
    }
}

/// quasar <-> osmosis (n=1), quasar <-> cosmoshub (n=2), cosmoshub <-> osmosis (n=3).
pub fn params() -> Params {
    let mut params = Params::default();

    let mut osmosis = ZoneInfo {
        zone_route_info: route(LOCAL_ZONE, "osmosis", 1),
        ..Default::default()
    };
    osmosis
        .next_zone_route_map
        .insert("cosmoshub".into(), route("osmosis", "cosmoshub", 4));

    let mut hub = ZoneInfo {
        zone_route_info: route(LOCAL_ZONE, "cosmoshub", 2),
        ..Default::default()
    };
    hub.next_zone_route_map
        .insert("osmosis".into(), route("cosmoshub", "osmosis", 3));

    params.complete_zone_info_map.insert("osmosis".into(), osmosis);
    params.complete_zone_info_map.insert("cosmoshub".into(), hub);
    for (denom, zone) in [("uosmo", "osmosis"), ("uatom", "cosmoshub"), ("uqsr", LOCAL_ZONE)] {
        params
            .denom_to_native_zone_id_map
            .insert(denom.into(), zone.into());
    }
    params
}

pub fn fixture() -> Fixture {
    let channels = Arc::new(InMemoryChannelLayer::new());
    let accounts = Arc::new(InMemoryAccountRegistry::new());
    let transfers = Arc::new(InMemoryTokenTransfer::new(channels.clone()));
    let keeper = Keeper::new(
        IntergammConfig::with_params(params()),
        channels.clone(),
        accounts.clone(),
        Arc::new(BincodeCodec),
        transfers.clone(),
    )
    .unwrap();
    Fixture {
        keeper,
        channels,
        accounts,
        transfers,
    }
}

impl Fixture {
    /// Register `owner`'s ICA on a connection and open its controller channel.
    pub fn open_ica(&self, owner: &str, connection_id: &str, ica_address: &str, channel_id: &str) {
        self.accounts.insert(owner, connection_id, ica_address);
        self.channels
            .open_channel(connection_id, &format!("icacontroller-{}", owner), channel_id);
    }

    /// The last packet submitted to the channel layer.
    pub fn last_packet(&self) -> Packet {
        self.channels.sent_packets().pop().unwrap()
    }
}

pub fn ctx() -> BlockContext {
    BlockContext::new(100, 1_000_000)
}

/// Packet carrying the given messages, as a controller would send it.
pub fn packet_with(sequence: u64, messages: &[IcaMessage]) -> Packet {
    let anys: Vec<Any> = messages.iter().map(|m| m.to_any().unwrap()).collect();
    let data = BincodeCodec.serialize(&anys).unwrap();
    Packet {
        sequence,
        source_port: "icacontroller-owner".into(),
        source_channel: "channel-0".into(),
        data: IcaPacketData::execute_tx(data).to_bytes().unwrap(),
        ..Default::default()
    }
}

/// Success acknowledgement bytes for a `K` request.
pub fn success_ack<K: IcaRequest>(response: &K::Response) -> Vec<u8> {
    success_ack_tagged(K::ack_msg_type(), K::encode_response(response).unwrap())
}

/// Success acknowledgement bytes with an arbitrary type tag.
pub fn success_ack_tagged(msg_type: &str, data: Vec<u8>) -> Vec<u8> {
    let tx = TxMsgData {
        data: vec![MsgData {
            msg_type: msg_type.to_string(),
            data,
        }],
    };
    let result = BincodeCodec.encode_msg_data(&tx).unwrap();
    encode_acknowledgement(&AckOutcome::Success(result)).unwrap()
}

/// Error acknowledgement bytes.
pub fn error_ack(err: &str) -> Vec<u8> {
    encode_acknowledgement(&AckOutcome::Failure(err.to_string())).unwrap()
}
