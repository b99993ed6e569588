//! # Outbound Ports
//!
//! Collaborators the module drives: the IBC channel layer, the interchain
//! account registry, the transaction codec and the local transfer module.

use crate::domain::{Any, BlockContext, ChannelError, IntergammError, MsgTransfer, Sequence, TxMsgData};

/// IBC channel layer - outbound port.
///
/// Allocates sequences and guarantees exactly one ack or timeout per sent packet.
pub trait ChannelLayer: Send + Sync {
    /// Active ICA channel for a controller port on a connection.
    fn active_channel_id(&self, connection_id: &str, port_id: &str) -> Option<String>;

    /// Sequence the next packet on (port, channel) will get.
    fn next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<Sequence>;

    /// Connection a channel runs over.
    fn channel_connection(&self, port_id: &str, channel_id: &str) -> Option<String>;

    /// Submit a packet; returns its sequence.
    fn send_packet(
        &self,
        ctx: &BlockContext,
        port_id: &str,
        channel_id: &str,
        data: Vec<u8>,
        timeout_timestamp: u64,
    ) -> Result<Sequence, ChannelError>;
}

/// Interchain account registry - outbound port.
pub trait AccountRegistry: Send + Sync {
    /// Address of the owner's interchain account on a connection.
    ///
    /// Returns `InterchainAccountNotFound` when none is registered.
    fn interchain_account_address(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<String, IntergammError>;

    /// Start registration of an interchain account for the owner.
    fn register_interchain_account(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<(), IntergammError>;
}

/// Transaction codec - outbound port.
pub trait Codec: Send + Sync {
    /// Encode messages into a packet payload.
    fn serialize(&self, messages: &[Any]) -> Result<Vec<u8>, IntergammError>;

    /// Decode a packet payload into messages.
    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Any>, IntergammError>;

    /// Encode the result section of a success acknowledgement.
    fn encode_msg_data(&self, data: &TxMsgData) -> Result<Vec<u8>, IntergammError>;

    /// Decode the result section of a success acknowledgement.
    fn decode_msg_data(&self, bytes: &[u8]) -> Result<TxMsgData, IntergammError>;
}

/// Local ICS-20 transfer module - outbound port.
pub trait TokenTransfer: Send + Sync {
    /// Send tokens from a local account; returns the sequence of the transfer packet.
    fn send_transfer(
        &self,
        ctx: &BlockContext,
        msg: &MsgTransfer,
    ) -> Result<Sequence, IntergammError>;
}
