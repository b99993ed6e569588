//! # Packet Data
//!
//! The JSON envelope carried in the data field of every interchain account
//! packet, the ICS-20 transfer packet data sent by the local transfer module,
//! and the channel-level packet record handed to the callbacks.

use super::errors::IntergammError;
use super::messages::{HookRequest, MsgTransfer};
use super::value_objects::{Height, MessageKind, Sequence};
use serde::{Deserialize, Serialize};

/// Envelope type tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IcaPacketType {
    /// Default value, never sent.
    #[serde(rename = "TYPE_UNSPECIFIED")]
    Unspecified,
    /// Execute the carried transaction on the host.
    #[serde(rename = "TYPE_EXECUTE_TX")]
    ExecuteTx,
}

/// Envelope around an encoded `CosmosTx`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IcaPacketData {
    /// Type tag.
    #[serde(rename = "type")]
    pub packet_type: IcaPacketType,
    /// Codec-encoded transaction.
    pub data: Vec<u8>,
    /// Free-form memo.
    #[serde(default)]
    pub memo: String,
}

impl IcaPacketData {
    /// Envelope executing `data` on the host.
    pub fn execute_tx(data: Vec<u8>) -> Self {
        Self {
            packet_type: IcaPacketType::ExecuteTx,
            data,
            memo: String::new(),
        }
    }

    /// Encode as packet data bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IntergammError> {
        serde_json::to_vec(self).map_err(|e| IntergammError::Serialization(e.to_string()))
    }

    /// Decode packet data bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IntergammError> {
        serde_json::from_slice(bytes).map_err(|e| {
            IntergammError::Deserialization(format!(
                "cannot unmarshal ICS-27 interchain account packet data: {}",
                e
            ))
        })
    }
}

/// ICS-20 fungible token packet data.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleTokenPacketData {
    /// Denomination, possibly prefixed with its trace path.
    pub denom: String,
    /// Amount as a decimal string.
    pub amount: String,
    /// Sender on the sending chain.
    pub sender: String,
    /// Receiver on the receiving chain.
    pub receiver: String,
    /// Free-form memo.
    #[serde(default)]
    pub memo: String,
}

impl FungibleTokenPacketData {
    /// Packet data the transfer module sends for `msg`.
    pub fn from_transfer(msg: &MsgTransfer) -> Self {
        Self {
            denom: msg.token.denom.clone(),
            amount: msg.token.amount.to_string(),
            sender: msg.sender.clone(),
            receiver: msg.receiver.clone(),
            memo: String::new(),
        }
    }

    /// Encode as packet data bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, IntergammError> {
        serde_json::to_vec(self).map_err(|e| IntergammError::Serialization(e.to_string()))
    }

    /// Decode packet data bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IntergammError> {
        serde_json::from_slice(bytes).map_err(|e| {
            IntergammError::Deserialization(format!(
                "cannot unmarshal ICS-20 transfer packet data: {}",
                e
            ))
        })
    }
}

/// Response of a local transfer acknowledgement. Carries nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgEmptyIbcResponse {}

impl HookRequest for FungibleTokenPacketData {
    type Response = MsgEmptyIbcResponse;
    const KIND: MessageKind = MessageKind::IbcTransfer;
}

/// A packet as seen by the controller-side callbacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Packet {
    /// Sequence assigned at send time.
    pub sequence: Sequence,
    /// Controller port.
    pub source_port: String,
    /// Controller channel.
    pub source_channel: String,
    /// Host port.
    pub destination_port: String,
    /// Host channel.
    pub destination_channel: String,
    /// Envelope bytes.
    pub data: Vec<u8>,
    /// Timeout height.
    pub timeout_height: Height,
    /// Timeout timestamp (unix nanoseconds).
    pub timeout_timestamp: u64,
}
