//! Bincode Codec Adapter
//!
//! Implements `Codec` for `CosmosTx` payloads and `TxMsgData` ack results.

use crate::domain::{Any, CosmosTx, IntergammError, TxMsgData};
use crate::ports::outbound::Codec;

/// Bincode-backed transaction codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct BincodeCodec;

impl Codec for BincodeCodec {
    fn serialize(&self, messages: &[Any]) -> Result<Vec<u8>, IntergammError> {
        let tx = CosmosTx {
            messages: messages.to_vec(),
        };
        bincode::serialize(&tx).map_err(|e| IntergammError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Vec<Any>, IntergammError> {
        let tx: CosmosTx = bincode::deserialize(bytes).map_err(|e| {
            IntergammError::Deserialization(format!("cannot deserialize packet data: {}", e))
        })?;
        Ok(tx.messages)
    }

    fn encode_msg_data(&self, data: &TxMsgData) -> Result<Vec<u8>, IntergammError> {
        bincode::serialize(data).map_err(|e| IntergammError::Serialization(e.to_string()))
    }

    fn decode_msg_data(&self, bytes: &[u8]) -> Result<TxMsgData, IntergammError> {
        bincode::deserialize(bytes).map_err(|e| {
            IntergammError::Deserialization(format!("cannot unmarshal tx message data: {}", e))
        })
    }
}
