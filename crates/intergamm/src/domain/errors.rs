//! # Domain Errors
//!
//! Error taxonomy for ICA packet routing, zone routing and transfer planning.

use super::value_objects::MessageKind;
use thiserror::Error;

/// Error returned by a registered ack or timeout hook.
pub type HookError = anyhow::Error;

/// Rejection reported by the channel layer when submitting a packet.
///
/// Propagated verbatim through [`IntergammError::Channel`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    /// Channel does not exist or is not open.
    #[error("channel {channel_id} on port {port_id} is not open")]
    ChannelClosed {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
    },

    /// Next send sequence is not tracked for the channel.
    #[error("sequence send not found for port {port_id}, channel {channel_id}")]
    SequenceSendNotFound {
        /// Port identifier
        port_id: String,
        /// Channel identifier
        channel_id: String,
    },

    /// Timeout already elapsed at submission time.
    #[error("packet timeout {timeout} already elapsed at block time {now}")]
    TimeoutElapsed {
        /// Requested absolute timeout (nanoseconds)
        timeout: u64,
        /// Current block time (nanoseconds)
        now: u64,
    },

    /// Any other rejection.
    #[error("channel rejected packet: {0}")]
    Rejected(String),
}

/// Intergamm error types.
#[derive(Debug, Error)]
pub enum IntergammError {
    /// Bytes could not be decoded into the expected structure.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Value could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Wrong message count or a type tag mismatch.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// Message type URL outside the supported set.
    #[error("unsupported message kind: {0}")]
    UnsupportedMessageKind(String),

    /// ICA packet envelope of a type other than EXECUTE_TX.
    #[error("unsupported packet type: {0}")]
    UnsupportedPacketType(String),

    /// Zone or hop missing from the routing table.
    #[error("zone route not found: {0}")]
    ZoneRouteNotFound(String),

    /// Denom has no configured native zone.
    #[error("native zone of denom '{0}' not specified")]
    NativeZoneUnspecified(String),

    /// No interchain account (or active channel) for the owner on the connection.
    #[error("interchain account owned by {owner} not found on connection {connection_id}")]
    InterchainAccountNotFound {
        /// Controller owner
        owner: String,
        /// Connection identifier
        connection_id: String,
    },

    /// Malformed chain address.
    #[error("invalid address '{address}': {reason}")]
    InvalidAddress {
        /// Offending address
        address: String,
        /// Reason
        reason: String,
    },

    /// Malformed denomination.
    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    /// Malformed coin.
    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    /// Module parameters failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A hook returned an error; remaining hooks were not invoked.
    #[error("{kind} hook failed: {source}")]
    HookFailed {
        /// Message kind whose hook failed
        kind: MessageKind,
        /// Underlying hook error
        #[source]
        source: HookError,
    },

    /// Channel-layer rejection.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl IntergammError {
    /// Shorthand for [`IntergammError::InterchainAccountNotFound`].
    pub fn ica_not_found(owner: &str, connection_id: &str) -> Self {
        Self::InterchainAccountNotFound {
            owner: owner.to_string(),
            connection_id: connection_id.to_string(),
        }
    }

    /// Shorthand for [`IntergammError::InvalidAddress`].
    pub fn invalid_address(address: &str, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            address: address.to_string(),
            reason: reason.into(),
        }
    }
}
