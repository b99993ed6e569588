//! # Chain Messages
//!
//! The closed set of messages sent through interchain accounts, their
//! acknowledgement responses, and the wire envelopes carrying them.
//!
//! Message values inside an [`Any`] are bincode-encoded. The envelopes
//! themselves are encoded by a [`crate::ports::Codec`].

use super::errors::IntergammError;
use super::value_objects::{Coin, Height, MessageKind};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Type-URL tagged message value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Any {
    /// Fully-qualified message type URL.
    pub type_url: String,
    /// Encoded message.
    pub value: Vec<u8>,
}

/// Transaction body executed by the host-side interchain account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmosTx {
    /// Messages, in execution order.
    pub messages: Vec<Any>,
}

/// Result entry for one executed message.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgData {
    /// Type URL of the executed message.
    pub msg_type: String,
    /// Encoded response.
    pub data: Vec<u8>,
}

/// Result bytes of a successful acknowledgement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxMsgData {
    /// One entry per executed message.
    pub data: Vec<MsgData>,
}

/// A request whose outcome is reported to hooks once its packet resolves.
pub trait HookRequest: Clone + fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Response handed to ack hooks.
    type Response: Clone
        + fmt::Debug
        + Default
        + PartialEq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Kind tag.
    const KIND: MessageKind;
}

/// A message this module can send over an interchain account and correlate
/// with its acknowledgement.
pub trait IcaRequest: HookRequest + Serialize + DeserializeOwned {
    /// Type URL of the request.
    const TYPE_URL: &'static str;

    /// Type tag the host echoes in the acknowledgement's `MsgData` entry.
    fn ack_msg_type() -> &'static str {
        Self::TYPE_URL
    }

    /// Set the interchain account that signs the message on the host.
    fn set_signer(&mut self, signer: &str);

    /// Signer currently set on the message.
    fn signer(&self) -> &str;

    /// Wrap into the closed message union.
    fn into_message(self) -> IcaMessage;

    /// Encode as an [`Any`].
    fn to_any(&self) -> Result<Any, IntergammError> {
        let value = bincode::serialize(self)
            .map_err(|e| IntergammError::Serialization(format!("{}: {}", Self::TYPE_URL, e)))?;
        Ok(Any {
            type_url: Self::TYPE_URL.to_string(),
            value,
        })
    }

    /// Decode the response payload of an acknowledgement.
    fn decode_response(bytes: &[u8]) -> Result<Self::Response, IntergammError> {
        bincode::deserialize(bytes).map_err(|e| {
            IntergammError::Deserialization(format!(
                "cannot unmarshal {} acknowledgement: {}",
                Self::KIND,
                e
            ))
        })
    }

    /// Encode a response payload (host side, used to build acknowledgements).
    fn encode_response(response: &Self::Response) -> Result<Vec<u8>, IntergammError> {
        bincode::serialize(response).map_err(|e| IntergammError::Serialization(e.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Requests and responses
// -----------------------------------------------------------------------------

/// ICS-20 transfer executed by an interchain account.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransfer {
    /// Source port on the sending chain.
    pub source_port: String,
    /// Source channel on the sending chain.
    pub source_channel: String,
    /// Token to send.
    pub token: Coin,
    /// Sender address.
    pub sender: String,
    /// Receiver address, possibly a packet-forward receiver.
    pub receiver: String,
    /// Timeout height on the destination.
    pub timeout_height: Height,
    /// Timeout timestamp in unix nanoseconds.
    pub timeout_timestamp: u64,
}

/// Response to [`MsgTransfer`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgTransferResponse {
    /// Sequence of the transfer packet on the host chain.
    pub sequence: u64,
}

/// Weight of one asset in a balancer pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAsset {
    /// Asset amount.
    pub token: Coin,
    /// Relative weight.
    pub weight: u128,
}

/// Balancer pool fee parameters, as decimal strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    /// Swap fee.
    pub swap_fee: String,
    /// Exit fee.
    pub exit_fee: String,
}

/// Create a balancer pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateBalancerPool {
    /// Sender.
    pub sender: String,
    /// Fee parameters.
    pub pool_params: PoolParams,
    /// Initial assets.
    pub pool_assets: Vec<PoolAsset>,
    /// Future governor.
    pub future_pool_governor: String,
}

/// Response to [`MsgCreateBalancerPool`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateBalancerPoolResponse {
    /// Id of the new pool.
    pub pool_id: u64,
}

/// Join a pool with all assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinPool {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Shares requested.
    pub share_out_amount: u128,
    /// Maximum tokens spent.
    pub token_in_maxs: Vec<Coin>,
}

/// Response to [`MsgJoinPool`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinPoolResponse {
    /// Shares received.
    pub share_out_amount: u128,
    /// Tokens spent.
    pub token_in: Vec<Coin>,
}

/// Exit a pool for all assets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitPool {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Shares burned.
    pub share_in_amount: u128,
    /// Minimum tokens received.
    pub token_out_mins: Vec<Coin>,
}

/// Response to [`MsgExitPool`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitPoolResponse {
    /// Tokens received.
    pub token_out: Vec<Coin>,
}

/// Join a pool with a single asset and a fixed amount in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinSwapExternAmountIn {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Token in.
    pub token_in: Coin,
    /// Minimum shares received.
    pub share_out_min_amount: u128,
}

/// Response to [`MsgJoinSwapExternAmountIn`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinSwapExternAmountInResponse {
    /// Shares received.
    pub share_out_amount: u128,
}

/// Exit a pool into a single asset with a fixed amount out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitSwapExternAmountOut {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Token out.
    pub token_out: Coin,
    /// Maximum shares burned.
    pub share_in_max_amount: u128,
}

/// Response to [`MsgExitSwapExternAmountOut`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitSwapExternAmountOutResponse {
    /// Shares burned.
    pub share_in_amount: u128,
}

/// Join a pool with a single asset for a fixed share amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinSwapShareAmountOut {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Denom of the token in.
    pub token_in_denom: String,
    /// Shares requested.
    pub share_out_amount: u128,
    /// Maximum token in.
    pub token_in_max_amount: u128,
}

/// Response to [`MsgJoinSwapShareAmountOut`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgJoinSwapShareAmountOutResponse {
    /// Token spent.
    pub token_in_amount: u128,
}

/// Exit a pool into a single asset for a fixed share amount.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitSwapShareAmountIn {
    /// Sender.
    pub sender: String,
    /// Pool id.
    pub pool_id: u64,
    /// Denom of the token out.
    pub token_out_denom: String,
    /// Shares burned.
    pub share_in_amount: u128,
    /// Minimum token out.
    pub token_out_min_amount: u128,
}

/// Response to [`MsgExitSwapShareAmountIn`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExitSwapShareAmountInResponse {
    /// Token received.
    pub token_out_amount: u128,
}

/// Lock tokens for a duration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgLockTokens {
    /// Owner.
    pub owner: String,
    /// Lock duration.
    pub duration: Duration,
    /// Coins locked.
    pub coins: Vec<Coin>,
}

/// Response to [`MsgLockTokens`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgLockTokensResponse {
    /// Lock id.
    pub id: u64,
}

/// Begin unlocking a lock.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBeginUnlocking {
    /// Owner.
    pub owner: String,
    /// Lock id.
    pub id: u64,
    /// Coins to unlock; empty unlocks everything.
    pub coins: Vec<Coin>,
}

/// Response to [`MsgBeginUnlocking`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBeginUnlockingResponse {
    /// Whether unlocking started.
    pub success: bool,
}

// -----------------------------------------------------------------------------
// Closed union
// -----------------------------------------------------------------------------

/// A decoded message from a packet payload.
///
/// Unknown type URLs land in [`IcaMessage::Unsupported`]; adding a kind means
/// adding a variant and handling it in every match.
#[derive(Clone, Debug, PartialEq)]
pub enum IcaMessage {
    /// [`MsgTransfer`]
    Transfer(MsgTransfer),
    /// [`MsgCreateBalancerPool`]
    CreateBalancerPool(MsgCreateBalancerPool),
    /// [`MsgJoinPool`]
    JoinPool(MsgJoinPool),
    /// [`MsgExitPool`]
    ExitPool(MsgExitPool),
    /// [`MsgJoinSwapExternAmountIn`]
    JoinSwapExternAmountIn(MsgJoinSwapExternAmountIn),
    /// [`MsgExitSwapExternAmountOut`]
    ExitSwapExternAmountOut(MsgExitSwapExternAmountOut),
    /// [`MsgJoinSwapShareAmountOut`]
    JoinSwapShareAmountOut(MsgJoinSwapShareAmountOut),
    /// [`MsgExitSwapShareAmountIn`]
    ExitSwapShareAmountIn(MsgExitSwapShareAmountIn),
    /// [`MsgLockTokens`]
    LockTokens(MsgLockTokens),
    /// [`MsgBeginUnlocking`]
    BeginUnlocking(MsgBeginUnlocking),
    /// Type URL outside the supported set.
    Unsupported(Any),
}

macro_rules! ica_request {
    ($msg:ident => $resp:ident, $kind:ident, $url:literal, $signer:ident) => {
        impl HookRequest for $msg {
            type Response = $resp;
            const KIND: MessageKind = MessageKind::$kind;
        }

        impl IcaRequest for $msg {
            const TYPE_URL: &'static str = $url;

            fn set_signer(&mut self, signer: &str) {
                self.$signer = signer.to_string();
            }

            fn signer(&self) -> &str {
                &self.$signer
            }

            fn into_message(self) -> IcaMessage {
                IcaMessage::$kind(self)
            }
        }
    };
}

ica_request!(MsgTransfer => MsgTransferResponse, Transfer,
    "/ibc.applications.transfer.v1.MsgTransfer", sender);
ica_request!(MsgCreateBalancerPool => MsgCreateBalancerPoolResponse, CreateBalancerPool,
    "/osmosis.gamm.poolmodels.balancer.v1beta1.MsgCreateBalancerPool", sender);
ica_request!(MsgJoinPool => MsgJoinPoolResponse, JoinPool,
    "/osmosis.gamm.v1beta1.MsgJoinPool", sender);
ica_request!(MsgExitPool => MsgExitPoolResponse, ExitPool,
    "/osmosis.gamm.v1beta1.MsgExitPool", sender);
ica_request!(MsgJoinSwapExternAmountIn => MsgJoinSwapExternAmountInResponse, JoinSwapExternAmountIn,
    "/osmosis.gamm.v1beta1.MsgJoinSwapExternAmountIn", sender);
ica_request!(MsgExitSwapExternAmountOut => MsgExitSwapExternAmountOutResponse, ExitSwapExternAmountOut,
    "/osmosis.gamm.v1beta1.MsgExitSwapExternAmountOut", sender);
ica_request!(MsgJoinSwapShareAmountOut => MsgJoinSwapShareAmountOutResponse, JoinSwapShareAmountOut,
    "/osmosis.gamm.v1beta1.MsgJoinSwapShareAmountOut", sender);
ica_request!(MsgExitSwapShareAmountIn => MsgExitSwapShareAmountInResponse, ExitSwapShareAmountIn,
    "/osmosis.gamm.v1beta1.MsgExitSwapShareAmountIn", sender);
ica_request!(MsgLockTokens => MsgLockTokensResponse, LockTokens,
    "/osmosis.lockup.MsgLockTokens", owner);
ica_request!(MsgBeginUnlocking => MsgBeginUnlockingResponse, BeginUnlocking,
    "/osmosis.lockup.MsgBeginUnlocking", owner);

fn unpack<K: IcaRequest>(any: &Any) -> Result<K, IntergammError> {
    bincode::deserialize(&any.value).map_err(|e| {
        IntergammError::Deserialization(format!("cannot decode {}: {}", any.type_url, e))
    })
}

impl IcaMessage {
    /// Decode an [`Any`] into the closed union.
    ///
    /// A known type URL with undecodable bytes is a deserialization error; an
    /// unknown type URL is `Unsupported`.
    pub fn from_any(any: &Any) -> Result<Self, IntergammError> {
        let url = any.type_url.as_str();
        let msg = if url == MsgTransfer::TYPE_URL {
            IcaMessage::Transfer(unpack(any)?)
        } else if url == MsgCreateBalancerPool::TYPE_URL {
            IcaMessage::CreateBalancerPool(unpack(any)?)
        } else if url == MsgJoinPool::TYPE_URL {
            IcaMessage::JoinPool(unpack(any)?)
        } else if url == MsgExitPool::TYPE_URL {
            IcaMessage::ExitPool(unpack(any)?)
        } else if url == MsgJoinSwapExternAmountIn::TYPE_URL {
            IcaMessage::JoinSwapExternAmountIn(unpack(any)?)
        } else if url == MsgExitSwapExternAmountOut::TYPE_URL {
            IcaMessage::ExitSwapExternAmountOut(unpack(any)?)
        } else if url == MsgJoinSwapShareAmountOut::TYPE_URL {
            IcaMessage::JoinSwapShareAmountOut(unpack(any)?)
        } else if url == MsgExitSwapShareAmountIn::TYPE_URL {
            IcaMessage::ExitSwapShareAmountIn(unpack(any)?)
        } else if url == MsgLockTokens::TYPE_URL {
            IcaMessage::LockTokens(unpack(any)?)
        } else if url == MsgBeginUnlocking::TYPE_URL {
            IcaMessage::BeginUnlocking(unpack(any)?)
        } else {
            IcaMessage::Unsupported(any.clone())
        };
        Ok(msg)
    }

    /// Encode as an [`Any`]. `Unsupported` messages are passed through as-is.
    pub fn to_any(&self) -> Result<Any, IntergammError> {
        match self {
            IcaMessage::Transfer(m) => m.to_any(),
            IcaMessage::CreateBalancerPool(m) => m.to_any(),
            IcaMessage::JoinPool(m) => m.to_any(),
            IcaMessage::ExitPool(m) => m.to_any(),
            IcaMessage::JoinSwapExternAmountIn(m) => m.to_any(),
            IcaMessage::ExitSwapExternAmountOut(m) => m.to_any(),
            IcaMessage::JoinSwapShareAmountOut(m) => m.to_any(),
            IcaMessage::ExitSwapShareAmountIn(m) => m.to_any(),
            IcaMessage::LockTokens(m) => m.to_any(),
            IcaMessage::BeginUnlocking(m) => m.to_any(),
            IcaMessage::Unsupported(any) => Ok(any.clone()),
        }
    }

    /// Kind of the message, `None` for `Unsupported`.
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            IcaMessage::Transfer(_) => Some(MessageKind::Transfer),
            IcaMessage::CreateBalancerPool(_) => Some(MessageKind::CreateBalancerPool),
            IcaMessage::JoinPool(_) => Some(MessageKind::JoinPool),
            IcaMessage::ExitPool(_) => Some(MessageKind::ExitPool),
            IcaMessage::JoinSwapExternAmountIn(_) => Some(MessageKind::JoinSwapExternAmountIn),
            IcaMessage::ExitSwapExternAmountOut(_) => Some(MessageKind::ExitSwapExternAmountOut),
            IcaMessage::JoinSwapShareAmountOut(_) => Some(MessageKind::JoinSwapShareAmountOut),
            IcaMessage::ExitSwapShareAmountIn(_) => Some(MessageKind::ExitSwapShareAmountIn),
            IcaMessage::LockTokens(_) => Some(MessageKind::LockTokens),
            IcaMessage::BeginUnlocking(_) => Some(MessageKind::BeginUnlocking),
            IcaMessage::Unsupported(_) => None,
        }
    }

    /// Type URL carried on the wire.
    pub fn type_url(&self) -> &str {
        match self {
            IcaMessage::Transfer(_) => MsgTransfer::TYPE_URL,
            IcaMessage::CreateBalancerPool(_) => MsgCreateBalancerPool::TYPE_URL,
            IcaMessage::JoinPool(_) => MsgJoinPool::TYPE_URL,
            IcaMessage::ExitPool(_) => MsgExitPool::TYPE_URL,
            IcaMessage::JoinSwapExternAmountIn(_) => MsgJoinSwapExternAmountIn::TYPE_URL,
            IcaMessage::ExitSwapExternAmountOut(_) => MsgExitSwapExternAmountOut::TYPE_URL,
            IcaMessage::JoinSwapShareAmountOut(_) => MsgJoinSwapShareAmountOut::TYPE_URL,
            IcaMessage::ExitSwapShareAmountIn(_) => MsgExitSwapShareAmountIn::TYPE_URL,
            IcaMessage::LockTokens(_) => MsgLockTokens::TYPE_URL,
            IcaMessage::BeginUnlocking(_) => MsgBeginUnlocking::TYPE_URL,
            IcaMessage::Unsupported(any) => &any.type_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_any_recovers_kind() {
        let msg = MsgJoinPool {
            sender: "osmo1ica".into(),
            pool_id: 1,
            share_out_amount: 100,
            token_in_maxs: vec![Coin::new("uosmo", 10)],
        };
        let any = msg.to_any().unwrap();
        assert_eq!(any.type_url, "/osmosis.gamm.v1beta1.MsgJoinPool");

        let decoded = IcaMessage::from_any(&any).unwrap();
        assert_eq!(decoded.kind(), Some(MessageKind::JoinPool));
        assert_eq!(decoded, IcaMessage::JoinPool(msg));
    }

    #[test]
    fn test_unknown_type_url_is_unsupported() {
        let any = Any {
            type_url: "/cosmos.bank.v1beta1.MsgSend".into(),
            value: vec![1, 2, 3],
        };
        let decoded = IcaMessage::from_any(&any).unwrap();
        assert!(matches!(decoded, IcaMessage::Unsupported(_)));
        assert_eq!(decoded.kind(), None);
        assert_eq!(decoded.type_url(), "/cosmos.bank.v1beta1.MsgSend");
    }

    #[test]
    fn test_known_type_url_with_garbage_fails() {
        let any = Any {
            type_url: MsgLockTokens::TYPE_URL.into(),
            value: vec![0xff],
        };
        assert!(matches!(
            IcaMessage::from_any(&any),
            Err(IntergammError::Deserialization(_))
        ));
    }

    #[test]
    fn test_type_urls_are_distinct() {
        let mut urls = vec![
            MsgTransfer::TYPE_URL,
            MsgCreateBalancerPool::TYPE_URL,
            MsgJoinPool::TYPE_URL,
            MsgExitPool::TYPE_URL,
            MsgJoinSwapExternAmountIn::TYPE_URL,
            MsgExitSwapExternAmountOut::TYPE_URL,
            MsgJoinSwapShareAmountOut::TYPE_URL,
            MsgExitSwapShareAmountIn::TYPE_URL,
            MsgLockTokens::TYPE_URL,
            MsgBeginUnlocking::TYPE_URL,
        ];
        urls.sort();
        urls.dedup();
        assert_eq!(urls.len(), MessageKind::ALL.len());
    }

    #[test]
    fn test_set_signer_uses_owner_field_for_lockup() {
        let mut msg = MsgBeginUnlocking::default();
        msg.set_signer("osmo1ica");
        assert_eq!(msg.owner, "osmo1ica");
        assert_eq!(msg.signer(), "osmo1ica");
    }

    #[test]
    fn test_response_decode_failure() {
        let err = MsgExitPool::decode_response(&[0xde, 0xad]).unwrap_err();
        assert!(err.to_string().contains("exit-pool"));
    }
}
