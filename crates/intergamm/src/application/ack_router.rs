//! # Acknowledgement Router
//!
//! Correlates an acknowledged packet with its request, decodes the typed
//! response and runs the kind's ack hooks in registration order. The first
//! hook error stops dispatch.

use super::hooks::{HookRegistry, HookSlot};
use crate::domain::{
    AckExchange, AckOutcome, BlockContext, IcaMessage, IcaRequest, IntergammError, MessageKind,
    Sequence,
};
use crate::ports::Codec;

/// Decode a packet payload into its single message.
pub(crate) fn decode_packet_message(
    codec: &dyn Codec,
    payload: &[u8],
) -> Result<IcaMessage, IntergammError> {
    let messages = codec.deserialize(payload)?;
    match messages.as_slice() {
        [any] => IcaMessage::from_any(any),
        _ => Err(IntergammError::ProtocolViolation(format!(
            "expected single message in packet, got {}",
            messages.len()
        ))),
    }
}

/// Route an acknowledgement to the hooks of its request kind.
///
/// Returns the kind that was dispatched.
pub fn route_acknowledgement(
    hooks: &HookRegistry,
    codec: &dyn Codec,
    ctx: &BlockContext,
    sequence: Sequence,
    payload: &[u8],
    outcome: &AckOutcome,
) -> Result<MessageKind, IntergammError> {
    match decode_packet_message(codec, payload)? {
        IcaMessage::Transfer(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::CreateBalancerPool(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::JoinPool(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::ExitPool(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::JoinSwapExternAmountIn(req) => {
            dispatch(hooks, codec, ctx, sequence, req, outcome)
        }
        IcaMessage::ExitSwapExternAmountOut(req) => {
            dispatch(hooks, codec, ctx, sequence, req, outcome)
        }
        IcaMessage::JoinSwapShareAmountOut(req) => {
            dispatch(hooks, codec, ctx, sequence, req, outcome)
        }
        IcaMessage::ExitSwapShareAmountIn(req) => {
            dispatch(hooks, codec, ctx, sequence, req, outcome)
        }
        IcaMessage::LockTokens(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::BeginUnlocking(req) => dispatch(hooks, codec, ctx, sequence, req, outcome),
        IcaMessage::Unsupported(any) => Err(IntergammError::UnsupportedMessageKind(any.type_url)),
    }
}

/// Decode the typed response carried by a success acknowledgement.
pub fn parse_ack_response<K: IcaRequest>(
    codec: &dyn Codec,
    result: &[u8],
) -> Result<K::Response, IntergammError> {
    let tx = codec.decode_msg_data(result)?;
    let entry = match tx.data.as_slice() {
        [entry] => entry,
        _ => {
            return Err(IntergammError::ProtocolViolation(
                "only single msg acks are supported".to_string(),
            ))
        }
    };
    if entry.msg_type != K::ack_msg_type() {
        return Err(IntergammError::ProtocolViolation(
            "ack response does not match request".to_string(),
        ));
    }
    K::decode_response(&entry.data)
}

fn dispatch<K: HookSlot + IcaRequest>(
    hooks: &HookRegistry,
    codec: &dyn Codec,
    ctx: &BlockContext,
    sequence: Sequence,
    request: K,
    outcome: &AckOutcome,
) -> Result<MessageKind, IntergammError> {
    let exchange = match outcome {
        AckOutcome::Failure(err) => AckExchange {
            sequence,
            error: Some(err.clone()),
            request,
            response: K::Response::default(),
        },
        AckOutcome::Success(result) => AckExchange {
            sequence,
            error: None,
            response: parse_ack_response::<K>(codec, result)?,
            request,
        },
    };

    hooks.run_ack_hooks(ctx, &exchange)?;
    Ok(K::KIND)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::BincodeCodec;
    use crate::domain::{
        Any, MsgData, MsgExitPool, MsgExitPoolResponse, MsgJoinPool, MsgTransfer, TxMsgData,
    };
    use std::sync::{Arc, Mutex};

    fn payload(messages: &[IcaMessage]) -> Vec<u8> {
        let anys: Vec<Any> = messages.iter().map(|m| m.to_any().unwrap()).collect();
        BincodeCodec.serialize(&anys).unwrap()
    }

    fn success<K: IcaRequest>(response: &K::Response) -> AckOutcome {
        let tx = TxMsgData {
            data: vec![MsgData {
                msg_type: K::ack_msg_type().to_string(),
                data: K::encode_response(response).unwrap(),
            }],
        };
        AckOutcome::Success(BincodeCodec.encode_msg_data(&tx).unwrap())
    }

    #[test]
    fn test_success_ack_decodes_response() {
        let seen = Arc::new(Mutex::new(None));
        let mut hooks = HookRegistry::new();
        let s = seen.clone();
        hooks.add_ack_hook::<MsgExitPool, _>(move |_, ex| {
            *s.lock().unwrap() = Some(ex.clone());
            Ok(())
        });

        let request = MsgExitPool {
            sender: "osmo1ica".into(),
            pool_id: 3,
            ..Default::default()
        };
        let response = MsgExitPoolResponse {
            token_out: vec![crate::domain::Coin::new("uosmo", 7)],
        };
        let kind = route_acknowledgement(
            &hooks,
            &BincodeCodec,
            &BlockContext::default(),
            4,
            &payload(&[IcaMessage::ExitPool(request.clone())]),
            &success::<MsgExitPool>(&response),
        )
        .unwrap();

        assert_eq!(kind, MessageKind::ExitPool);
        let ex = seen.lock().unwrap().clone().unwrap();
        assert_eq!(ex.sequence, 4);
        assert_eq!(ex.error, None);
        assert_eq!(ex.request, request);
        assert_eq!(ex.response, response);
    }

    #[test]
    fn test_error_ack_skips_decode() {
        let seen = Arc::new(Mutex::new(None));
        let mut hooks = HookRegistry::new();
        let s = seen.clone();
        hooks.add_ack_hook::<MsgJoinPool, _>(move |_, ex| {
            *s.lock().unwrap() = Some(ex.clone());
            Ok(())
        });

        route_acknowledgement(
            &hooks,
            &BincodeCodec,
            &BlockContext::default(),
            9,
            &payload(&[IcaMessage::JoinPool(MsgJoinPool::default())]),
            &AckOutcome::Failure("insufficient funds".into()),
        )
        .unwrap();

        let ex = seen.lock().unwrap().clone().unwrap();
        assert_eq!(ex.error.as_deref(), Some("insufficient funds"));
        assert_eq!(ex.response, Default::default());
    }

    #[test]
    fn test_tag_mismatch() {
        let hooks = HookRegistry::new();
        let outcome = success::<MsgTransfer>(&Default::default());
        let result = route_acknowledgement(
            &hooks,
            &BincodeCodec,
            &BlockContext::default(),
            1,
            &payload(&[IcaMessage::JoinPool(MsgJoinPool::default())]),
            &outcome,
        );
        assert!(matches!(
            result,
            Err(IntergammError::ProtocolViolation(msg)) if msg == "ack response does not match request"
        ));
    }

    #[test]
    fn test_multi_entry_ack() {
        let tx = TxMsgData {
            data: vec![MsgData::default(), MsgData::default()],
        };
        let result = parse_ack_response::<MsgJoinPool>(
            &BincodeCodec,
            &BincodeCodec.encode_msg_data(&tx).unwrap(),
        );
        assert!(matches!(
            result,
            Err(IntergammError::ProtocolViolation(msg)) if msg == "only single msg acks are supported"
        ));
    }

    #[test]
    fn test_unsupported_kind() {
        let unknown = IcaMessage::Unsupported(Any {
            type_url: "/cosmos.bank.v1beta1.MsgSend".into(),
            value: vec![],
        });
        let result = route_acknowledgement(
            &HookRegistry::new(),
            &BincodeCodec,
            &BlockContext::default(),
            1,
            &payload(&[unknown]),
            &AckOutcome::Failure("x".into()),
        );
        assert!(matches!(
            result,
            Err(IntergammError::UnsupportedMessageKind(url)) if url == "/cosmos.bank.v1beta1.MsgSend"
        ));
    }

    #[test]
    fn test_hook_failure_stops_dispatch() {
        let calls = Arc::new(Mutex::new(0));
        let mut hooks = HookRegistry::new();
        hooks.add_ack_hook::<MsgJoinPool, _>(|_, _| Err(anyhow::anyhow!("vault paused")));
        let c = calls.clone();
        hooks.add_ack_hook::<MsgJoinPool, _>(move |_, _| {
            *c.lock().unwrap() += 1;
            Ok(())
        });

        let result = route_acknowledgement(
            &hooks,
            &BincodeCodec,
            &BlockContext::default(),
            1,
            &payload(&[IcaMessage::JoinPool(MsgJoinPool::default())]),
            &AckOutcome::Failure("x".into()),
        );
        assert!(matches!(
            result,
            Err(IntergammError::HookFailed { kind: MessageKind::JoinPool, .. })
        ));
        assert_eq!(*calls.lock().unwrap(), 0);
    }
}
