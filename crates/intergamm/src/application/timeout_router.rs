//! # Timeout Router
//!
//! Correlates a timed-out packet with its request and runs the kind's
//! timeout hooks. Ack hooks are never touched here.

use super::ack_router::decode_packet_message;
use super::hooks::{HookRegistry, HookSlot};
use crate::domain::{BlockContext, IcaMessage, IntergammError, MessageKind, Sequence, TimeoutExchange};
use crate::ports::Codec;

/// Route a timeout to the hooks of its request kind.
///
/// Returns the kind that was dispatched.
pub fn route_timeout(
    hooks: &HookRegistry,
    codec: &dyn Codec,
    ctx: &BlockContext,
    sequence: Sequence,
    payload: &[u8],
) -> Result<MessageKind, IntergammError> {
    match decode_packet_message(codec, payload)? {
        IcaMessage::Transfer(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::CreateBalancerPool(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::JoinPool(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::ExitPool(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::JoinSwapExternAmountIn(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::ExitSwapExternAmountOut(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::JoinSwapShareAmountOut(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::ExitSwapShareAmountIn(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::LockTokens(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::BeginUnlocking(req) => dispatch(hooks, ctx, sequence, req),
        IcaMessage::Unsupported(any) => Err(IntergammError::UnsupportedMessageKind(any.type_url)),
    }
}

fn dispatch<K: HookSlot>(
    hooks: &HookRegistry,
    ctx: &BlockContext,
    sequence: Sequence,
    request: K,
) -> Result<MessageKind, IntergammError> {
    hooks.run_timeout_hooks(ctx, &TimeoutExchange { sequence, request })?;
    Ok(K::KIND)
}
