//! # Hook Registry
//!
//! Per-kind ordered callbacks run when a sent packet is acknowledged or
//! times out. Registration happens while wiring the keeper; during packet
//! processing the registry is only read.

use crate::domain::{
    AckExchange, BlockContext, FungibleTokenPacketData, HookError, HookRequest, IntergammError,
    MsgBeginUnlocking, MsgCreateBalancerPool, MsgExitPool, MsgExitSwapExternAmountOut,
    MsgExitSwapShareAmountIn, MsgJoinPool, MsgJoinSwapExternAmountIn, MsgJoinSwapShareAmountOut,
    MsgLockTokens, MsgTransfer, Sequence, TimeoutExchange,
};
use std::fmt;
use tracing::{debug, warn};

/// Callback run on acknowledgement of a `K` request.
pub type AckHook<K> =
    Box<dyn Fn(&BlockContext, &AckExchange<K>) -> Result<(), HookError> + Send + Sync>;

/// Callback run on timeout of a `K` request.
pub type TimeoutHook<K> =
    Box<dyn Fn(&BlockContext, &TimeoutExchange<K>) -> Result<(), HookError> + Send + Sync>;

/// Ack and timeout hooks of one message kind, in registration order.
pub struct KindHooks<K: HookRequest> {
    ack: Vec<AckHook<K>>,
    timeout: Vec<TimeoutHook<K>>,
}

impl<K: HookRequest> Default for KindHooks<K> {
    fn default() -> Self {
        Self {
            ack: Vec::new(),
            timeout: Vec::new(),
        }
    }
}

/// Selects the slot of a kind inside the registry.
pub trait HookSlot: HookRequest {
    /// Shared access.
    fn slot(registry: &HookRegistry) -> &KindHooks<Self>;
    /// Exclusive access.
    fn slot_mut(registry: &mut HookRegistry) -> &mut KindHooks<Self>;
}

/// Hooks for every interchain account message kind and for local transfers.
#[derive(Default)]
pub struct HookRegistry {
    transfer: KindHooks<MsgTransfer>,
    create_balancer_pool: KindHooks<MsgCreateBalancerPool>,
    join_pool: KindHooks<MsgJoinPool>,
    exit_pool: KindHooks<MsgExitPool>,
    join_swap_extern_amount_in: KindHooks<MsgJoinSwapExternAmountIn>,
    exit_swap_extern_amount_out: KindHooks<MsgExitSwapExternAmountOut>,
    join_swap_share_amount_out: KindHooks<MsgJoinSwapShareAmountOut>,
    exit_swap_share_amount_in: KindHooks<MsgExitSwapShareAmountIn>,
    lock_tokens: KindHooks<MsgLockTokens>,
    begin_unlocking: KindHooks<MsgBeginUnlocking>,
    ibc_transfer: KindHooks<FungibleTokenPacketData>,
}

macro_rules! hook_slot {
    ($msg:ty, $field:ident) => {
        impl HookSlot for $msg {
            fn slot(registry: &HookRegistry) -> &KindHooks<Self> {
                &registry.$field
            }

            fn slot_mut(registry: &mut HookRegistry) -> &mut KindHooks<Self> {
                &mut registry.$field
            }
        }
    };
}

hook_slot!(MsgTransfer, transfer);
hook_slot!(MsgCreateBalancerPool, create_balancer_pool);
hook_slot!(MsgJoinPool, join_pool);
hook_slot!(MsgExitPool, exit_pool);
hook_slot!(MsgJoinSwapExternAmountIn, join_swap_extern_amount_in);
hook_slot!(MsgExitSwapExternAmountOut, exit_swap_extern_amount_out);
hook_slot!(MsgJoinSwapShareAmountOut, join_swap_share_amount_out);
hook_slot!(MsgExitSwapShareAmountIn, exit_swap_share_amount_in);
hook_slot!(MsgLockTokens, lock_tokens);
hook_slot!(MsgBeginUnlocking, begin_unlocking);
hook_slot!(FungibleTokenPacketData, ibc_transfer);

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one ack hook for `K`.
    pub fn add_ack_hook<K, F>(&mut self, hook: F)
    where
        K: HookSlot,
        F: Fn(&BlockContext, &AckExchange<K>) -> Result<(), HookError> + Send + Sync + 'static,
    {
        K::slot_mut(self).ack.push(Box::new(hook));
    }

    /// Append ack hooks for `K`, keeping their order.
    pub fn add_ack_hooks<K: HookSlot>(&mut self, hooks: impl IntoIterator<Item = AckHook<K>>) {
        K::slot_mut(self).ack.extend(hooks);
    }

    /// Append one timeout hook for `K`.
    pub fn add_timeout_hook<K, F>(&mut self, hook: F)
    where
        K: HookSlot,
        F: Fn(&BlockContext, &TimeoutExchange<K>) -> Result<(), HookError>
            + Send
            + Sync
            + 'static,
    {
        K::slot_mut(self).timeout.push(Box::new(hook));
    }

    /// Append timeout hooks for `K`, keeping their order.
    pub fn add_timeout_hooks<K: HookSlot>(
        &mut self,
        hooks: impl IntoIterator<Item = TimeoutHook<K>>,
    ) {
        K::slot_mut(self).timeout.extend(hooks);
    }

    /// Ack hooks of `K` in registration order.
    pub fn ack_hooks<K: HookSlot>(&self) -> &[AckHook<K>] {
        &K::slot(self).ack
    }

    /// Timeout hooks of `K` in registration order.
    pub fn timeout_hooks<K: HookSlot>(&self) -> &[TimeoutHook<K>] {
        &K::slot(self).timeout
    }

    /// Run the ack hooks of `K` in order. The first error stops the rest.
    pub(crate) fn run_ack_hooks<K: HookSlot>(
        &self,
        ctx: &BlockContext,
        exchange: &AckExchange<K>,
    ) -> Result<(), IntergammError> {
        let registered = self.ack_hooks::<K>();
        debug!(
            seq = exchange.sequence,
            kind = %K::KIND,
            hooks = registered.len(),
            has_error = exchange.has_error(),
            "[intergamm] Dispatching ack hooks"
        );
        for (index, hook) in registered.iter().enumerate() {
            hook(ctx, exchange).map_err(|source| {
                warn!(seq = exchange.sequence, kind = %K::KIND, index, "[intergamm] Ack hook failed: {}", source);
                IntergammError::HookFailed {
                    kind: K::KIND,
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Run the timeout hooks of `K` in order. The first error stops the rest.
    pub(crate) fn run_timeout_hooks<K: HookSlot>(
        &self,
        ctx: &BlockContext,
        exchange: &TimeoutExchange<K>,
    ) -> Result<(), IntergammError> {
        let registered = self.timeout_hooks::<K>();
        debug!(
            seq = exchange.sequence,
            kind = %K::KIND,
            hooks = registered.len(),
            "[intergamm] Dispatching timeout hooks"
        );
        for (index, hook) in registered.iter().enumerate() {
            hook(ctx, exchange).map_err(|source| {
                warn!(seq = exchange.sequence, kind = %K::KIND, index, "[intergamm] Timeout hook failed: {}", source);
                IntergammError::HookFailed {
                    kind: K::KIND,
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Drop every ack hook of every kind.
    #[cfg(any(test, feature = "test-support"))]
    pub fn clear_ack_hooks(&mut self) {
        self.transfer.ack.clear();
        self.create_balancer_pool.ack.clear();
        self.join_pool.ack.clear();
        self.exit_pool.ack.clear();
        self.join_swap_extern_amount_in.ack.clear();
        self.exit_swap_extern_amount_out.ack.clear();
        self.join_swap_share_amount_out.ack.clear();
        self.exit_swap_share_amount_in.ack.clear();
        self.lock_tokens.ack.clear();
        self.begin_unlocking.ack.clear();
        self.ibc_transfer.ack.clear();
    }

    /// Drop every timeout hook of every kind.
    #[cfg(any(test, feature = "test-support"))]
    pub fn clear_timeout_hooks(&mut self) {
        self.transfer.timeout.clear();
        self.create_balancer_pool.timeout.clear();
        self.join_pool.timeout.clear();
        self.exit_pool.timeout.clear();
        self.join_swap_extern_amount_in.timeout.clear();
        self.exit_swap_extern_amount_out.timeout.clear();
        self.join_swap_share_amount_out.timeout.clear();
        self.exit_swap_share_amount_in.timeout.clear();
        self.lock_tokens.timeout.clear();
        self.begin_unlocking.timeout.clear();
        self.ibc_transfer.timeout.clear();
    }
}

fn counts<K: HookRequest>(hooks: &KindHooks<K>) -> (usize, usize) {
    (hooks.ack.len(), hooks.timeout.len())
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slots: [(&str, (usize, usize)); 11] = [
            (MsgTransfer::KIND.name(), counts(&self.transfer)),
            (MsgCreateBalancerPool::KIND.name(), counts(&self.create_balancer_pool)),
            (MsgJoinPool::KIND.name(), counts(&self.join_pool)),
            (MsgExitPool::KIND.name(), counts(&self.exit_pool)),
            (MsgJoinSwapExternAmountIn::KIND.name(), counts(&self.join_swap_extern_amount_in)),
            (MsgExitSwapExternAmountOut::KIND.name(), counts(&self.exit_swap_extern_amount_out)),
            (MsgJoinSwapShareAmountOut::KIND.name(), counts(&self.join_swap_share_amount_out)),
            (MsgExitSwapShareAmountIn::KIND.name(), counts(&self.exit_swap_share_amount_in)),
            (MsgLockTokens::KIND.name(), counts(&self.lock_tokens)),
            (MsgBeginUnlocking::KIND.name(), counts(&self.begin_unlocking)),
            (FungibleTokenPacketData::KIND.name(), counts(&self.ibc_transfer)),
        ];

        // (ack, timeout) hook counts per kind
        let mut map = f.debug_map();
        for (name, count) in slots {
            map.entry(&name, &count);
        }
        map.finish()
    }
}
