//! # Domain Value Objects
//!
//! Immutable value types shared by the routers, the routing table and the planner.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Packet sequence, unique per (port, channel).
pub type Sequence = u64;

/// Zone identifier (e.g. `"osmosis"`).
pub type ZoneId = String;

/// Closed set of outbound message kinds this module can send, ack or time out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageKind {
    /// ICS-20 transfer relayed by an interchain account.
    Transfer,
    /// Balancer pool creation.
    CreateBalancerPool,
    /// Multi-asset pool join.
    JoinPool,
    /// Multi-asset pool exit.
    ExitPool,
    /// Single-asset join with a fixed amount in.
    JoinSwapExternAmountIn,
    /// Single-asset exit with a fixed amount out.
    ExitSwapExternAmountOut,
    /// Single-asset join with fixed shares out.
    JoinSwapShareAmountOut,
    /// Single-asset exit with fixed shares in.
    ExitSwapShareAmountIn,
    /// Lockup of LP shares.
    LockTokens,
    /// Start of an unbonding period for a lock.
    BeginUnlocking,
    /// ICS-20 transfer sent by the local transfer module.
    IbcTransfer,
}

impl MessageKind {
    /// Kinds sent through interchain accounts, in declaration order.
    pub const ALL: [MessageKind; 10] = [
        MessageKind::Transfer,
        MessageKind::CreateBalancerPool,
        MessageKind::JoinPool,
        MessageKind::ExitPool,
        MessageKind::JoinSwapExternAmountIn,
        MessageKind::ExitSwapExternAmountOut,
        MessageKind::JoinSwapShareAmountOut,
        MessageKind::ExitSwapShareAmountIn,
        MessageKind::LockTokens,
        MessageKind::BeginUnlocking,
    ];

    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            MessageKind::Transfer => "transfer",
            MessageKind::CreateBalancerPool => "create-pool",
            MessageKind::JoinPool => "join-pool",
            MessageKind::ExitPool => "exit-pool",
            MessageKind::JoinSwapExternAmountIn => "join-swap-extern-amount-in",
            MessageKind::ExitSwapExternAmountOut => "exit-swap-extern-amount-out",
            MessageKind::JoinSwapShareAmountOut => "join-swap-share-amount-out",
            MessageKind::ExitSwapShareAmountIn => "exit-swap-share-amount-in",
            MessageKind::LockTokens => "lock-tokens",
            MessageKind::BeginUnlocking => "begin-unlocking",
            MessageKind::IbcTransfer => "ibc-transfer",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token amount with denomination.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination.
    pub denom: String,
    /// Amount in base units.
    pub amount: u128,
}

impl Coin {
    /// Create a new coin.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// IBC client height. `(0, 0)` disables height-based timeout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Height {
    /// Revision number.
    pub revision_number: u64,
    /// Revision height.
    pub revision_height: u64,
}

impl Height {
    /// Zero height (no height timeout).
    pub const fn zero() -> Self {
        Self {
            revision_number: 0,
            revision_height: 0,
        }
    }
}

/// Block execution context handed to every keeper call and hook.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockContext {
    /// Block height.
    pub height: u64,
    /// Block time in unix nanoseconds.
    pub time_nanos: u64,
}

impl BlockContext {
    /// Create a new context.
    pub fn new(height: u64, time_nanos: u64) -> Self {
        Self { height, time_nanos }
    }
}

/// Timeout for an outbound ICA transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxTimeout {
    /// Nanoseconds added to the current block time.
    Relative(u64),
    /// Absolute unix nanoseconds. Zero selects the configured relative default.
    Absolute(u64),
}

impl TxTimeout {
    /// Resolve to an absolute timestamp.
    pub fn resolve(&self, now_nanos: u64, default_relative_nanos: u64) -> u64 {
        match *self {
            TxTimeout::Relative(delta) => now_nanos.saturating_add(delta),
            TxTimeout::Absolute(0) => now_nanos.saturating_add(default_relative_nanos),
            TxTimeout::Absolute(at) => at,
        }
    }
}

/// IBC path from one zone toward its counterparty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// Zone the route starts at.
    pub zone_id: ZoneId,
    /// Chain id of `zone_id`.
    pub chain_id: String,
    /// Zone the route leads to.
    pub counterparty_zone_id: ZoneId,
    /// Chain id of the counterparty zone.
    pub counterparty_chain_id: String,
    /// Connection on `zone_id`.
    pub connection_id: String,
    /// Transfer port on `zone_id`.
    pub port_id: String,
    /// Transfer channel on `zone_id`.
    pub channel_id: String,
    /// Connection on the counterparty zone.
    pub counterparty_connection_id: String,
    /// Transfer port on the counterparty zone.
    pub counterparty_port_id: String,
    /// Transfer channel on the counterparty zone.
    pub counterparty_channel_id: String,
}

/// Graph node describing how to reach a zone and where it can forward to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneInfo {
    /// Route from the local zone to this zone.
    pub zone_route_info: RouteInfo,
    /// Routes from this zone to its neighbours, keyed by neighbour zone id.
    pub next_zone_route_map: BTreeMap<ZoneId, RouteInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_names_unique() {
        let mut names: Vec<_> = MessageKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), MessageKind::ALL.len());
    }

    #[test]
    fn test_timeout_relative() {
        assert_eq!(TxTimeout::Relative(50).resolve(1_000, 600), 1_050);
    }

    #[test]
    fn test_timeout_absolute() {
        assert_eq!(TxTimeout::Absolute(5_000).resolve(1_000, 600), 5_000);
    }

    #[test]
    fn test_timeout_absolute_zero_uses_default() {
        assert_eq!(TxTimeout::Absolute(0).resolve(1_000, 600), 1_600);
    }

    #[test]
    fn test_coin_display() {
        assert_eq!(Coin::new("uosmo", 150).to_string(), "150uosmo");
    }
}
