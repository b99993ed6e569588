//! # Intergamm
//!
//! Interchain account (ICA) packet correlation, ack/timeout hook dispatch and
//! multi-hop transfer routing.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Drive actions on remote zones through interchain accounts:
//! - Send exactly one message per ICA packet and return its sequence
//! - Correlate each acknowledgement or timeout with the original request
//! - Decode the typed response and fan out to registered hooks
//! - Plan direct or packet-forwarded token transfers across the zone graph
//!
//! ## Packet Lifecycle
//!
//! | Step | Component |
//! |------|-----------|
//! | Send | `PacketSender` assigns the sequence via the channel layer |
//! | Ack | `IbcModule` → `Keeper` → `route_acknowledgement` → ack hooks |
//! | Timeout | `IbcModule` → `Keeper` → `route_timeout` → timeout hooks |
//! | Transfer ack/timeout | `TransferModule` → `Keeper` → `route_transfer_ack` / `route_transfer_timeout` |
//!
//! ## Module Structure
//!
//! ```text
//! intergamm/
//! ├── domain/          # Messages, envelopes, exchanges, zone values, errors
//! ├── algorithms/      # Forwarding receiver, routing table, transfer planner
//! ├── application/     # Keeper, packet sender, routers, hook registry
//! ├── handler/         # Message server, ICA and transfer packet callbacks
//! ├── ports/           # IntergammApi, ChannelLayer, AccountRegistry, Codec, TokenTransfer
//! └── adapters/        # Bincode codec, in-memory collaborators
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod handler;
pub mod ports;
pub mod telemetry;

// Re-exports
pub use adapters::{BincodeCodec, InMemoryAccountRegistry, InMemoryChannelLayer, InMemoryTokenTransfer};
pub use algorithms::{
    build_forward_receiver, plan_ica_transfer, plan_local_transfer, IcaTransferPlan,
    IcaTransferRequest, LocalTransferPlan, LocalTransferRequest, TransferRoute, ZoneRoutingTable,
};
pub use application::{
    route_acknowledgement, route_timeout, route_transfer_ack, route_transfer_timeout, AckHook,
    HookRegistry, HookSlot, Keeper, PacketSender, SendReceipt, TimeoutHook,
};
pub use config::{IntergammConfig, Params};
pub use domain::{
    AckExchange, AckOutcome, Any, BlockContext, ChannelError, Coin, FungibleTokenPacketData,
    Height, HookError, HookRequest, IcaMessage, IcaPacketData, IcaPacketType, IcaRequest,
    IntergammError, MessageKind, MsgEmptyIbcResponse, Packet, RouteInfo, Sequence,
    TimeoutExchange, TxTimeout, ZoneInfo,
};
pub use handler::{IbcModule, IntergammMsg, IntergammMsgResponse, MsgServer, TransferModule};
pub use ports::{AccountRegistry, ChannelLayer, Codec, IntergammApi, TokenTransfer};
pub use telemetry::{init_tracing, TelemetryConfig, TelemetryError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
    }
}
