//! # Application Layer
//!
//! Keeper service, packet sender, ack/timeout routers and the hook registry.

pub mod ack_router;
pub mod hooks;
pub mod keeper;
pub mod packet_sender;
pub mod timeout_router;
pub mod transfer_router;

pub use ack_router::{parse_ack_response, route_acknowledgement};
pub use hooks::{AckHook, HookRegistry, HookSlot, KindHooks, TimeoutHook};
pub use keeper::Keeper;
pub use packet_sender::{PacketSender, SendReceipt};
pub use timeout_router::route_timeout;
pub use transfer_router::{route_transfer_ack, route_transfer_timeout};
