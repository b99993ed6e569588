//! Handler Layer
//!
//! Inbound entry points: the transaction message server, the ICA packet
//! callbacks and the transfer packet callbacks. All of them drive the keeper
//! through [`crate::ports::IntergammApi`].

pub mod ibc_module;
pub mod msg_server;
pub mod transfer_module;

pub use ibc_module::{
    encode_acknowledgement, packet_hash, parse_acknowledgement, parse_ica_packet, IbcModule,
    RECV_NOT_SUPPORTED,
};
pub use msg_server::{IntergammMsg, IntergammMsgResponse, MsgServer};
pub use transfer_module::{parse_transfer_packet, TransferModule};
