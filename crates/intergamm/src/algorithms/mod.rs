//! # Algorithms Module
//!
//! Pure routing logic: forwarding receivers, zone lookups, transfer planning.

pub mod forwarding;
pub mod routing;
pub mod transfer_planner;

pub use forwarding::build_forward_receiver;
pub use routing::ZoneRoutingTable;
pub use transfer_planner::{
    plan_ica_transfer, plan_local_transfer, IcaTransferPlan, IcaTransferRequest,
    LocalTransferPlan, LocalTransferRequest, TransferRoute,
};
