//! # Inbound Ports
//!
//! API trait defining what the intergamm module can do. Implemented by
//! [`crate::application::Keeper`] and driven by the message server and the
//! IBC module callbacks.

use crate::algorithms::{IcaTransferRequest, LocalTransferRequest};
use crate::application::SendReceipt;
use crate::domain::{
    AckOutcome, BlockContext, FungibleTokenPacketData, IcaMessage, IntergammError, Sequence,
    TxTimeout,
};

/// Intergamm API - inbound port.
pub trait IntergammApi: Send + Sync {
    /// Register an interchain account for `owner` on a connection.
    fn register_interchain_account(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<(), IntergammError>;

    /// Register an interchain account for `owner` on a zone.
    fn register_ica_on_zone(&self, owner: &str, zone_id: &str) -> Result<(), IntergammError>;

    /// Register an interchain account for `owner` on the native zone of `denom`.
    fn register_ica_on_denom_native_zone(
        &self,
        owner: &str,
        denom: &str,
    ) -> Result<(), IntergammError>;

    /// Send tokens from a local account, forwarding through the native zone when needed.
    fn send_token(
        &self,
        ctx: &BlockContext,
        request: &LocalTransferRequest,
    ) -> Result<Sequence, IntergammError>;

    /// Transfer tokens out of an interchain account.
    fn transmit_ica_transfer(
        &self,
        ctx: &BlockContext,
        request: &IcaTransferRequest,
        timeout: TxTimeout,
    ) -> Result<SendReceipt, IntergammError>;

    /// Send one message through `owner`'s interchain account on a connection.
    ///
    /// The message signer is replaced with the interchain account address.
    fn transmit_message(
        &self,
        ctx: &BlockContext,
        owner: &str,
        connection_id: &str,
        timeout: TxTimeout,
        message: IcaMessage,
    ) -> Result<SendReceipt, IntergammError>;

    /// Resolve an acknowledged ICA packet.
    fn handle_ica_acknowledgement(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        payload: &[u8],
        outcome: AckOutcome,
    ) -> Result<(), IntergammError>;

    /// Resolve a timed-out ICA packet.
    fn handle_ica_timeout(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        payload: &[u8],
    ) -> Result<(), IntergammError>;

    /// Resolve an acknowledged local ICS-20 transfer.
    fn handle_ibc_transfer_acknowledgement(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        packet_data: FungibleTokenPacketData,
        outcome: AckOutcome,
    ) -> Result<(), IntergammError>;

    /// Resolve a timed-out local ICS-20 transfer.
    fn handle_ibc_transfer_timeout(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        packet_data: FungibleTokenPacketData,
    ) -> Result<(), IntergammError>;
}
