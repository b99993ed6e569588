//! # Transfer Module Callbacks
//!
//! Packet callbacks of the local ICS-20 transfer port. Decodes the transfer
//! packet data and the acknowledgement, then hands them to the keeper so
//! send-token callers can correlate the outcome by sequence.

use super::ibc_module::{packet_hash, parse_acknowledgement};
use crate::domain::{BlockContext, FungibleTokenPacketData, IntergammError, Packet};
use crate::ports::IntergammApi;
use tracing::{debug, error};

/// Transfer packet callbacks bound to an [`IntergammApi`].
pub struct TransferModule<'a, A: IntergammApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: IntergammApi + ?Sized> TransferModule<'a, A> {
    /// Create callbacks over `api`.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Resolve an acknowledged transfer packet.
    pub fn on_acknowledgement_packet(
        &self,
        ctx: &BlockContext,
        packet: &Packet,
        acknowledgement: &[u8],
    ) -> Result<(), IntergammError> {
        let packet_data = parse_transfer_packet(packet)?;
        let outcome = parse_acknowledgement(acknowledgement)?;

        debug!(
            seq = packet.sequence,
            channel_id = %packet.source_channel,
            packet_hash = %packet_hash(packet),
            success = outcome.is_success(),
            "[intergamm] Transfer acknowledgement received"
        );

        self.api
            .handle_ibc_transfer_acknowledgement(ctx, packet.sequence, packet_data, outcome)
            .map_err(|e| {
                error!(seq = packet.sequence, "[intergamm] Transfer acknowledgement handling failed: {}", e);
                e
            })
    }

    /// Resolve a timed-out transfer packet.
    pub fn on_timeout_packet(
        &self,
        ctx: &BlockContext,
        packet: &Packet,
    ) -> Result<(), IntergammError> {
        let packet_data = parse_transfer_packet(packet)?;

        debug!(
            seq = packet.sequence,
            channel_id = %packet.source_channel,
            packet_hash = %packet_hash(packet),
            "[intergamm] Transfer packet timed out"
        );

        self.api
            .handle_ibc_transfer_timeout(ctx, packet.sequence, packet_data)
            .map_err(|e| {
                error!(seq = packet.sequence, "[intergamm] Transfer timeout handling failed: {}", e);
                e
            })
    }
}

/// Decode a packet's ICS-20 transfer data.
pub fn parse_transfer_packet(packet: &Packet) -> Result<FungibleTokenPacketData, IntergammError> {
    FungibleTokenPacketData::from_bytes(&packet.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transfer_packet() {
        let packet = Packet {
            sequence: 3,
            data: br#"{"denom":"uqsr","amount":"5","sender":"a","receiver":"b"}"#.to_vec(),
            ..Default::default()
        };
        let data = parse_transfer_packet(&packet).unwrap();
        assert_eq!(data.denom, "uqsr");
        assert_eq!(data.amount, "5");
        assert!(data.memo.is_empty());
    }

    #[test]
    fn test_parse_ica_envelope_as_transfer_fails() {
        let packet = Packet {
            data: crate::domain::IcaPacketData::execute_tx(vec![1]).to_bytes().unwrap(),
            ..Default::default()
        };
        assert!(matches!(
            parse_transfer_packet(&packet),
            Err(IntergammError::Deserialization(_))
        ));
    }
}
