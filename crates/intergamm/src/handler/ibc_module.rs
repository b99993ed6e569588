//! # IBC Module Callbacks
//!
//! Controller-side packet callbacks. Unwraps the ICA envelope and the
//! acknowledgement JSON, then hands the payload to the keeper.

use crate::domain::{AckOutcome, BlockContext, IcaPacketData, IcaPacketType, IntergammError, Packet};
use crate::ports::IntergammApi;
use sha2::{Digest, Sha256};
use tracing::{debug, error};

/// Error returned to counterparties that try to send packets to the controller.
pub const RECV_NOT_SUPPORTED: &str =
    "cannot receive packet via interchain accounts authentication module";

/// Packet callbacks bound to an [`IntergammApi`].
pub struct IbcModule<'a, A: IntergammApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: IntergammApi + ?Sized> IbcModule<'a, A> {
    /// Create callbacks over `api`.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Controller chains never receive ICA packets; always an error ack.
    pub fn on_recv_packet(&self, packet: &Packet) -> AckOutcome {
        debug!(
            seq = packet.sequence,
            port_id = %packet.destination_port,
            "[intergamm] Rejecting inbound packet"
        );
        AckOutcome::Failure(RECV_NOT_SUPPORTED.to_string())
    }

    /// Resolve an acknowledged packet.
    pub fn on_acknowledgement_packet(
        &self,
        ctx: &BlockContext,
        packet: &Packet,
        acknowledgement: &[u8],
    ) -> Result<(), IntergammError> {
        let envelope = parse_ica_packet(packet)?;
        let outcome = parse_acknowledgement(acknowledgement)?;

        debug!(
            seq = packet.sequence,
            channel_id = %packet.source_channel,
            packet_hash = %packet_hash(packet),
            success = outcome.is_success(),
            "[intergamm] Acknowledgement received"
        );

        self.api
            .handle_ica_acknowledgement(ctx, packet.sequence, &envelope.data, outcome)
            .map_err(|e| {
                error!(seq = packet.sequence, "[intergamm] Acknowledgement handling failed: {}", e);
                e
            })
    }

    /// Resolve a timed-out packet.
    pub fn on_timeout_packet(
        &self,
        ctx: &BlockContext,
        packet: &Packet,
    ) -> Result<(), IntergammError> {
        let envelope = parse_ica_packet(packet)?;

        debug!(
            seq = packet.sequence,
            channel_id = %packet.source_channel,
            packet_hash = %packet_hash(packet),
            "[intergamm] Packet timed out"
        );

        self.api
            .handle_ica_timeout(ctx, packet.sequence, &envelope.data)
            .map_err(|e| {
                error!(seq = packet.sequence, "[intergamm] Timeout handling failed: {}", e);
                e
            })
    }
}

/// Decode a packet's ICA envelope; only `EXECUTE_TX` is accepted.
pub fn parse_ica_packet(packet: &Packet) -> Result<IcaPacketData, IntergammError> {
    let envelope = IcaPacketData::from_bytes(&packet.data)?;
    if envelope.packet_type != IcaPacketType::ExecuteTx {
        return Err(IntergammError::UnsupportedPacketType(format!(
            "only EXECUTE_TX ICA callbacks are supported, got {:?}",
            envelope.packet_type
        )));
    }
    Ok(envelope)
}

/// Decode acknowledgement bytes.
pub fn parse_acknowledgement(bytes: &[u8]) -> Result<AckOutcome, IntergammError> {
    serde_json::from_slice(bytes).map_err(|e| {
        IntergammError::Deserialization(format!("cannot unmarshal IBC acknowledgement: {}", e))
    })
}

/// Encode an acknowledgement as the channel layer carries it.
pub fn encode_acknowledgement(outcome: &AckOutcome) -> Result<Vec<u8>, IntergammError> {
    serde_json::to_vec(outcome).map_err(|e| IntergammError::Serialization(e.to_string()))
}

/// Hex SHA-256 of the packet data, for log correlation.
pub fn packet_hash(packet: &Packet) -> String {
    hex::encode(Sha256::digest(&packet.data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_ack() {
        let outcome = parse_acknowledgement(br#"{"error":"out of gas"}"#).unwrap();
        assert_eq!(outcome, AckOutcome::Failure("out of gas".into()));
    }

    #[test]
    fn test_parse_garbage_ack() {
        assert!(matches!(
            parse_acknowledgement(b"{}"),
            Err(IntergammError::Deserialization(_))
        ));
    }

    #[test]
    fn test_ack_encoding_matches_parse() {
        let outcome = AckOutcome::Success(vec![4, 5]);
        let bytes = encode_acknowledgement(&outcome).unwrap();
        assert_eq!(parse_acknowledgement(&bytes).unwrap(), outcome);
    }

    #[test]
    fn test_rejects_unspecified_envelope() {
        let packet = Packet {
            data: br#"{"type":"TYPE_UNSPECIFIED","data":[]}"#.to_vec(),
            ..Default::default()
        };
        assert!(matches!(
            parse_ica_packet(&packet),
            Err(IntergammError::UnsupportedPacketType(_))
        ));
    }

    #[test]
    fn test_packet_hash_is_stable() {
        let packet = Packet {
            data: b"abc".to_vec(),
            ..Default::default()
        };
        assert_eq!(
            packet_hash(&packet),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
