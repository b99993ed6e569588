//! # Packet Sender
//!
//! Serializes exactly one message into an ICA packet and submits it on the
//! owner's controller channel. Fire-and-forget: the outcome arrives later as
//! an acknowledgement or a timeout keyed by the returned sequence.

use crate::domain::{
    controller_port_id, BlockContext, ChannelError, IcaMessage, IcaPacketData, IntergammError,
    Sequence,
};
use crate::ports::{ChannelLayer, Codec};
use tracing::{debug, info};

/// Where a packet went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendReceipt {
    /// Sequence assigned by the channel layer.
    pub sequence: Sequence,
    /// Controller channel.
    pub channel_id: String,
    /// Controller port.
    pub port_id: String,
}

/// Sends ICA packets through borrowed collaborators.
pub struct PacketSender<'a> {
    channels: &'a dyn ChannelLayer,
    codec: &'a dyn Codec,
}

impl<'a> PacketSender<'a> {
    /// Create a sender.
    pub fn new(channels: &'a dyn ChannelLayer, codec: &'a dyn Codec) -> Self {
        Self { channels, codec }
    }

    /// Send over `owner`'s active controller channel on `connection_id`.
    pub fn send(
        &self,
        ctx: &BlockContext,
        owner: &str,
        connection_id: &str,
        messages: &[IcaMessage],
        timeout_timestamp: u64,
    ) -> Result<SendReceipt, IntergammError> {
        single_message(messages)?;

        let port_id = controller_port_id(owner)?;
        let channel_id = self
            .channels
            .active_channel_id(connection_id, &port_id)
            .ok_or_else(|| IntergammError::ica_not_found(owner, connection_id))?;

        self.submit(ctx, port_id, channel_id, messages, timeout_timestamp)
    }

    /// Send over an explicit (connection, port, channel).
    ///
    /// The channel must run over `connection_id`.
    pub fn send_over_channel(
        &self,
        ctx: &BlockContext,
        connection_id: &str,
        port_id: &str,
        channel_id: &str,
        messages: &[IcaMessage],
        timeout_timestamp: u64,
    ) -> Result<SendReceipt, IntergammError> {
        single_message(messages)?;

        let channel_connection = self
            .channels
            .channel_connection(port_id, channel_id)
            .ok_or_else(|| ChannelError::ChannelClosed {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            })?;
        if channel_connection != connection_id {
            return Err(IntergammError::ProtocolViolation(format!(
                "channel {}/{} runs over {}, not {}",
                port_id, channel_id, channel_connection, connection_id
            )));
        }

        self.submit(
            ctx,
            port_id.to_string(),
            channel_id.to_string(),
            messages,
            timeout_timestamp,
        )
    }

    fn submit(
        &self,
        ctx: &BlockContext,
        port_id: String,
        channel_id: String,
        messages: &[IcaMessage],
        timeout_timestamp: u64,
    ) -> Result<SendReceipt, IntergammError> {
        let anys = messages
            .iter()
            .map(IcaMessage::to_any)
            .collect::<Result<Vec<_>, _>>()?;
        let data = self.codec.serialize(&anys)?;
        let envelope = IcaPacketData::execute_tx(data).to_bytes()?;

        debug!(
            port_id = %port_id,
            channel_id = %channel_id,
            type_url = %anys[0].type_url,
            timeout_timestamp,
            "[intergamm] Submitting ICA packet"
        );

        let sequence =
            self.channels
                .send_packet(ctx, &port_id, &channel_id, envelope, timeout_timestamp)?;

        info!(
            seq = sequence,
            port_id = %port_id,
            channel_id = %channel_id,
            "[intergamm] ICA packet sent"
        );

        Ok(SendReceipt {
            sequence,
            channel_id,
            port_id,
        })
    }
}

fn single_message(messages: &[IcaMessage]) -> Result<&IcaMessage, IntergammError> {
    match messages {
        [message] => Ok(message),
        _ => Err(IntergammError::ProtocolViolation(format!(
            "expected single message in packet, got {}",
            messages.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{BincodeCodec, InMemoryChannelLayer};
    use crate::domain::{IcaPacketType, MsgLockTokens};

    fn lock() -> IcaMessage {
        IcaMessage::LockTokens(MsgLockTokens {
            owner: "osmo1ica".into(),
            ..Default::default()
        })
    }

    #[test]
    fn test_send_assigns_sequence() {
        let channels = InMemoryChannelLayer::new();
        channels.open_channel("connection-0", "icacontroller-alice", "channel-5");
        let codec = BincodeCodec;
        let sender = PacketSender::new(&channels, &codec);

        let receipt = sender
            .send(&BlockContext::new(1, 1), "alice", "connection-0", &[lock()], 99)
            .unwrap();
        assert_eq!(receipt.sequence, 1);
        assert_eq!(receipt.port_id, "icacontroller-alice");
        assert_eq!(receipt.channel_id, "channel-5");

        let sent = channels.sent_packets();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].timeout_timestamp, 99);
        let envelope = IcaPacketData::from_bytes(&sent[0].data).unwrap();
        assert_eq!(envelope.packet_type, IcaPacketType::ExecuteTx);
        let anys = codec.deserialize(&envelope.data).unwrap();
        assert_eq!(IcaMessage::from_any(&anys[0]).unwrap(), lock());
    }

    #[test]
    fn test_send_without_channel() {
        let channels = InMemoryChannelLayer::new();
        let codec = BincodeCodec;
        let sender = PacketSender::new(&channels, &codec);

        let result = sender.send(&BlockContext::default(), "alice", "connection-0", &[lock()], 1);
        assert!(matches!(
            result,
            Err(IntergammError::InterchainAccountNotFound { .. })
        ));
    }

    #[test]
    fn test_send_rejects_message_count() {
        let channels = InMemoryChannelLayer::new();
        channels.open_channel("connection-0", "icacontroller-alice", "channel-5");
        let codec = BincodeCodec;
        let sender = PacketSender::new(&channels, &codec);
        let ctx = BlockContext::default();

        for messages in [vec![], vec![lock(), lock()]] {
            let result = sender.send(&ctx, "alice", "connection-0", &messages, 1);
            assert!(matches!(result, Err(IntergammError::ProtocolViolation(_))));
        }
        assert!(channels.sent_packets().is_empty());
    }

    #[test]
    fn test_send_over_channel_checks_connection() {
        let channels = InMemoryChannelLayer::new();
        channels.open_channel("connection-0", "icacontroller-alice", "channel-5");
        let codec = BincodeCodec;
        let sender = PacketSender::new(&channels, &codec);
        let ctx = BlockContext::default();

        let ok = sender
            .send_over_channel(&ctx, "connection-0", "icacontroller-alice", "channel-5", &[lock()], 1)
            .unwrap();
        assert_eq!(ok.sequence, 1);

        let wrong = sender.send_over_channel(
            &ctx,
            "connection-1",
            "icacontroller-alice",
            "channel-5",
            &[lock()],
            1,
        );
        assert!(matches!(wrong, Err(IntergammError::ProtocolViolation(_))));

        let missing =
            sender.send_over_channel(&ctx, "connection-0", "icacontroller-alice", "channel-9", &[lock()], 1);
        assert!(matches!(
            missing,
            Err(IntergammError::Channel(ChannelError::ChannelClosed { .. }))
        ));
    }

    #[test]
    fn test_channel_rejection_propagates() {
        let channels = InMemoryChannelLayer::new();
        channels.open_channel("connection-0", "icacontroller-alice", "channel-5");
        channels.reject_sends("capability not found");
        let codec = BincodeCodec;
        let sender = PacketSender::new(&channels, &codec);

        let result = sender.send(&BlockContext::default(), "alice", "connection-0", &[lock()], 1);
        assert!(matches!(
            result,
            Err(IntergammError::Channel(ChannelError::Rejected(msg))) if msg == "capability not found"
        ));
    }
}
