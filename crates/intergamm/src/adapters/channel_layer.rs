//! In-Memory Channel Layer Adapter
//!
//! Implements `ChannelLayer` with per-channel sequence counters and a log of
//! submitted packets.

use crate::domain::{BlockContext, ChannelError, Packet, Sequence, CONTROLLER_PORT_PREFIX};
use crate::ports::outbound::ChannelLayer;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// In-memory channel layer for tests and local wiring.
#[derive(Default)]
pub struct InMemoryChannelLayer {
    /// Active controller channels: (connection, port) -> channel.
    active: RwLock<HashMap<(String, String), String>>,
    /// Channel connections: (port, channel) -> connection.
    connections: RwLock<HashMap<(String, String), String>>,
    /// Next send sequence per (port, channel).
    next_sequence: RwLock<HashMap<(String, String), Sequence>>,
    /// Packets submitted so far.
    sent: RwLock<Vec<Packet>>,
    /// When set, every send is rejected with this reason.
    rejection: RwLock<Option<String>>,
}

impl InMemoryChannelLayer {
    /// Create an empty channel layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a channel on `port_id` over `connection_id` and make it active.
    pub fn open_channel(&self, connection_id: &str, port_id: &str, channel_id: &str) {
        self.active.write().insert(
            (connection_id.to_string(), port_id.to_string()),
            channel_id.to_string(),
        );
        self.add_channel(connection_id, port_id, channel_id);
    }

    /// Add a channel without marking it active for a controller port.
    pub fn add_channel(&self, connection_id: &str, port_id: &str, channel_id: &str) {
        let key = (port_id.to_string(), channel_id.to_string());
        self.connections
            .write()
            .insert(key.clone(), connection_id.to_string());
        self.next_sequence.write().entry(key).or_insert(1);
    }

    /// Override the next send sequence of a channel.
    pub fn set_next_sequence(&self, port_id: &str, channel_id: &str, sequence: Sequence) {
        self.next_sequence
            .write()
            .insert((port_id.to_string(), channel_id.to_string()), sequence);
    }

    /// Reject every subsequent send with `reason`.
    pub fn reject_sends(&self, reason: &str) {
        *self.rejection.write() = Some(reason.to_string());
    }

    /// Packets submitted so far, in send order.
    pub fn sent_packets(&self) -> Vec<Packet> {
        self.sent.read().clone()
    }

    /// Submitted packet with the given sequence on (port, channel).
    pub fn sent_packet(&self, port_id: &str, channel_id: &str, sequence: Sequence) -> Option<Packet> {
        self.sent
            .read()
            .iter()
            .find(|p| {
                p.sequence == sequence && p.source_port == port_id && p.source_channel == channel_id
            })
            .cloned()
    }
}

impl ChannelLayer for InMemoryChannelLayer {
    fn active_channel_id(&self, connection_id: &str, port_id: &str) -> Option<String> {
        self.active
            .read()
            .get(&(connection_id.to_string(), port_id.to_string()))
            .cloned()
    }

    fn next_sequence_send(&self, port_id: &str, channel_id: &str) -> Option<Sequence> {
        self.next_sequence
            .read()
            .get(&(port_id.to_string(), channel_id.to_string()))
            .copied()
    }

    fn channel_connection(&self, port_id: &str, channel_id: &str) -> Option<String> {
        self.connections
            .read()
            .get(&(port_id.to_string(), channel_id.to_string()))
            .cloned()
    }

    fn send_packet(
        &self,
        ctx: &BlockContext,
        port_id: &str,
        channel_id: &str,
        data: Vec<u8>,
        timeout_timestamp: u64,
    ) -> Result<Sequence, ChannelError> {
        if let Some(reason) = self.rejection.read().clone() {
            return Err(ChannelError::Rejected(reason));
        }
        if timeout_timestamp != 0 && timeout_timestamp <= ctx.time_nanos {
            return Err(ChannelError::TimeoutElapsed {
                timeout: timeout_timestamp,
                now: ctx.time_nanos,
            });
        }

        let key = (port_id.to_string(), channel_id.to_string());
        if !self.connections.read().contains_key(&key) {
            return Err(ChannelError::ChannelClosed {
                port_id: port_id.to_string(),
                channel_id: channel_id.to_string(),
            });
        }

        let sequence = {
            let mut sequences = self.next_sequence.write();
            let next = sequences.entry(key).or_insert(1);
            let sequence = *next;
            *next += 1;
            sequence
        };

        debug!(
            seq = sequence,
            port_id = %port_id,
            channel_id = %channel_id,
            bytes = data.len(),
            "[intergamm] Packet accepted by in-memory channel"
        );

        self.sent.write().push(Packet {
            sequence,
            source_port: port_id.to_string(),
            source_channel: channel_id.to_string(),
            destination_port: if port_id.starts_with(CONTROLLER_PORT_PREFIX) {
                "icahost".to_string()
            } else {
                port_id.to_string()
            },
            destination_channel: channel_id.to_string(),
            data,
            timeout_timestamp,
            ..Default::default()
        });
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequences_increment_per_channel() {
        let layer = InMemoryChannelLayer::new();
        layer.open_channel("connection-0", "icacontroller-a", "channel-0");
        layer.open_channel("connection-0", "icacontroller-b", "channel-1");
        let ctx = BlockContext::default();

        assert_eq!(layer.send_packet(&ctx, "icacontroller-a", "channel-0", vec![], 0), Ok(1));
        assert_eq!(layer.send_packet(&ctx, "icacontroller-a", "channel-0", vec![], 0), Ok(2));
        assert_eq!(layer.send_packet(&ctx, "icacontroller-b", "channel-1", vec![], 0), Ok(1));
        assert_eq!(layer.next_sequence_send("icacontroller-a", "channel-0"), Some(3));
        assert!(layer.sent_packet("icacontroller-a", "channel-0", 2).is_some());
    }

    #[test]
    fn test_unknown_channel() {
        let layer = InMemoryChannelLayer::new();
        assert!(matches!(
            layer.send_packet(&BlockContext::default(), "p", "c", vec![], 0),
            Err(ChannelError::ChannelClosed { .. })
        ));
        assert_eq!(layer.active_channel_id("connection-0", "p"), None);
    }

    #[test]
    fn test_elapsed_timeout() {
        let layer = InMemoryChannelLayer::new();
        layer.open_channel("connection-0", "p", "c");
        let ctx = BlockContext::new(1, 500);
        assert_eq!(
            layer.send_packet(&ctx, "p", "c", vec![], 400),
            Err(ChannelError::TimeoutElapsed { timeout: 400, now: 500 })
        );
    }
}
