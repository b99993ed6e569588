//! In-Memory Token Transfer Adapter
//!
//! Implements `TokenTransfer` by sending the ICS-20 packet over a channel
//! layer, which assigns the sequence, and recording the accepted transfer.

use crate::domain::{
    BlockContext, ChannelError, FungibleTokenPacketData, IntergammError, MsgTransfer, Sequence,
};
use crate::ports::outbound::{ChannelLayer, TokenTransfer};
use parking_lot::RwLock;
use std::sync::Arc;

/// In-memory local transfer module.
pub struct InMemoryTokenTransfer {
    channels: Arc<dyn ChannelLayer>,
    transfers: RwLock<Vec<MsgTransfer>>,
    rejection: RwLock<Option<String>>,
}

impl InMemoryTokenTransfer {
    /// Create a transfer module sending over `channels`.
    pub fn new(channels: Arc<dyn ChannelLayer>) -> Self {
        Self {
            channels,
            transfers: RwLock::new(Vec::new()),
            rejection: RwLock::new(None),
        }
    }

    /// Reject every subsequent transfer with `reason`.
    pub fn reject_transfers(&self, reason: &str) {
        *self.rejection.write() = Some(reason.to_string());
    }

    /// Accepted transfers, in call order.
    pub fn transfers(&self) -> Vec<MsgTransfer> {
        self.transfers.read().clone()
    }
}

impl TokenTransfer for InMemoryTokenTransfer {
    fn send_transfer(
        &self,
        ctx: &BlockContext,
        msg: &MsgTransfer,
    ) -> Result<Sequence, IntergammError> {
        if let Some(reason) = self.rejection.read().clone() {
            return Err(ChannelError::Rejected(reason).into());
        }

        let data = FungibleTokenPacketData::from_transfer(msg).to_bytes()?;
        let sequence = self.channels.send_packet(
            ctx,
            &msg.source_port,
            &msg.source_channel,
            data,
            msg.timeout_timestamp,
        )?;
        self.transfers.write().push(msg.clone());
        Ok(sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryChannelLayer;
    use crate::domain::Coin;

    fn setup() -> (Arc<InMemoryChannelLayer>, InMemoryTokenTransfer) {
        let channels = Arc::new(InMemoryChannelLayer::new());
        channels.add_channel("connection-1", "transfer", "channel-1");
        let module = InMemoryTokenTransfer::new(channels.clone());
        (channels, module)
    }

    fn transfer() -> MsgTransfer {
        MsgTransfer {
            source_port: "transfer".into(),
            source_channel: "channel-1".into(),
            token: Coin::new("uqsr", 10),
            sender: "quasar1x".into(),
            receiver: "osmo1x".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_sends_packet_and_records() {
        let (channels, module) = setup();
        let msg = transfer();
        let sequence = module.send_transfer(&BlockContext::default(), &msg).unwrap();

        assert_eq!(sequence, 1);
        assert_eq!(module.transfers(), vec![msg]);
        let packet = channels.sent_packet("transfer", "channel-1", 1).unwrap();
        let data = FungibleTokenPacketData::from_bytes(&packet.data).unwrap();
        assert_eq!(data.denom, "uqsr");
        assert_eq!(data.amount, "10");
    }

    #[test]
    fn test_sequences_advance() {
        let (_, module) = setup();
        let ctx = BlockContext::default();
        let first = module.send_transfer(&ctx, &transfer()).unwrap();
        let second = module.send_transfer(&ctx, &transfer()).unwrap();
        assert_eq!((first, second), (1, 2));
    }

    #[test]
    fn test_unknown_channel() {
        let (_, module) = setup();
        let mut msg = transfer();
        msg.source_channel = "channel-9".into();
        let result = module.send_transfer(&BlockContext::default(), &msg);
        assert!(matches!(
            result,
            Err(IntergammError::Channel(ChannelError::ChannelClosed { .. }))
        ));
        assert!(module.transfers().is_empty());
    }

    #[test]
    fn test_rejection() {
        let (channels, module) = setup();
        module.reject_transfers("insufficient funds");
        let result = module.send_transfer(&BlockContext::default(), &transfer());
        assert!(matches!(
            result,
            Err(IntergammError::Channel(ChannelError::Rejected(reason))) if reason == "insufficient funds"
        ));
        assert!(module.transfers().is_empty());
        assert!(channels.sent_packets().is_empty());
    }
}
