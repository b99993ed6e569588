//! # Message Server
//!
//! Transaction message handlers. Each message is checked with
//! [`IntergammMsg::validate_basic`] before it reaches the keeper.

use crate::algorithms::{IcaTransferRequest, LocalTransferRequest};
use crate::application::SendReceipt;
use crate::domain::{
    validate_address, validate_coin, validate_denom, validate_identifier, BlockContext, Coin,
    Height, IcaMessage, IntergammError, Sequence, TxTimeout,
};
use crate::ports::IntergammApi;
use tracing::info;

/// Transaction messages accepted by the module.
#[derive(Clone, Debug, PartialEq)]
pub enum IntergammMsg {
    /// Register an interchain account on a connection.
    RegisterAccount {
        /// Account owner.
        creator: String,
        /// Connection to the host.
        connection_id: String,
    },
    /// Register an interchain account on a zone.
    RegisterIcaOnZone {
        /// Account owner.
        creator: String,
        /// Host zone.
        zone_id: String,
    },
    /// Register an interchain account on a denom's native zone.
    RegisterIcaOnDenomNativeZone {
        /// Account owner.
        creator: String,
        /// Denom whose native zone hosts the account.
        denom: String,
    },
    /// Send tokens from the creator to another zone.
    SendToken {
        /// Sender.
        creator: String,
        /// Destination zone.
        dest_zone_id: String,
        /// Receiver on the destination zone.
        receiver: String,
        /// Amount.
        coin: Coin,
    },
    /// Transfer tokens out of the creator's interchain account.
    TransmitIcaTransfer {
        /// Account owner.
        creator: String,
        /// Zone hosting the interchain account.
        ica_zone_id: String,
        /// Amount.
        coin: Coin,
        /// Final receiver.
        to_address: String,
        /// Transfer timeout height.
        timeout_height: Height,
        /// Transfer timeout timestamp.
        timeout_timestamp: u64,
        /// ICA transaction timeout.
        timeout: TxTimeout,
    },
    /// Execute one message through the creator's interchain account.
    TransmitIca {
        /// Account owner.
        creator: String,
        /// Connection to the host.
        connection_id: String,
        /// ICA transaction timeout.
        timeout: TxTimeout,
        /// Message to execute; its signer is replaced by the account address.
        message: IcaMessage,
    },
}

/// Handler results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntergammMsgResponse {
    /// Registration started.
    Registered,
    /// Local transfer sequence.
    TokenSent {
        /// Sequence of the transfer packet.
        sequence: Sequence,
    },
    /// ICA packet sent.
    Transmitted(SendReceipt),
}

impl IntergammMsg {
    /// Stateless checks.
    pub fn validate_basic(&self) -> Result<(), IntergammError> {
        match self {
            IntergammMsg::RegisterAccount {
                creator,
                connection_id,
            } => {
                validate_address(creator)?;
                validate_identifier(connection_id)
            }
            IntergammMsg::RegisterIcaOnZone { creator, zone_id } => {
                validate_address(creator)?;
                validate_identifier(zone_id)
            }
            IntergammMsg::RegisterIcaOnDenomNativeZone { creator, denom } => {
                validate_address(creator)?;
                validate_denom(denom)
            }
            IntergammMsg::SendToken {
                creator,
                dest_zone_id,
                receiver,
                coin,
            } => {
                validate_address(creator)?;
                validate_identifier(dest_zone_id)?;
                validate_address(receiver)?;
                validate_coin(coin)
            }
            IntergammMsg::TransmitIcaTransfer {
                creator,
                ica_zone_id,
                coin,
                to_address,
                ..
            } => {
                validate_address(creator)?;
                validate_identifier(ica_zone_id)?;
                validate_address(to_address)?;
                validate_coin(coin)
            }
            IntergammMsg::TransmitIca {
                creator,
                connection_id,
                message,
                ..
            } => {
                validate_address(creator)?;
                validate_identifier(connection_id)?;
                if message.kind().is_none() {
                    return Err(IntergammError::UnsupportedMessageKind(
                        message.type_url().to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Message server bound to an [`IntergammApi`].
pub struct MsgServer<'a, A: IntergammApi + ?Sized> {
    api: &'a A,
}

impl<'a, A: IntergammApi + ?Sized> MsgServer<'a, A> {
    /// Create a server over `api`.
    pub fn new(api: &'a A) -> Self {
        Self { api }
    }

    /// Validate and execute a message.
    pub fn handle(
        &self,
        ctx: &BlockContext,
        msg: IntergammMsg,
    ) -> Result<IntergammMsgResponse, IntergammError> {
        msg.validate_basic()?;

        match msg {
            IntergammMsg::RegisterAccount {
                creator,
                connection_id,
            } => {
                self.api
                    .register_interchain_account(&creator, &connection_id)?;
                Ok(IntergammMsgResponse::Registered)
            }
            IntergammMsg::RegisterIcaOnZone { creator, zone_id } => {
                self.api.register_ica_on_zone(&creator, &zone_id)?;
                Ok(IntergammMsgResponse::Registered)
            }
            IntergammMsg::RegisterIcaOnDenomNativeZone { creator, denom } => {
                self.api
                    .register_ica_on_denom_native_zone(&creator, &denom)?;
                Ok(IntergammMsgResponse::Registered)
            }
            IntergammMsg::SendToken {
                creator,
                dest_zone_id,
                receiver,
                coin,
            } => {
                info!(
                    dest_zone_id = %dest_zone_id,
                    coin = %coin,
                    "[intergamm] SendToken"
                );
                let request = LocalTransferRequest {
                    sender: creator,
                    dest_zone_id,
                    token: coin,
                    receiver,
                    timeout_height: Height::zero(),
                    timeout_timestamp: 0,
                };
                let sequence = self.api.send_token(ctx, &request)?;
                Ok(IntergammMsgResponse::TokenSent { sequence })
            }
            IntergammMsg::TransmitIcaTransfer {
                creator,
                ica_zone_id,
                coin,
                to_address,
                timeout_height,
                timeout_timestamp,
                timeout,
            } => {
                let request = IcaTransferRequest {
                    owner: creator,
                    ica_zone_id,
                    token: coin,
                    final_receiver: to_address,
                    timeout_height,
                    timeout_timestamp,
                };
                let receipt = self.api.transmit_ica_transfer(ctx, &request, timeout)?;
                Ok(IntergammMsgResponse::Transmitted(receipt))
            }
            IntergammMsg::TransmitIca {
                creator,
                connection_id,
                timeout,
                message,
            } => {
                let receipt =
                    self.api
                        .transmit_message(ctx, &creator, &connection_id, timeout, message)?;
                Ok(IntergammMsgResponse::Transmitted(receipt))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Any;
    use bech32::{Bech32, Hrp};

    fn creator() -> String {
        bech32::encode::<Bech32>(Hrp::parse("quasar").unwrap(), &[1u8; 20]).unwrap()
    }

    #[test]
    fn test_validate_register() {
        let ok = IntergammMsg::RegisterAccount {
            creator: creator(),
            connection_id: "connection-0".into(),
        };
        assert!(ok.validate_basic().is_ok());

        let bad_creator = IntergammMsg::RegisterAccount {
            creator: "alice".into(),
            connection_id: "connection-0".into(),
        };
        assert!(matches!(
            bad_creator.validate_basic(),
            Err(IntergammError::InvalidAddress { .. })
        ));

        let no_connection = IntergammMsg::RegisterIcaOnZone {
            creator: creator(),
            zone_id: String::new(),
        };
        assert!(matches!(
            no_connection.validate_basic(),
            Err(IntergammError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_validate_send_token_coin() {
        let msg = IntergammMsg::SendToken {
            creator: creator(),
            dest_zone_id: "osmosis".into(),
            receiver: creator(),
            coin: Coin::new("uosmo", 0),
        };
        assert!(matches!(msg.validate_basic(), Err(IntergammError::InvalidCoin(_))));
    }

    #[test]
    fn test_validate_transmit_unsupported() {
        let msg = IntergammMsg::TransmitIca {
            creator: creator(),
            connection_id: "connection-0".into(),
            timeout: TxTimeout::Relative(1),
            message: IcaMessage::Unsupported(Any {
                type_url: "/cosmos.bank.v1beta1.MsgSend".into(),
                value: vec![],
            }),
        };
        assert!(matches!(
            msg.validate_basic(),
            Err(IntergammError::UnsupportedMessageKind(_))
        ));
    }
}
