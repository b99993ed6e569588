//! # Intergamm Keeper
//!
//! Application service owning the configuration, the hook registry and the
//! collaborators. Sends ICA transactions and local transfers, registers
//! interchain accounts, and resolves acknowledgements and timeouts.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::ack_router::route_acknowledgement;
use super::hooks::HookRegistry;
use super::packet_sender::{PacketSender, SendReceipt};
use super::timeout_router::route_timeout;
use super::transfer_router::{route_transfer_ack, route_transfer_timeout};
use crate::algorithms::{
    plan_ica_transfer, plan_local_transfer, IcaTransferRequest, LocalTransferRequest,
    ZoneRoutingTable,
};
use crate::config::{IntergammConfig, Params};
use crate::domain::{
    AckOutcome, BlockContext, ChannelError, FungibleTokenPacketData, IcaMessage, IcaRequest,
    IntergammError, Sequence, TxTimeout,
};
use crate::ports::{AccountRegistry, ChannelLayer, Codec, IntergammApi, TokenTransfer};

/// Intergamm keeper.
pub struct Keeper {
    /// Configuration.
    config: IntergammConfig,
    /// Ack and timeout hooks.
    hooks: HookRegistry,
    /// IBC channel layer.
    channels: Arc<dyn ChannelLayer>,
    /// Interchain account registry.
    accounts: Arc<dyn AccountRegistry>,
    /// Transaction codec.
    codec: Arc<dyn Codec>,
    /// Local ICS-20 transfer module.
    transfers: Arc<dyn TokenTransfer>,
}

impl Keeper {
    /// Create a keeper. Fails when the configuration is invalid.
    pub fn new(
        config: IntergammConfig,
        channels: Arc<dyn ChannelLayer>,
        accounts: Arc<dyn AccountRegistry>,
        codec: Arc<dyn Codec>,
        transfers: Arc<dyn TokenTransfer>,
    ) -> Result<Self, IntergammError> {
        config.validate()?;
        info!(
            local_zone_id = %config.local_zone_id,
            zones = config.params.complete_zone_info_map.len(),
            denoms = config.params.denom_to_native_zone_id_map.len(),
            "[intergamm] Keeper initialized"
        );
        Ok(Self {
            config,
            hooks: HookRegistry::new(),
            channels,
            accounts,
            codec,
            transfers,
        })
    }

    /// Configuration.
    pub fn config(&self) -> &IntergammConfig {
        &self.config
    }

    /// Replace the params after validating them.
    pub fn set_params(&mut self, params: Params) -> Result<(), IntergammError> {
        params.validate()?;
        self.config.params = params;
        Ok(())
    }

    /// Hook registry.
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Hook registry, for wiring.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Routing view over the current params.
    pub fn routing_table(&self) -> ZoneRoutingTable<'_> {
        ZoneRoutingTable::new(&self.config.params)
    }

    fn sender(&self) -> PacketSender<'_> {
        PacketSender::new(self.channels.as_ref(), self.codec.as_ref())
    }

    fn resolve_timeout(&self, ctx: &BlockContext, timeout: TxTimeout) -> u64 {
        timeout.resolve(ctx.time_nanos, self.config.default_relative_timeout_nanos)
    }

    // =========================================================================
    // Interchain accounts
    // =========================================================================

    /// Address of `owner`'s interchain account on a connection, if registered.
    pub fn is_ica_registered(&self, owner: &str, connection_id: &str) -> Option<String> {
        self.accounts
            .interchain_account_address(owner, connection_id)
            .ok()
    }

    /// Return the registered address, registering the account first if needed.
    pub fn register_or_return_ica(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<String, IntergammError> {
        if let Some(address) = self.is_ica_registered(owner, connection_id) {
            return Ok(address);
        }
        info!(
            owner = %owner,
            connection_id = %connection_id,
            "[intergamm] No interchain account found, registering"
        );
        self.accounts
            .register_interchain_account(owner, connection_id)?;
        self.accounts
            .interchain_account_address(owner, connection_id)
    }

    /// Address of `owner` on a zone: the owner itself on the local zone,
    /// otherwise its interchain account there.
    pub fn ica_address_on_zone(&self, owner: &str, zone_id: &str) -> Result<String, IntergammError> {
        if zone_id == self.config.local_zone_id {
            return Ok(owner.to_string());
        }
        let info = self.routing_table().route_info(zone_id)?;
        self.accounts
            .interchain_account_address(owner, &info.zone_route_info.connection_id)
    }

    /// Address of `owner` on the native zone of `denom`.
    pub fn ica_address_on_denom_native_zone(
        &self,
        owner: &str,
        denom: &str,
    ) -> Result<String, IntergammError> {
        let zone_id = self.routing_table().native_zone_of(denom)?;
        self.ica_address_on_zone(owner, zone_id)
    }

    /// Local denom of an Osmosis denom, from the params.
    pub fn quasar_denom_of(&self, osmosis_denom: &str) -> Option<&str> {
        self.routing_table().quasar_denom_of(osmosis_denom)
    }

    // =========================================================================
    // Outbound
    // =========================================================================

    /// Send `request` through `owner`'s interchain account on a connection.
    ///
    /// The request signer is set to the interchain account address.
    pub fn transmit<K: IcaRequest>(
        &self,
        ctx: &BlockContext,
        owner: &str,
        connection_id: &str,
        timeout: TxTimeout,
        mut request: K,
    ) -> Result<SendReceipt, IntergammError> {
        let address = self
            .accounts
            .interchain_account_address(owner, connection_id)?;
        request.set_signer(&address);

        info!(
            kind = %K::KIND,
            owner = %owner,
            connection_id = %connection_id,
            "[intergamm] Transmitting ICA message"
        );
        self.sender().send(
            ctx,
            owner,
            connection_id,
            &[request.into_message()],
            self.resolve_timeout(ctx, timeout),
        )
    }
}

impl IntergammApi for Keeper {
    fn register_interchain_account(
        &self,
        owner: &str,
        connection_id: &str,
    ) -> Result<(), IntergammError> {
        info!(
            owner = %owner,
            connection_id = %connection_id,
            "[intergamm] Registering interchain account"
        );
        self.accounts
            .register_interchain_account(owner, connection_id)
    }

    fn register_ica_on_zone(&self, owner: &str, zone_id: &str) -> Result<(), IntergammError> {
        let info = self.routing_table().route_info(zone_id)?;
        self.register_interchain_account(owner, &info.zone_route_info.connection_id)
    }

    fn register_ica_on_denom_native_zone(
        &self,
        owner: &str,
        denom: &str,
    ) -> Result<(), IntergammError> {
        let info = self.routing_table().native_zone_info(denom)?;
        self.register_interchain_account(owner, &info.zone_route_info.connection_id)
    }

    fn send_token(
        &self,
        ctx: &BlockContext,
        request: &LocalTransferRequest,
    ) -> Result<Sequence, IntergammError> {
        let table = self.routing_table();
        let mut plan = plan_local_transfer(
            &table,
            self.accounts.as_ref(),
            &self.config.local_zone_id,
            request,
        )
        .map_err(|e| {
            error!(dest_zone_id = %request.dest_zone_id, token = %request.token, "[intergamm] SendToken failed: {}", e);
            e
        })?;
        if plan.transfer.timeout_timestamp == 0 {
            plan.transfer.timeout_timestamp = self.resolve_timeout(ctx, TxTimeout::Absolute(0));
        }

        let port_id = &plan.transfer.source_port;
        let channel_id = &plan.transfer.source_channel;
        let expected = self
            .channels
            .next_sequence_send(port_id, channel_id)
            .ok_or_else(|| ChannelError::SequenceSendNotFound {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            })?;

        let sequence = self.transfers.send_transfer(ctx, &plan.transfer)?;
        if sequence != expected {
            warn!(
                seq = sequence,
                expected,
                port_id = %port_id,
                channel_id = %channel_id,
                "[intergamm] Transfer module assigned an unexpected sequence"
            );
        }

        info!(
            seq = sequence,
            route = ?plan.route,
            dest_zone_id = %request.dest_zone_id,
            token = %request.token,
            "[intergamm] Token transfer sent"
        );
        Ok(sequence)
    }

    fn transmit_ica_transfer(
        &self,
        ctx: &BlockContext,
        request: &IcaTransferRequest,
        timeout: TxTimeout,
    ) -> Result<SendReceipt, IntergammError> {
        let table = self.routing_table();
        let plan = plan_ica_transfer(
            &table,
            self.accounts.as_ref(),
            &self.config.local_zone_id,
            request,
        )?;

        info!(
            route = ?plan.route,
            ica_zone_id = %request.ica_zone_id,
            receiver = %plan.transfer.receiver,
            "[intergamm] Transmitting ICA transfer"
        );
        self.sender().send(
            ctx,
            &request.owner,
            &plan.connection_id,
            &[IcaMessage::Transfer(plan.transfer)],
            self.resolve_timeout(ctx, timeout),
        )
    }

    fn transmit_message(
        &self,
        ctx: &BlockContext,
        owner: &str,
        connection_id: &str,
        timeout: TxTimeout,
        message: IcaMessage,
    ) -> Result<SendReceipt, IntergammError> {
        match message {
            IcaMessage::Transfer(m) => self.transmit(ctx, owner, connection_id, timeout, m),
            IcaMessage::CreateBalancerPool(m) => {
                self.transmit(ctx, owner, connection_id, timeout, m)
            }
            IcaMessage::JoinPool(m) => self.transmit(ctx, owner, connection_id, timeout, m),
            IcaMessage::ExitPool(m) => self.transmit(ctx, owner, connection_id, timeout, m),
            IcaMessage::JoinSwapExternAmountIn(m) => {
                self.transmit(ctx, owner, connection_id, timeout, m)
            }
            IcaMessage::ExitSwapExternAmountOut(m) => {
                self.transmit(ctx, owner, connection_id, timeout, m)
            }
            IcaMessage::JoinSwapShareAmountOut(m) => {
                self.transmit(ctx, owner, connection_id, timeout, m)
            }
            IcaMessage::ExitSwapShareAmountIn(m) => {
                self.transmit(ctx, owner, connection_id, timeout, m)
            }
            IcaMessage::LockTokens(m) => self.transmit(ctx, owner, connection_id, timeout, m),
            IcaMessage::BeginUnlocking(m) => self.transmit(ctx, owner, connection_id, timeout, m),
            IcaMessage::Unsupported(any) => {
                Err(IntergammError::UnsupportedMessageKind(any.type_url))
            }
        }
    }

    fn handle_ica_acknowledgement(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        payload: &[u8],
        outcome: AckOutcome,
    ) -> Result<(), IntergammError> {
        let kind = route_acknowledgement(
            &self.hooks,
            self.codec.as_ref(),
            ctx,
            sequence,
            payload,
            &outcome,
        )?;
        info!(
            seq = sequence,
            kind = %kind,
            success = outcome.is_success(),
            "[intergamm] ICA acknowledgement handled"
        );
        Ok(())
    }

    fn handle_ica_timeout(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        payload: &[u8],
    ) -> Result<(), IntergammError> {
        let kind = route_timeout(&self.hooks, self.codec.as_ref(), ctx, sequence, payload)?;
        info!(seq = sequence, kind = %kind, "[intergamm] ICA timeout handled");
        Ok(())
    }

    fn handle_ibc_transfer_acknowledgement(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        packet_data: FungibleTokenPacketData,
        outcome: AckOutcome,
    ) -> Result<(), IntergammError> {
        let success = outcome.is_success();
        route_transfer_ack(&self.hooks, ctx, sequence, packet_data, &outcome)?;
        info!(seq = sequence, success, "[intergamm] Transfer acknowledgement handled");
        Ok(())
    }

    fn handle_ibc_transfer_timeout(
        &self,
        ctx: &BlockContext,
        sequence: Sequence,
        packet_data: FungibleTokenPacketData,
    ) -> Result<(), IntergammError> {
        route_transfer_timeout(&self.hooks, ctx, sequence, packet_data)?;
        info!(seq = sequence, "[intergamm] Transfer timeout handled");
        Ok(())
    }
}
