use core::time::Duration;

use interlink_core::channel::types::acknowledgement::Acknowledgement;
use interlink_core::channel::types::channel::Order;
use interlink_core::channel::types::packet::Packet;
use interlink_core::host::types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::Signer;

use crate::context::MockContext;
use crate::fixtures::clients::headerchain::ClientStateConfig;
use crate::relayer::error::RelayerError;
use crate::relayer::utils;
use crate::testapp::ibc::applications::mock::mock_port_id;

/// Identifiers of an open channel between the mock applications of two
/// chains, along with the clients and connection it runs over.
#[derive(Clone, Debug)]
pub struct ChannelLink {
    pub client_id_on_a: ClientId,
    pub client_id_on_b: ClientId,
    pub conn_id_on_a: ConnectionId,
    pub conn_id_on_b: ConnectionId,
    pub port_id_on_a: PortId,
    pub port_id_on_b: PortId,
    pub chan_id_on_a: ChannelId,
    pub chan_id_on_b: ChannelId,
}

/// Two chains and a relayer between them.
pub struct RelayerContext {
    ctx_a: MockContext,
    ctx_b: MockContext,
}

impl RelayerContext {
    pub fn new(ctx_a: MockContext, ctx_b: MockContext) -> Self {
        Self { ctx_a, ctx_b }
    }

    pub fn get_ctx_a(&self) -> &MockContext {
        &self.ctx_a
    }

    pub fn get_ctx_b(&self) -> &MockContext {
        &self.ctx_b
    }

    pub fn get_ctx_a_mut(&mut self) -> &mut MockContext {
        &mut self.ctx_a
    }

    pub fn get_ctx_b_mut(&mut self) -> &mut MockContext {
        &mut self.ctx_b
    }

    /// Both chains at once, for driving them with the free functions of
    /// [`utils`].
    pub fn split_mut(&mut self) -> (&mut MockContext, &mut MockContext) {
        (&mut self.ctx_a, &mut self.ctx_b)
    }

    pub fn create_client_on_a(&mut self, signer: Signer) -> Result<ClientId, RelayerError> {
        utils::create_headerchain_client_on_a(
            &mut self.ctx_a,
            &self.ctx_b,
            &ClientStateConfig::default(),
            signer,
        )
    }

    pub fn create_client_on_b(&mut self, signer: Signer) -> Result<ClientId, RelayerError> {
        utils::create_headerchain_client_on_a(
            &mut self.ctx_b,
            &self.ctx_a,
            &ClientStateConfig::default(),
            signer,
        )
    }

    pub fn update_client_on_a_with_sync(
        &mut self,
        client_id_on_a: &ClientId,
        signer: Signer,
    ) -> Result<(), RelayerError> {
        utils::update_client_on_a_with_sync(&mut self.ctx_a, &self.ctx_b, client_id_on_a, signer)
    }

    pub fn update_client_on_b_with_sync(
        &mut self,
        client_id_on_b: &ClientId,
        signer: Signer,
    ) -> Result<(), RelayerError> {
        utils::update_client_on_a_with_sync(&mut self.ctx_b, &self.ctx_a, client_id_on_b, signer)
    }

    pub fn create_connection_on_a(
        &mut self,
        client_id_on_a: &ClientId,
        client_id_on_b: &ClientId,
        delay_period: Duration,
        signer: Signer,
    ) -> Result<(ConnectionId, ConnectionId), RelayerError> {
        utils::create_connection_on_a(
            &mut self.ctx_a,
            &mut self.ctx_b,
            client_id_on_a,
            client_id_on_b,
            delay_period,
            signer,
        )
    }

    /// Returns the connection identifiers of `B` and `A`, in that order.
    pub fn create_connection_on_b(
        &mut self,
        client_id_on_b: &ClientId,
        client_id_on_a: &ClientId,
        delay_period: Duration,
        signer: Signer,
    ) -> Result<(ConnectionId, ConnectionId), RelayerError> {
        utils::create_connection_on_a(
            &mut self.ctx_b,
            &mut self.ctx_a,
            client_id_on_b,
            client_id_on_a,
            delay_period,
            signer,
        )
    }

    pub fn create_channel_on_a(
        &mut self,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
        conn_id_on_b: &ConnectionId,
        port_id_on_b: &PortId,
        ordering: Order,
        signer: Signer,
    ) -> Result<(ChannelId, ChannelId), RelayerError> {
        utils::create_channel_on_a(
            &mut self.ctx_a,
            &mut self.ctx_b,
            conn_id_on_a,
            port_id_on_a,
            conn_id_on_b,
            port_id_on_b,
            ordering,
            signer,
        )
    }

    /// Returns the channel identifiers of `B` and `A`, in that order.
    pub fn create_channel_on_b(
        &mut self,
        conn_id_on_b: &ConnectionId,
        port_id_on_b: &PortId,
        conn_id_on_a: &ConnectionId,
        port_id_on_a: &PortId,
        ordering: Order,
        signer: Signer,
    ) -> Result<(ChannelId, ChannelId), RelayerError> {
        utils::create_channel_on_a(
            &mut self.ctx_b,
            &mut self.ctx_a,
            conn_id_on_b,
            port_id_on_b,
            conn_id_on_a,
            port_id_on_a,
            ordering,
            signer,
        )
    }

    /// Opens a channel between the mock applications of both chains from
    /// scratch: clients on both sides, a connection with `delay_period` and
    /// a channel with `ordering`.
    pub fn link_mock_channel(
        &mut self,
        ordering: Order,
        delay_period: Duration,
        signer: Signer,
    ) -> Result<ChannelLink, RelayerError> {
        let client_id_on_a = self.create_client_on_a(signer.clone())?;
        let client_id_on_b = self.create_client_on_b(signer.clone())?;

        let (conn_id_on_a, conn_id_on_b) = self.create_connection_on_a(
            &client_id_on_a,
            &client_id_on_b,
            delay_period,
            signer.clone(),
        )?;

        let port_id_on_a = mock_port_id();
        let port_id_on_b = mock_port_id();

        let (chan_id_on_a, chan_id_on_b) = self.create_channel_on_a(
            &conn_id_on_a,
            &port_id_on_a,
            &conn_id_on_b,
            &port_id_on_b,
            ordering,
            signer,
        )?;

        Ok(ChannelLink {
            client_id_on_a,
            client_id_on_b,
            conn_id_on_a,
            conn_id_on_b,
            port_id_on_a,
            port_id_on_b,
            chan_id_on_a,
            chan_id_on_b,
        })
    }

    pub fn close_channel_on_a(&mut self, link: &ChannelLink, signer: Signer) -> Result<(), RelayerError> {
        utils::close_channel_on_a(
            &mut self.ctx_a,
            &mut self.ctx_b,
            &link.chan_id_on_a,
            &link.port_id_on_a,
            &link.chan_id_on_b,
            &link.port_id_on_b,
            signer,
        )
    }

    pub fn close_channel_on_b(&mut self, link: &ChannelLink, signer: Signer) -> Result<(), RelayerError> {
        utils::close_channel_on_a(
            &mut self.ctx_b,
            &mut self.ctx_a,
            &link.chan_id_on_b,
            &link.port_id_on_b,
            &link.chan_id_on_a,
            &link.port_id_on_a,
            signer,
        )
    }

    /// Sends `data` from the mock application on `A` with no timeout.
    pub fn send_packet_on_a(
        &mut self,
        link: &ChannelLink,
        data: Vec<u8>,
    ) -> Result<Packet, RelayerError> {
        self.ctx_a.send_mock_packet(&link.chan_id_on_a, data)
    }

    /// Relays a packet sent on `A` to `B` and its acknowledgement back.
    pub fn relay_packet_on_a(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        signer: Signer,
    ) -> Result<Acknowledgement, RelayerError> {
        utils::relay_packet_on_a(
            &mut self.ctx_a,
            &mut self.ctx_b,
            packet,
            &link.client_id_on_a,
            &link.client_id_on_b,
            signer,
        )
    }

    /// Relays a packet sent on `B` to `A` and its acknowledgement back.
    pub fn relay_packet_on_b(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        signer: Signer,
    ) -> Result<Acknowledgement, RelayerError> {
        utils::relay_packet_on_a(
            &mut self.ctx_b,
            &mut self.ctx_a,
            packet,
            &link.client_id_on_b,
            &link.client_id_on_a,
            signer,
        )
    }

    /// Delivers a packet sent on `A` to `B`, without relaying the
    /// acknowledgement back.
    pub fn recv_packet_on_b(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        signer: Signer,
    ) -> Result<Acknowledgement, RelayerError> {
        utils::update_client_on_a_with_sync(
            &mut self.ctx_b,
            &self.ctx_a,
            &link.client_id_on_b,
            signer.clone(),
        )?;
        utils::packet_recv_on_b(&mut self.ctx_b, &self.ctx_a, packet, signer)
    }

    /// Relays `B`'s acknowledgement of a packet sent on `A`.
    pub fn ack_packet_on_a(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        acknowledgement: Acknowledgement,
        signer: Signer,
    ) -> Result<(), RelayerError> {
        utils::update_client_on_a_with_sync(
            &mut self.ctx_a,
            &self.ctx_b,
            &link.client_id_on_a,
            signer.clone(),
        )?;
        utils::packet_ack_on_a(&mut self.ctx_a, &self.ctx_b, packet, acknowledgement, signer)
    }

    /// Times out on `A` a packet `B` never received.
    pub fn timeout_packet_on_a(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        signer: Signer,
    ) -> Result<(), RelayerError> {
        utils::update_client_on_a_with_sync(
            &mut self.ctx_a,
            &self.ctx_b,
            &link.client_id_on_a,
            signer.clone(),
        )?;
        utils::packet_timeout_on_a(&mut self.ctx_a, &self.ctx_b, packet, signer)
    }

    /// Times out on `A` a packet `B` never received before closing its end.
    pub fn timeout_on_close_packet_on_a(
        &mut self,
        link: &ChannelLink,
        packet: Packet,
        signer: Signer,
    ) -> Result<(), RelayerError> {
        utils::update_client_on_a_with_sync(
            &mut self.ctx_a,
            &self.ctx_b,
            &link.client_id_on_a,
            signer.clone(),
        )?;
        utils::packet_timeout_on_close_on_a(&mut self.ctx_a, &self.ctx_b, packet, signer)
    }
}
