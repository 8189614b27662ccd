use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use interlink_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use interlink_core::channel::types::capability::ChannelCapability;
use interlink_core::channel::types::channel::{Counterparty, Order};
use interlink_core::channel::types::error::{ChannelError, PacketError};
use interlink_core::channel::types::packet::Packet;
use interlink_core::channel::types::Version;
use interlink_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::Signer;
use interlink_core::router::module::Module;
use interlink_core::router::types::event::ModuleEvent;
use interlink_core::router::types::module::ModuleExtras;

use super::types::{mock_app_version, MockModule, REJECTED_PACKET_DATA};

/// Settles on the mock version when the proposal is empty or already the
/// mock version. An empty result fails the handshake.
fn negotiate(proposed: &Version) -> Version {
    let supported = mock_app_version();
    if proposed.is_empty() || proposed == &supported {
        supported
    } else {
        Version::empty()
    }
}

fn packet_event(kind: &str, packet: &Packet) -> ModuleExtras {
    ModuleExtras {
        events: vec![ModuleEvent {
            kind: kind.to_string(),
            attributes: vec![
                ("sequence", packet.seq_on_a).into(),
                ("src_channel", &packet.chan_id_on_a).into(),
                ("dst_channel", &packet.chan_id_on_b).into(),
            ],
        }],
        log: vec![format!("{kind}: packet {}", packet.seq_on_a)],
    }
}

impl Module for MockModule {
    fn on_chan_open_init_validate(
        &self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &Version,
    ) -> Result<Version, ChannelError> {
        Ok(negotiate(version))
    }

    fn on_chan_open_init_execute(
        &mut self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &Version,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        Ok((ModuleExtras::empty(), negotiate(version)))
    }

    fn on_chan_open_try_validate(
        &self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<Version, ChannelError> {
        Ok(negotiate(counterparty_version))
    }

    fn on_chan_open_try_execute(
        &mut self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        Ok((ModuleExtras::empty(), negotiate(counterparty_version)))
    }

    fn on_chan_open_ack_validate(
        &self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<(), ChannelError> {
        counterparty_version.verify_is_expected(mock_app_version())
    }

    fn on_chan_close_confirm_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, ChannelError> {
        self.state()
            .closed
            .push((port_id.clone(), channel_id.clone()));
        Ok(ModuleExtras::empty())
    }

    fn on_chan_close_init_execute(
        &mut self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<ModuleExtras, ChannelError> {
        self.state()
            .closed
            .push((port_id.clone(), channel_id.clone()));
        Ok(ModuleExtras::empty())
    }

    fn on_channel_capability(&mut self, capability: ChannelCapability) {
        let key = (
            capability.port_id().clone(),
            capability.channel_id().clone(),
        );
        self.state().capabilities.insert(key, capability);
    }

    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement) {
        self.state().received.push(packet.clone());

        let status = if packet.data == REJECTED_PACKET_DATA {
            StatusValue::new("packet rejected by the mock module").map(AcknowledgementStatus::error)
        } else {
            StatusValue::new(BASE64_STANDARD.encode(&packet.data))
                .map(AcknowledgementStatus::success)
        };

        // packet data is never empty, so neither status value is
        let ack = status
            .and_then(Acknowledgement::try_from)
            .expect("Never fails");

        (packet_event("mock_recv_packet", packet), ack)
    }

    fn on_acknowledgement_packet_validate(
        &self,
        _packet: &Packet,
        _acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        Ok(())
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        self.state()
            .acknowledged
            .push((packet.seq_on_a, acknowledgement.clone()));

        (packet_event("mock_ack_packet", packet), Ok(()))
    }

    fn on_timeout_packet_validate(
        &self,
        _packet: &Packet,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        Ok(())
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        self.state().timed_out.push(packet.seq_on_a);

        (packet_event("mock_timeout_packet", packet), Ok(()))
    }
}
