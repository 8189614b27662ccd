//! Application-initiated packet sending.

use interlink_core_channel_types::capability::ChannelCapability;
use interlink_core_channel_types::commitment::compute_packet_commitment;
use interlink_core_channel_types::error::{CapabilityError, PacketError};
use interlink_core_channel_types::events::SendPacket;
use interlink_core_channel_types::packet::Packet;
use interlink_core_channel_types::timeout::{TimeoutHeight, TimeoutTimestamp};
use interlink_core_client::context::prelude::*;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::path::{ClientConsensusStatePath, CommitmentPath, SeqSendPath};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::types::module::ModuleExtras;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

/// Sends `data` over the channel `capability` was minted for, assigning it
/// the channel's next send sequence.
///
/// Equivalent to building the packet with [`next_packet`], then calling
/// [`send_packet_validate`] followed by [`send_packet_execute`]. Returns the
/// packet for the relayer to carry.
pub fn send_packet<Ctx>(
    ctx_a: &mut Ctx,
    capability: &ChannelCapability,
    data: Vec<u8>,
    timeout_height_on_b: TimeoutHeight,
    timeout_timestamp_on_b: TimeoutTimestamp,
) -> Result<Packet, ContextError>
where
    Ctx: ExecutionContext,
{
    let packet = next_packet(
        ctx_a,
        capability,
        data,
        timeout_height_on_b,
        timeout_timestamp_on_b,
    )?;
    send_packet_validate(ctx_a, capability, &packet)?;
    send_packet_execute(ctx_a, packet.clone())?;
    Ok(packet)
}

/// Builds the packet the channel would send next.
pub fn next_packet<Ctx>(
    ctx_a: &Ctx,
    capability: &ChannelCapability,
    data: Vec<u8>,
    timeout_height_on_b: TimeoutHeight,
    timeout_timestamp_on_b: TimeoutTimestamp,
) -> Result<Packet, ContextError>
where
    Ctx: ValidationContext,
{
    let route = ChannelRoute::load(ctx_a, capability.port_id(), capability.channel_id())?;
    let seq_on_a = ctx_a.get_next_sequence_send(&SeqSendPath::new(&route.port_id, &route.chan_id))?;

    Ok(Packet {
        seq_on_a,
        port_id_on_b: route.peer_port_id().clone(),
        chan_id_on_b: route.peer_chan_id()?.clone(),
        port_id_on_a: route.port_id,
        chan_id_on_a: route.chan_id,
        data,
        timeout_height_on_b,
        timeout_timestamp_on_b,
    })
}

/// Validate that sending the given packet would succeed.
pub fn send_packet_validate<Ctx>(
    ctx_a: &Ctx,
    capability: &ChannelCapability,
    packet: &Packet,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.authenticate_capability(capability)?;
    if capability.port_id() != &packet.port_id_on_a
        || capability.channel_id() != &packet.chan_id_on_a
    {
        return Err(CapabilityError::Unauthorized {
            port_id: packet.port_id_on_a.clone(),
            channel_id: packet.chan_id_on_a.clone(),
        }
        .into());
    }

    packet.validate_basic()?;

    let route = ChannelRoute::for_packets(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;
    route.require_peer(&packet.port_id_on_b, &packet.chan_id_on_b)?;
    route.require_active_client(ctx_a)?;
    verify_receivable(ctx_a, &route, packet)?;

    let expected = ctx_a.get_next_sequence_send(&SeqSendPath::new(&route.port_id, &route.chan_id))?;
    if packet.seq_on_a != expected {
        return Err(PacketError::PacketSequenceOutOfOrder {
            expected,
            actual: packet.seq_on_a,
        }
        .into());
    }

    Ok(())
}

/// Send the packet without any validation.
///
/// A prior call to [`send_packet_validate`] MUST have succeeded.
pub fn send_packet_execute<Ctx>(ctx_a: &mut Ctx, packet: Packet) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let route = ChannelRoute::load(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let seq_send_path = SeqSendPath::new(&route.port_id, &route.chan_id);
    let next_seq_send = ctx_a.get_next_sequence_send(&seq_send_path)?;
    ctx_a.store_next_sequence_send(&seq_send_path, next_seq_send.increment())?;

    ctx_a.store_packet_commitment(
        &CommitmentPath::new(&route.port_id, &route.chan_id, packet.seq_on_a),
        compute_packet_commitment(
            &packet.data,
            &packet.timeout_height_on_b,
            &packet.timeout_timestamp_on_b,
        ),
    )?;

    let summary = format!("success: packet send: {packet}");
    let event = SendPacket::new(packet, route.ordering(), route.conn_id.clone());
    record(
        ctx_a,
        summary,
        [IbcEvent::SendPacket(event)],
        ModuleExtras::empty(),
    )
}

/// The packet must not have expired yet as far as this chain last saw the
/// counterparty, at the latest height of its client.
fn verify_receivable<Ctx>(
    ctx_a: &Ctx,
    route: &ChannelRoute,
    packet: &Packet,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let client_ctx = ctx_a.get_client_validation_context();
    let latest_height = client_ctx.client_state(route.client_id())?.latest_height();
    let latest_timestamp = client_ctx
        .consensus_state(&ClientConsensusStatePath::new(
            route.client_id().clone(),
            latest_height.revision_number(),
            latest_height.revision_height(),
        ))?
        .timestamp();

    if packet.timed_out(&latest_timestamp, latest_height) {
        return Err(PacketError::InvalidTimeout {
            timeout_height: packet.timeout_height_on_b,
            timeout_timestamp: packet.timeout_timestamp_on_b,
            chain_height: latest_height,
            chain_timestamp: latest_timestamp,
        }
        .into());
    }
    Ok(())
}
