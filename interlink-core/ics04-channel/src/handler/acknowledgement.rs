//! Protocol logic specific to processing messages of type
//! `MsgAcknowledgement`.

use interlink_core_channel_types::channel::Order;
use interlink_core_channel_types::commitment::compute_ack_commitment;
use interlink_core_channel_types::error::PacketError;
use interlink_core_channel_types::events::AcknowledgePacket;
use interlink_core_channel_types::msgs::MsgAcknowledgement;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::path::{AckPath, CommitmentPath, Path, SeqAckPath};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

pub fn acknowledgement_packet_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgAcknowledgement,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = ChannelRoute::for_packets(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;
    route.require_open_connection()?;
    route.verify_in_flight(ctx_a, packet)?;

    // Ordered ends settle their packets strictly one after the other.
    if route.ordering() == Order::Ordered {
        let expected =
            ctx_a.get_next_sequence_ack(&SeqAckPath::new(&route.port_id, &route.chan_id))?;
        if packet.seq_on_a != expected {
            return Err(PacketError::PacketSequenceOutOfOrder {
                expected,
                actual: packet.seq_on_a,
            }
            .into());
        }
    }

    route.verify_peer_entry(
        ctx_a,
        packet.seq_on_a,
        Path::Ack(AckPath::new(
            &packet.port_id_on_b,
            &packet.chan_id_on_b,
            packet.seq_on_a,
        )),
        Some(compute_ack_commitment(&msg.acknowledgement).into_vec()),
        msg.proof_height_on_b,
        &msg.proof_acked_on_b,
    )?;

    module
        .on_acknowledgement_packet_validate(packet, &msg.acknowledgement, &msg.signer)
        .map_err(ContextError::PacketError)
}

/// Hands the acknowledgement to the module and retires the packet: its
/// commitment is deleted, and ordered ends move `nextSequenceAck` past it.
pub fn acknowledgement_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgAcknowledgement,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let MsgAcknowledgement {
        packet,
        acknowledgement,
        signer,
        ..
    } = msg;
    let route = ChannelRoute::load(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let (extras, outcome) =
        module.on_acknowledgement_packet_execute(&packet, &acknowledgement, &signer);
    outcome?;

    ctx_a.delete_packet_commitment(&CommitmentPath::new(
        &route.port_id,
        &route.chan_id,
        packet.seq_on_a,
    ))?;
    if route.ordering() == Order::Ordered {
        ctx_a.store_next_sequence_ack(
            &SeqAckPath::new(&route.port_id, &route.chan_id),
            packet.seq_on_a.increment(),
        )?;
    }

    let summary = format!("success: packet acknowledgement: {packet}");
    let event = AcknowledgePacket::new(packet, route.ordering(), route.conn_id.clone());
    record(ctx_a, summary, [IbcEvent::AcknowledgePacket(event)], extras)
}
