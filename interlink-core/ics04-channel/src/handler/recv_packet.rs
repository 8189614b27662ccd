//! Protocol logic specific to processing messages of type `MsgRecvPacket`.
//!
//! Receiving also writes the acknowledgement the module returns, so a
//! successful receive always leaves an acknowledgement commitment behind.

use interlink_core_channel_types::channel::Order;
use interlink_core_channel_types::commitment::{compute_ack_commitment, compute_packet_commitment};
use interlink_core_channel_types::error::PacketError;
use interlink_core_channel_types::events::{ReceivePacket, WriteAcknowledgement};
use interlink_core_channel_types::msgs::MsgRecvPacket;
use interlink_core_channel_types::packet::{Packet, Receipt};
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::path::{AckPath, CommitmentPath, Path, ReceiptPath, SeqRecvPath};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

/// The module is not consulted: a failing application answers with an
/// error acknowledgement instead of rejecting the packet.
pub fn recv_packet_validate<ValCtx>(ctx_b: &ValCtx, msg: MsgRecvPacket) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    packet.validate_basic()?;

    let route = ChannelRoute::for_packets(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;
    route.require_peer(&packet.port_id_on_a, &packet.chan_id_on_a)?;
    route.require_open_connection()?;

    verify_not_expired(ctx_b, packet)?;
    verify_fresh(ctx_b, &route, packet)?;

    let commitment = compute_packet_commitment(
        &packet.data,
        &packet.timeout_height_on_b,
        &packet.timeout_timestamp_on_b,
    );
    route.verify_peer_entry(
        ctx_b,
        packet.seq_on_a,
        Path::Commitment(CommitmentPath::new(
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            packet.seq_on_a,
        )),
        Some(commitment.into_vec()),
        msg.proof_height_on_a,
        &msg.proof_commitment_on_a,
    )
}

pub fn recv_packet_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgRecvPacket,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let MsgRecvPacket { packet, signer, .. } = msg;
    let route = ChannelRoute::load(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    let (extras, acknowledgement) = module.on_recv_packet_execute(&packet, &signer);

    match route.ordering() {
        Order::Ordered => ctx_b.store_next_sequence_recv(
            &SeqRecvPath::new(&route.port_id, &route.chan_id),
            packet.seq_on_a.increment(),
        )?,
        Order::Unordered => ctx_b.store_packet_receipt(
            &ReceiptPath::new(&route.port_id, &route.chan_id, packet.seq_on_a),
            Receipt::Ok,
        )?,
    }
    ctx_b.store_packet_acknowledgement(
        &AckPath::new(&route.port_id, &route.chan_id, packet.seq_on_a),
        compute_ack_commitment(&acknowledgement),
    )?;

    ctx_b.log_message(format!("success: packet receive: {packet}"))?;
    let received = ReceivePacket::new(packet.clone(), route.ordering(), route.conn_id.clone());
    let written = WriteAcknowledgement::new(packet, acknowledgement, route.conn_id.clone());
    record(
        ctx_b,
        "success: packet write acknowledgement".to_string(),
        [
            IbcEvent::ReceivePacket(received),
            IbcEvent::WriteAcknowledgement(written),
        ],
        extras,
    )
}

/// Expired packets may only be timed out on the sending chain.
fn verify_not_expired<Ctx>(ctx_b: &Ctx, packet: &Packet) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let host_height = ctx_b.host_height()?;
    let host_timestamp = ctx_b.host_timestamp()?;
    if !packet.timed_out(&host_timestamp, host_height) {
        return Ok(());
    }

    tracing::debug!(%packet, %host_height, %host_timestamp, "rejecting timed out packet");
    Err(PacketError::TimeoutElapsed {
        timeout_height: packet.timeout_height_on_b,
        timeout_timestamp: packet.timeout_timestamp_on_b,
        chain_height: host_height,
        chain_timestamp: host_timestamp,
    }
    .into())
}

/// Ordered ends take exactly their `nextSequenceRecv`. Unordered ends take
/// any sequence they hold no receipt for. Either way no acknowledgement may
/// have been written for it yet.
fn verify_fresh<Ctx>(ctx_b: &Ctx, route: &ChannelRoute, packet: &Packet) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    let seq = packet.seq_on_a;
    match route.ordering() {
        Order::Ordered => {
            let expected =
                ctx_b.get_next_sequence_recv(&SeqRecvPath::new(&route.port_id, &route.chan_id))?;
            if seq != expected {
                return Err(PacketError::PacketSequenceOutOfOrder {
                    expected,
                    actual: seq,
                }
                .into());
            }
        }
        Order::Unordered => {
            let receipt = ReceiptPath::new(&route.port_id, &route.chan_id, seq);
            if ctx_b.get_packet_receipt(&receipt).is_ok() {
                return Err(PacketError::PacketAlreadyReceived(seq).into());
            }
        }
    }

    let ack = AckPath::new(&route.port_id, &route.chan_id, seq);
    if ctx_b.get_packet_acknowledgement(&ack).is_ok() {
        return Err(PacketError::DuplicateAcknowledgement(seq).into());
    }
    Ok(())
}
