//! Protocol logic specific to processing messages of type `MsgTimeout`, and
//! the execution shared with `MsgTimeoutOnClose`.

use interlink_core_channel_types::channel::{Order, State};
use interlink_core_channel_types::error::PacketError;
use interlink_core_channel_types::events::{ChannelClosed, TimeoutPacket};
use interlink_core_channel_types::msgs::{MsgTimeout, MsgTimeoutOnClose};
use interlink_core_channel_types::packet::Packet;
use interlink_core_client::context::prelude::*;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::path::{ClientConsensusStatePath, CommitmentPath};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;
use interlink_primitives::Signer;

use super::{record, timeout_on_close, ChannelRoute};

pub enum TimeoutMsgType {
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
}

impl TimeoutMsgType {
    fn into_packet_and_signer(self) -> (Packet, Signer) {
        match self {
            Self::Timeout(msg) => (msg.packet, msg.signer),
            Self::TimeoutOnClose(msg) => (msg.packet, msg.signer),
        }
    }
}

pub fn timeout_packet_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    timeout_msg_type: TimeoutMsgType,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    match &timeout_msg_type {
        TimeoutMsgType::Timeout(msg) => validate(ctx_a, msg)?,
        TimeoutMsgType::TimeoutOnClose(msg) => timeout_on_close::validate(ctx_a, msg)?,
    }

    let (packet, signer) = timeout_msg_type.into_packet_and_signer();
    module
        .on_timeout_packet_validate(&packet, &signer)
        .map_err(ContextError::PacketError)
}

/// Retires a packet that will never be received. An ordered end cannot skip
/// a sequence, so it closes along with the packet.
pub fn timeout_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    timeout_msg_type: TimeoutMsgType,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let (packet, signer) = timeout_msg_type.into_packet_and_signer();
    let route = ChannelRoute::load(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;

    let (extras, outcome) = module.on_timeout_packet_execute(&packet, &signer);
    outcome?;

    ctx_a.delete_packet_commitment(&CommitmentPath::new(
        &route.port_id,
        &route.chan_id,
        packet.seq_on_a,
    ))?;

    let mut events = vec![IbcEvent::TimeoutPacket(TimeoutPacket::new(
        packet.clone(),
        route.ordering(),
    ))];

    let closes = route.ordering() == Order::Ordered && *route.end.state() != State::Closed;
    if closes {
        route.store_state(ctx_a, State::Closed)?;
        ctx_a.log_message(format!(
            "success: ordered channel {} closed after timeout",
            route.chan_id
        ))?;
        events.push(IbcEvent::ChannelClosed(ChannelClosed::new(
            route.port_id.clone(),
            route.chan_id.clone(),
            route.peer_port_id().clone(),
            route.end.counterparty().channel_id().cloned(),
            route.conn_id.clone(),
            route.ordering(),
        )));
    }

    record(ctx_a, format!("success: packet timeout: {packet}"), events, extras)
}

/// A regular timeout proves the packet expired on B: B's consensus state at
/// the proof height is already past the packet's timeout.
fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgTimeout) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = ChannelRoute::for_packets(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;
    route.verify_in_flight(ctx_a, packet)?;
    route.require_active_client(ctx_a)?;

    let client_ctx = ctx_a.get_client_validation_context();
    let proof_height = msg.proof_height_on_b;
    client_ctx
        .client_state(route.client_id())?
        .validate_proof_height(proof_height)?;

    let timestamp_on_b = client_ctx
        .consensus_state(&ClientConsensusStatePath::new(
            route.client_id().clone(),
            proof_height.revision_number(),
            proof_height.revision_height(),
        ))?
        .timestamp();
    if !packet.timed_out(&timestamp_on_b, proof_height) {
        return Err(PacketError::TimeoutNotElapsed {
            timeout_height: packet.timeout_height_on_b,
            chain_height: proof_height,
            timeout_timestamp: packet.timeout_timestamp_on_b,
            chain_timestamp: timestamp_on_b,
        }
        .into());
    }

    route.verify_unreceived(
        ctx_a,
        packet,
        msg.next_seq_recv_on_b,
        proof_height,
        &msg.proof_unreceived_on_b,
    )
}
