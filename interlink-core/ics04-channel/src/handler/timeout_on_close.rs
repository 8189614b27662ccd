//! Protocol logic specific to processing messages of type
//! `MsgTimeoutOnClose`. Execution is shared with `MsgTimeout`, see
//! [`super::timeout`].

use interlink_core_channel_types::channel::State;
use interlink_core_channel_types::msgs::MsgTimeoutOnClose;
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::ValidationContext;

use super::ChannelRoute;

/// Unlike a regular timeout, the packet need not have expired: the closed
/// counterparty end guarantees it can never be received.
pub(crate) fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgTimeoutOnClose) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let route = ChannelRoute::load(ctx_a, &packet.port_id_on_a, &packet.chan_id_on_a)?;
    route.verify_in_flight(ctx_a, packet)?;

    let closed_on_b = route.mirrored_end(State::Closed, route.end.version().clone())?;
    route.verify_peer_end(
        ctx_a,
        &packet.chan_id_on_b,
        &closed_on_b,
        msg.proof_height_on_b,
        &msg.proof_close_on_b,
    )?;

    route.verify_unreceived(
        ctx_a,
        packet,
        msg.next_seq_recv_on_b,
        msg.proof_height_on_b,
        &msg.proof_unreceived_on_b,
    )
}
