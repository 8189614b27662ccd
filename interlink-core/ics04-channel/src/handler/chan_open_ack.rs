//! Protocol logic specific to processing messages of type
//! `MsgChannelOpenAck`.

use interlink_core_channel_types::channel::State;
use interlink_core_channel_types::events::OpenAck;
use interlink_core_channel_types::msgs::MsgChannelOpenAck;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

pub fn chan_open_ack_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelOpenAck,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let route = ChannelRoute::load(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;
    route.end.verify_state_matches(&State::Init)?;
    route.require_open_connection()?;

    // B answered with a TRYOPEN end carrying the version it selected.
    let try_on_b = route.mirrored_end(State::TryOpen, msg.version_on_b.clone())?;
    route.verify_peer_end(
        ctx_a,
        &msg.chan_id_on_b,
        &try_on_b,
        msg.proof_height_on_b,
        &msg.proof_chan_end_on_b,
    )?;

    module.on_chan_open_ack_validate(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.version_on_b)?;

    Ok(())
}

/// Opens A's end, adopting B's channel identifier and selected version.
pub fn chan_open_ack_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelOpenAck,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let route = ChannelRoute::load(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;
    let extras =
        module.on_chan_open_ack_execute(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.version_on_b)?;

    let mut opened = route.end.clone();
    opened.set_state(State::Open);
    opened.set_version(msg.version_on_b);
    opened.set_counterparty_channel_id(msg.chan_id_on_b.clone());
    ctx_a.store_channel(&route.path(), opened)?;

    let event = OpenAck::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        route.peer_port_id().clone(),
        msg.chan_id_on_b,
        route.conn_id.clone(),
    );
    record(
        ctx_a,
        "success: channel open ack".to_string(),
        [IbcEvent::OpenAckChannel(event)],
        extras,
    )
}
