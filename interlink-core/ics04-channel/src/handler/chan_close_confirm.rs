//! Protocol logic specific to processing messages of type
//! `MsgChannelCloseConfirm`.

use interlink_core_channel_types::channel::State;
use interlink_core_channel_types::events::CloseConfirm;
use interlink_core_channel_types::msgs::MsgChannelCloseConfirm;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

pub fn chan_close_confirm_validate<ValCtx>(
    ctx_b: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelCloseConfirm,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let route = ChannelRoute::load(ctx_b, &msg.port_id_on_b, &msg.chan_id_on_b)?;
    route.end.verify_not_closed()?;
    route.require_open_connection()?;

    let closed_on_a = route.mirrored_end(State::Closed, route.end.version().clone())?;
    route.verify_peer_end(
        ctx_b,
        route.peer_chan_id()?,
        &closed_on_a,
        msg.proof_height_on_a,
        &msg.proof_chan_end_on_a,
    )?;

    module.on_chan_close_confirm_validate(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    Ok(())
}

pub fn chan_close_confirm_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelCloseConfirm,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let route = ChannelRoute::load(ctx_b, &msg.port_id_on_b, &msg.chan_id_on_b)?;
    let extras = module.on_chan_close_confirm_execute(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    route.store_state(ctx_b, State::Closed)?;

    let event = CloseConfirm::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        route.peer_port_id().clone(),
        route.end.counterparty().channel_id().cloned(),
        route.conn_id.clone(),
    );
    record(
        ctx_b,
        "success: channel close confirm".to_string(),
        [IbcEvent::CloseConfirmChannel(event)],
        extras,
    )
}
