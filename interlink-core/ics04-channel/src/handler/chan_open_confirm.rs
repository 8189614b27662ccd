//! Protocol logic specific to processing messages of type
//! `MsgChannelOpenConfirm`.

use interlink_core_channel_types::channel::State;
use interlink_core_channel_types::events::OpenConfirm;
use interlink_core_channel_types::msgs::MsgChannelOpenConfirm;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

pub fn chan_open_confirm_validate<ValCtx>(
    ctx_b: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelOpenConfirm,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let route = ChannelRoute::load(ctx_b, &msg.port_id_on_b, &msg.chan_id_on_b)?;
    route.end.verify_state_matches(&State::TryOpen)?;
    route.require_open_connection()?;

    let open_on_a = route.mirrored_end(State::Open, route.end.version().clone())?;
    route.verify_peer_end(
        ctx_b,
        route.peer_chan_id()?,
        &open_on_a,
        msg.proof_height_on_a,
        &msg.proof_chan_end_on_a,
    )?;

    module.on_chan_open_confirm_validate(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    Ok(())
}

pub fn chan_open_confirm_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelOpenConfirm,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let route = ChannelRoute::load(ctx_b, &msg.port_id_on_b, &msg.chan_id_on_b)?;
    let extras = module.on_chan_open_confirm_execute(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    route.store_state(ctx_b, State::Open)?;

    let event = OpenConfirm::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        route.peer_port_id().clone(),
        route.peer_chan_id()?.clone(),
        route.conn_id.clone(),
    );
    record(
        ctx_b,
        "success: channel open confirm".to_string(),
        [IbcEvent::OpenConfirmChannel(event)],
        extras,
    )
}
