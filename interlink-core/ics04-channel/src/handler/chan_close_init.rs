//! Protocol logic specific to processing messages of type
//! `MsgChannelCloseInit`.

use interlink_core_channel_types::channel::State;
use interlink_core_channel_types::events::CloseInit;
use interlink_core_channel_types::msgs::MsgChannelCloseInit;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_primitives::prelude::*;

use super::{record, ChannelRoute};

pub fn chan_close_init_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelCloseInit,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let route = ChannelRoute::load(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;
    route.end.verify_not_closed()?;
    route.require_open_connection()?;
    route.require_active_client(ctx_a)?;

    module.on_chan_close_init_validate(&msg.port_id_on_a, &msg.chan_id_on_a)?;

    Ok(())
}

/// Closes A's end for good. Nothing is proven: either side may close
/// unilaterally.
pub fn chan_close_init_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgChannelCloseInit,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let route = ChannelRoute::load(ctx_a, &msg.port_id_on_a, &msg.chan_id_on_a)?;
    let extras = module.on_chan_close_init_execute(&msg.port_id_on_a, &msg.chan_id_on_a)?;

    route.store_state(ctx_a, State::Closed)?;

    let event = CloseInit::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        route.peer_port_id().clone(),
        route.end.counterparty().channel_id().cloned(),
        route.conn_id.clone(),
    );
    record(
        ctx_a,
        "success: channel close init".to_string(),
        [IbcEvent::CloseInitChannel(event)],
        extras,
    )
}
