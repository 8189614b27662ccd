//! Protocol logic specific to processing messages of type
//! `MsgChannelOpenTry`.

use interlink_core_channel_types::channel::{ChannelEnd, Counterparty, State};
use interlink_core_channel_types::events::OpenTry;
use interlink_core_channel_types::msgs::MsgChannelOpenTry;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::identifiers::ChannelId;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_core_router::types::module::ModuleId;
use interlink_primitives::prelude::*;

use super::chan_open_init::verify_negotiated;
use super::{record, store_new_channel, ChannelRoute};

pub fn chan_open_try_validate<ValCtx>(
    ctx_b: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelOpenTry,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let route = draft(ctx_b, &msg)?;
    route.require_open_connection()?;
    route
        .conn_end
        .version()?
        .verify_feature_supported(msg.ordering.to_string())?;

    // A must hold the INIT end that proposed this channel to us.
    let init_on_a = route.mirrored_end(State::Init, msg.version_supported_on_a.clone())?;
    route.verify_peer_end(
        ctx_b,
        &msg.chan_id_on_a,
        &init_on_a,
        msg.proof_height_on_a,
        &msg.proof_chan_end_on_a,
    )?;

    let selected = module.on_chan_open_try_validate(
        msg.ordering,
        &msg.connection_hops_on_b,
        &route.port_id,
        &route.chan_id,
        route.end.counterparty(),
        &msg.version_supported_on_a,
    )?;
    verify_negotiated(&msg.version_supported_on_a, &selected)?;

    Ok(())
}

/// Creates the channel end in state TRYOPEN with the version selected by the
/// module, and hands the channel capability to that module.
pub fn chan_open_try_execute<ExecCtx>(
    ctx_b: &mut ExecCtx,
    module_id: &ModuleId,
    module: &mut dyn Module,
    msg: MsgChannelOpenTry,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let mut route = draft(ctx_b, &msg)?;
    let (extras, selected) = module.on_chan_open_try_execute(
        msg.ordering,
        &msg.connection_hops_on_b,
        &route.port_id,
        &route.chan_id,
        route.end.counterparty(),
        &msg.version_supported_on_a,
    )?;
    verify_negotiated(&msg.version_supported_on_a, &selected)?;

    route.end.set_version(selected.clone());
    store_new_channel(ctx_b, &route, module_id, module)?;

    let event = OpenTry::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        msg.port_id_on_a,
        msg.chan_id_on_a,
        route.conn_id.clone(),
        selected,
    );
    record(
        ctx_b,
        format!("success: channel open try with channel identifier: {}", route.chan_id),
        [IbcEvent::OpenTryChannel(event)],
        extras,
    )
}

/// Routes the TRYOPEN end the message would create under the next channel
/// identifier, already paired with A's channel.
fn draft<Ctx>(ctx_b: &Ctx, msg: &MsgChannelOpenTry) -> Result<ChannelRoute, ContextError>
where
    Ctx: ValidationContext,
{
    msg.verify_connection_hops_length()?;
    let end = ChannelEnd::new(
        State::TryOpen,
        msg.ordering,
        Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
        msg.connection_hops_on_b.clone(),
        msg.version_supported_on_a.clone(),
    )?;
    let chan_id = ChannelId::new(ctx_b.channel_counter()?);
    ChannelRoute::over(ctx_b, msg.port_id_on_b.clone(), chan_id, end)
}
