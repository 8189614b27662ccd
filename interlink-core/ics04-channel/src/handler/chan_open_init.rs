//! Protocol logic specific to processing messages of type
//! `MsgChannelOpenInit`.

use interlink_core_channel_types::channel::{ChannelEnd, Counterparty, State};
use interlink_core_channel_types::error::ChannelError;
use interlink_core_channel_types::events::OpenInit;
use interlink_core_channel_types::msgs::MsgChannelOpenInit;
use interlink_core_channel_types::Version;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::identifiers::ChannelId;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_core_router::module::Module;
use interlink_core_router::types::module::ModuleId;
use interlink_primitives::prelude::*;

use super::{record, store_new_channel, ChannelRoute};

pub fn chan_open_init_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgChannelOpenInit,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let route = draft(ctx_a, &msg)?;
    route.require_open_connection()?;
    route.require_active_client(ctx_a)?;
    route
        .conn_end
        .version()?
        .verify_feature_supported(msg.ordering.to_string())?;

    let selected = module.on_chan_open_init_validate(
        msg.ordering,
        &msg.connection_hops_on_a,
        &route.port_id,
        &route.chan_id,
        route.end.counterparty(),
        &msg.version_proposal,
    )?;
    verify_negotiated(&msg.version_proposal, &selected)?;

    Ok(())
}

/// Creates the channel end in state INIT and hands the channel capability
/// to the module registered under `module_id`.
pub fn chan_open_init_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module_id: &ModuleId,
    module: &mut dyn Module,
    msg: MsgChannelOpenInit,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let mut route = draft(ctx_a, &msg)?;
    let (extras, selected) = module.on_chan_open_init_execute(
        msg.ordering,
        &msg.connection_hops_on_a,
        &route.port_id,
        &route.chan_id,
        route.end.counterparty(),
        &msg.version_proposal,
    )?;
    verify_negotiated(&msg.version_proposal, &selected)?;

    route.end.set_version(selected.clone());
    store_new_channel(ctx_a, &route, module_id, module)?;

    let event = OpenInit::new(
        route.port_id.clone(),
        route.chan_id.clone(),
        msg.port_id_on_b,
        route.conn_id.clone(),
        selected,
    );
    record(
        ctx_a,
        format!("success: channel open init with channel identifier: {}", route.chan_id),
        [IbcEvent::OpenInitChannel(event)],
        extras,
    )
}

/// Routes the end the message would create under the next channel
/// identifier. The counterparty channel is unknown until the ack.
fn draft<Ctx>(ctx_a: &Ctx, msg: &MsgChannelOpenInit) -> Result<ChannelRoute, ContextError>
where
    Ctx: ValidationContext,
{
    msg.verify_connection_hops_length()?;
    let end = ChannelEnd::new(
        State::Init,
        msg.ordering,
        Counterparty::new(msg.port_id_on_b.clone(), None),
        msg.connection_hops_on_a.clone(),
        msg.version_proposal.clone(),
    )?;
    let chan_id = ChannelId::new(ctx_a.channel_counter()?);
    ChannelRoute::over(ctx_a, msg.port_id_on_a.clone(), chan_id, end)
}

/// The module must settle on a non-empty version.
pub(crate) fn verify_negotiated(proposed: &Version, selected: &Version) -> Result<(), ChannelError> {
    if selected.is_empty() {
        return Err(ChannelError::VersionNegotiationFailed {
            proposed: proposed.clone(),
        });
    }
    Ok(())
}
