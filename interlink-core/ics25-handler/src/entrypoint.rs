//! Message dispatch.
//!
//! A transaction carrying messages `m_1 .. m_n` must run them as
//! `validate(m_1), execute(m_1), .., validate(m_n), execute(m_n)`: each
//! message is validated against the state the previous one left behind.
//! [`dispatch`] does exactly that for one message.

use interlink_core_channel::handler::acknowledgement::{
    acknowledgement_packet_execute, acknowledgement_packet_validate,
};
use interlink_core_channel::handler::chan_close_confirm::{
    chan_close_confirm_execute, chan_close_confirm_validate,
};
use interlink_core_channel::handler::chan_close_init::{
    chan_close_init_execute, chan_close_init_validate,
};
use interlink_core_channel::handler::chan_open_ack::{chan_open_ack_execute, chan_open_ack_validate};
use interlink_core_channel::handler::chan_open_confirm::{
    chan_open_confirm_execute, chan_open_confirm_validate,
};
use interlink_core_channel::handler::chan_open_init::{
    chan_open_init_execute, chan_open_init_validate,
};
use interlink_core_channel::handler::chan_open_try::{chan_open_try_execute, chan_open_try_validate};
use interlink_core_channel::handler::recv_packet::{recv_packet_execute, recv_packet_validate};
use interlink_core_channel::handler::timeout::{
    timeout_packet_execute, timeout_packet_validate, TimeoutMsgType,
};
use interlink_core_channel::types::msgs::{ChannelMsg, PacketMsg};
use interlink_core_client::handler::{create_client, update_client, upgrade_client};
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::msgs::ClientMsg;
use interlink_core_connection::handler::{
    conn_open_ack, conn_open_confirm, conn_open_init, conn_open_try,
};
use interlink_core_connection::types::msgs::ConnectionMsg;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::msgs::MsgEnvelope;
use interlink_core_host::types::identifiers::{ChannelId, PortId};
use interlink_core_host::{ClientStateMut, ClientStateRef, ExecutionContext, ValidationContext};
use interlink_core_router::router::Router;
use interlink_core_router::types::error::RouterError;
use interlink_core_router::types::module::ModuleId;
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

/// Validates `msg` and, if it is accepted, applies it.
pub fn dispatch<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
    <ClientStateRef<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
    <ClientStateMut<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    validate(ctx, router, msg.clone())?;
    execute(ctx, router, msg)
}

/// Decodes a raw datagram and dispatches it.
pub fn dispatch_any<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    any_msg: Any,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
    <ClientStateRef<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
    <ClientStateMut<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    dispatch(ctx, router, MsgEnvelope::try_from(any_msg)?)
}

/// Runs every check `msg` is subject to without touching the store.
pub fn validate<Ctx>(ctx: &Ctx, router: &impl Router, msg: MsgEnvelope) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
    <ClientStateRef<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    tracing::debug!(type_url = %msg.to_any().type_url, "validating datagram");

    match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::validate(ctx, msg),
            ClientMsg::UpgradeClient(msg) => upgrade_client::validate(ctx, msg),
            ClientMsg::UpdateClient(msg) => update_client::validate(ctx, msg.into()),
            ClientMsg::Misbehaviour(msg) => update_client::validate(ctx, msg.into()),
        },
        MsgEnvelope::Connection(msg) => match msg {
            ConnectionMsg::OpenInit(msg) => conn_open_init::validate(ctx, msg),
            ConnectionMsg::OpenTry(msg) => conn_open_try::validate(ctx, msg),
            ConnectionMsg::OpenAck(msg) => conn_open_ack::validate(ctx, msg),
            ConnectionMsg::OpenConfirm(msg) => conn_open_confirm::validate(ctx, &msg),
        },
        MsgEnvelope::Channel(msg) => {
            let (port_id, chan_id) = msg.local_end();
            let module_id = owning_module(ctx, router, port_id, chan_id)?;
            let module = router
                .get_route(&module_id)
                .ok_or_else(|| missing_module(&module_id))?;

            match msg {
                ChannelMsg::OpenInit(msg) => chan_open_init_validate(ctx, module, msg),
                ChannelMsg::OpenTry(msg) => chan_open_try_validate(ctx, module, msg),
                ChannelMsg::OpenAck(msg) => chan_open_ack_validate(ctx, module, msg),
                ChannelMsg::OpenConfirm(msg) => chan_open_confirm_validate(ctx, module, msg),
                ChannelMsg::CloseInit(msg) => chan_close_init_validate(ctx, module, msg),
                ChannelMsg::CloseConfirm(msg) => chan_close_confirm_validate(ctx, module, msg),
            }
        }
        MsgEnvelope::Packet(msg) => {
            let (port_id, chan_id) = msg.local_end();
            let module_id = owning_module(ctx, router, port_id, Some(chan_id))?;
            let module = router
                .get_route(&module_id)
                .ok_or_else(|| missing_module(&module_id))?;

            match msg {
                PacketMsg::Recv(msg) => recv_packet_validate(ctx, msg),
                PacketMsg::Ack(msg) => acknowledgement_packet_validate(ctx, module, msg),
                PacketMsg::Timeout(msg) => {
                    timeout_packet_validate(ctx, module, TimeoutMsgType::Timeout(msg))
                }
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_packet_validate(ctx, module, TimeoutMsgType::TimeoutOnClose(msg))
                }
            }
        }
    }
}

/// Applies a message that already passed [`validate`].
pub fn execute<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
    <ClientStateMut<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
{
    tracing::debug!(type_url = %msg.to_any().type_url, "executing datagram");

    match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::execute(ctx, msg),
            ClientMsg::UpgradeClient(msg) => upgrade_client::execute(ctx, msg),
            ClientMsg::UpdateClient(msg) => update_client::execute(ctx, msg.into()),
            ClientMsg::Misbehaviour(msg) => update_client::execute(ctx, msg.into()),
        },
        MsgEnvelope::Connection(msg) => match msg {
            ConnectionMsg::OpenInit(msg) => conn_open_init::execute(ctx, msg),
            ConnectionMsg::OpenTry(msg) => conn_open_try::execute(ctx, msg),
            ConnectionMsg::OpenAck(msg) => conn_open_ack::execute(ctx, msg),
            ConnectionMsg::OpenConfirm(msg) => conn_open_confirm::execute(ctx, &msg),
        },
        MsgEnvelope::Channel(msg) => {
            let module_id = bound_module(router, msg.local_end().0)?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or_else(|| missing_module(&module_id))?;

            match msg {
                ChannelMsg::OpenInit(msg) => chan_open_init_execute(ctx, &module_id, module, msg),
                ChannelMsg::OpenTry(msg) => chan_open_try_execute(ctx, &module_id, module, msg),
                ChannelMsg::OpenAck(msg) => chan_open_ack_execute(ctx, module, msg),
                ChannelMsg::OpenConfirm(msg) => chan_open_confirm_execute(ctx, module, msg),
                ChannelMsg::CloseInit(msg) => chan_close_init_execute(ctx, module, msg),
                ChannelMsg::CloseConfirm(msg) => chan_close_confirm_execute(ctx, module, msg),
            }
        }
        MsgEnvelope::Packet(msg) => {
            let module_id = bound_module(router, msg.local_end().0)?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or_else(|| missing_module(&module_id))?;

            match msg {
                PacketMsg::Recv(msg) => recv_packet_execute(ctx, module, msg),
                PacketMsg::Ack(msg) => acknowledgement_packet_execute(ctx, module, msg),
                PacketMsg::Timeout(msg) => {
                    timeout_packet_execute(ctx, module, TimeoutMsgType::Timeout(msg))
                }
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_packet_execute(ctx, module, TimeoutMsgType::TimeoutOnClose(msg))
                }
            }
        }
    }
}

fn bound_module(router: &impl Router, port_id: &PortId) -> Result<ModuleId, RouterError> {
    router
        .lookup_module(port_id)
        .ok_or_else(|| RouterError::UnknownPort {
            port_id: port_id.clone(),
        })
}

/// The module bound to `port_id`. On an existing channel it must also hold
/// the channel's capability.
fn owning_module<Ctx>(
    ctx: &Ctx,
    router: &impl Router,
    port_id: &PortId,
    chan_id: Option<&ChannelId>,
) -> Result<ModuleId, ContextError>
where
    Ctx: ValidationContext,
{
    let module_id = bound_module(router, port_id)?;
    if let Some(chan_id) = chan_id {
        ctx.verify_channel_owner(port_id, chan_id, &module_id)?;
    }
    Ok(module_id)
}

fn missing_module(module_id: &ModuleId) -> RouterError {
    RouterError::MissingModule {
        module_id: module_id.to_string(),
    }
}
