//! Protocol logic specific to messages of type `MsgConnectionOpenInit`.

use interlink_core_client::context::prelude::*;
use interlink_core_connection_types::events::ConnectionHandshake;
use interlink_core_connection_types::msgs::MsgConnectionOpenInit;
use interlink_core_connection_types::version::Version;
use interlink_core_connection_types::{ConnectionEnd, Counterparty, State};
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::types::identifiers::ConnectionId;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;

use super::{record_step, store_new_connection};

pub fn validate<Ctx>(ctx_a: &Ctx, msg: MsgConnectionOpenInit) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    // The client tracking the counterparty must exist and be usable.
    let client_ctx = ctx_a.get_client_validation_context();
    client_ctx
        .client_state(&msg.client_id_on_a)?
        .status(client_ctx, &msg.client_id_on_a)?
        .verify_is_active()?;

    msg.counterparty.verify_empty_connection_id()?;
    offered_versions(ctx_a, msg.version)?;

    Ok(())
}

pub fn execute<Ctx>(ctx_a: &mut Ctx, msg: MsgConnectionOpenInit) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let MsgConnectionOpenInit {
        client_id_on_a,
        counterparty,
        version,
        delay_period,
        ..
    } = msg;

    let conn_id_on_a = ConnectionId::new(ctx_a.connection_counter()?);
    let client_id_on_b = counterparty.client_id().clone();
    let end = ConnectionEnd::new(
        State::Init,
        client_id_on_a.clone(),
        Counterparty::new(client_id_on_b.clone(), None, counterparty.prefix().clone()),
        offered_versions(ctx_a, version)?,
        delay_period,
    )?;
    store_new_connection(ctx_a, &conn_id_on_a, end)?;

    record_step(
        ctx_a,
        ConnectionHandshake::open_init(conn_id_on_a.clone(), client_id_on_a, client_id_on_b),
        format!("success: conn_open_init: generated new connection identifier: {conn_id_on_a}"),
    )
}

/// An INIT end offers the version the relayer asked for, provided the host
/// supports it, and every compatible version otherwise.
fn offered_versions<Ctx>(ctx_a: &Ctx, requested: Option<Version>) -> Result<Vec<Version>, ContextError>
where
    Ctx: ValidationContext,
{
    let compatible = ctx_a.get_compatible_versions();
    match requested {
        Some(version) => {
            version.verify_is_supported(&compatible)?;
            Ok(vec![version])
        }
        None => Ok(compatible),
    }
}
