//! Protocol logic specific to processing messages of type `MsgCreateClient`.

use interlink_core_client_context::prelude::*;
use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::events::CreateClient;
use interlink_core_client_types::msgs::MsgCreateClient;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::{ClientStateMut, ClientStateRef, ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use super::record;

pub fn validate<Ctx>(ctx: &Ctx, msg: MsgCreateClient) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
    <ClientStateRef<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
{
    ctx.validate_message_signer(&msg.signer)?;

    let client_state = ClientStateRef::<Ctx>::try_from(msg.client_state)
        .map_err(Into::<ClientError>::into)?;
    let client_id = next_client_id(ctx, &client_state)?;
    let client_ctx = ctx.get_client_validation_context();

    // A client may not start out frozen, nor take over an existing identifier.
    if client_state.status(client_ctx, &client_id)?.is_frozen() {
        return Err(ClientError::ClientFrozen { client_id }.into());
    }
    client_state.verify_consensus_state(msg.consensus_state)?;
    if client_ctx.client_state(&client_id).is_ok() {
        return Err(ClientError::ClientStateAlreadyExists { client_id }.into());
    }

    Ok(())
}

pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgCreateClient) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
    <ClientStateMut<Ctx> as TryFrom<Any>>::Error: Into<ClientError>,
{
    let client_state = ClientStateMut::<Ctx>::try_from(msg.client_state)
        .map_err(Into::<ClientError>::into)?;
    let client_id = next_client_id(ctx, &client_state)?;

    client_state.initialise(
        ctx.get_client_execution_context(),
        &client_id,
        msg.consensus_state,
    )?;
    ctx.increase_client_counter()?;

    let created = CreateClient::new(
        client_id.clone(),
        client_state.client_type(),
        client_state.latest_height(),
    );
    record(
        ctx,
        IbcEvent::CreateClient(created),
        format!("success: generated new client identifier: {client_id}"),
    )
}

/// Identifiers are the client type followed by the number of clients the
/// host created so far.
fn next_client_id<Ctx, S>(ctx: &Ctx, client_state: &S) -> Result<ClientId, ContextError>
where
    Ctx: ValidationContext,
    S: ClientStateCommon,
{
    Ok(client_state
        .client_type()
        .build_client_id(ctx.client_counter()?))
}
