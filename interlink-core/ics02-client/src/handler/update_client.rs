//! Protocol logic specific to processing `MsgUpdateClient` and
//! `MsgSubmitMisbehaviour`.

use interlink_core_client_context::prelude::*;
use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::events::{ClientMisbehaviour, UpdateClient};
use interlink_core_client_types::msgs::MsgUpdateOrMisbehaviour;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::encode_to_vec;
use interlink_primitives::prelude::*;

use super::{active_client, record};

pub fn validate<Ctx>(ctx: &Ctx, msg: MsgUpdateOrMisbehaviour) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(msg.signer())?;

    let client_id = msg.client_id().clone();
    let client_ctx = ctx.get_client_validation_context();
    active_client(client_ctx, &client_id)?.verify_client_message(
        client_ctx,
        &client_id,
        msg.client_message(),
    )?;

    Ok(())
}

/// A verified client message either proves misbehaviour, which freezes the
/// client, or advances it to the heights the header carries. Submitting
/// misbehaviour that the client does not recognise as such is an error.
pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgUpdateOrMisbehaviour) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let client_id = msg.client_id().clone();
    let claims_misbehaviour = matches!(msg, MsgUpdateOrMisbehaviour::Misbehaviour(_));
    let client_message = msg.client_message();

    let client_ctx = ctx.get_client_execution_context();
    let client_state = client_ctx.client_state_mut(&client_id)?;

    if client_state.check_for_misbehaviour(client_ctx, &client_id, client_message.clone())? {
        client_state.update_state_on_misbehaviour(client_ctx, &client_id, client_message)?;
        let frozen = ClientMisbehaviour::new(client_id.clone(), client_state.client_type());
        return record(
            ctx,
            IbcEvent::ClientMisbehaviour(frozen),
            format!("client {client_id} frozen on misbehaviour"),
        );
    }

    if claims_misbehaviour {
        return Err(ClientError::InvalidMisbehaviour {
            description: "misbehaviour submitted, but none found".to_string(),
        }
        .into());
    }

    let heights = client_state.update_state(client_ctx, &client_id, client_message.clone())?;
    if heights.is_empty() {
        return Err(ClientError::Other {
            description: "client update state returned no updated height".to_string(),
        }
        .into());
    }

    let updated = UpdateClient::new(
        client_id.clone(),
        client_state.client_type(),
        heights,
        encode_to_vec(&client_message),
    );
    record(
        ctx,
        IbcEvent::UpdateClient(updated),
        format!("success: client {client_id} updated"),
    )
}
