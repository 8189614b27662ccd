//! Protocol logic specific to processing messages of type
//! `MsgUpgradeClient`.

use interlink_core_client_context::prelude::*;
use interlink_core_client_types::events::UpgradeClient;
use interlink_core_client_types::msgs::MsgUpgradeClient;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::IbcEvent;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;

use super::{active_client, record};

/// The upgraded states must be committed by the counterparty under its
/// upgrade path at the height the client last trusted.
pub fn validate<Ctx>(ctx: &Ctx, msg: MsgUpgradeClient) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    let client_ctx = ctx.get_client_validation_context();
    active_client(client_ctx, &msg.client_id)?.verify_upgrade_client(
        client_ctx,
        &msg.client_id,
        msg.upgraded_client_state,
        msg.upgraded_consensus_state,
        msg.proof_upgrade_client,
        msg.proof_upgrade_consensus_state,
    )?;

    Ok(())
}

pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgUpgradeClient) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let MsgUpgradeClient {
        client_id,
        upgraded_client_state,
        upgraded_consensus_state,
        ..
    } = msg;

    let client_ctx = ctx.get_client_execution_context();
    let client_state = client_ctx.client_state_mut(&client_id)?;
    let height = client_state.update_state_on_upgrade(
        client_ctx,
        &client_id,
        upgraded_client_state,
        upgraded_consensus_state,
    )?;

    let upgraded = UpgradeClient::new(client_id.clone(), client_state.client_type(), height);
    record(
        ctx,
        IbcEvent::UpgradeClient(upgraded),
        format!("success: client {client_id} upgraded to height {height}"),
    )
}
