//! Processing logic for client messages.
//!
//! Every handler here resolves the light client a message targets through
//! the host's client context and, once the client has accepted the message,
//! reports the outcome as a single client event.

use interlink_core_client_context::prelude::*;
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::{IbcEvent, MessageEvent};
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::ExecutionContext;
use interlink_primitives::prelude::*;

pub mod create_client;
pub mod update_client;
pub mod upgrade_client;

/// Loads the stored state of `client_id`, failing unless the client is
/// active. Frozen and expired clients accept no further messages.
pub(crate) fn active_client<V>(client_ctx: &V, client_id: &ClientId) -> Result<V::ClientStateRef, ContextError>
where
    V: ClientValidationContext,
{
    let client_state = client_ctx.client_state(client_id)?;
    client_state
        .status(client_ctx, client_id)?
        .verify_is_active()?;
    Ok(client_state)
}

pub(crate) fn record<Ctx>(ctx: &mut Ctx, event: IbcEvent, summary: String) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Client))?;
    ctx.emit_ibc_event(event)?;
    ctx.log_message(summary)
}
