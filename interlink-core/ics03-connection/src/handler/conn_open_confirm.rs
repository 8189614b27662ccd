//! Protocol logic specific to processing messages of type
//! `MsgConnectionOpenConfirm`.

use interlink_core_connection_types::events::{ConnectionHandshake, HandshakeStep};
use interlink_core_connection_types::msgs::MsgConnectionOpenConfirm;
use interlink_core_connection_types::State;
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::types::path::ConnectionPath;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;

use super::{mirrored_end, peer_connection_id, record_step, PeerProofs};

pub fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgConnectionOpenConfirm) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let end = ctx_b.connection_end(&msg.conn_id_on_b)?;
    end.verify_state_matches(&State::TryOpen)?;

    let open_on_a = mirrored_end(
        &end,
        &msg.conn_id_on_b,
        State::Open,
        end.versions().to_vec(),
        ctx_b.commitment_prefix(),
    )?;
    PeerProofs::new(
        ctx_b,
        end.client_id(),
        end.counterparty().prefix(),
        msg.proof_height_on_a,
    )
    .connection(
        peer_connection_id(&end)?,
        &open_on_a,
        &msg.proof_conn_end_on_a,
    )?;

    Ok(())
}

pub fn execute<Ctx>(ctx_b: &mut Ctx, msg: &MsgConnectionOpenConfirm) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let mut end = ctx_b.connection_end(&msg.conn_id_on_b)?;
    let event = ConnectionHandshake::with_counterparty(
        HandshakeStep::OpenConfirm,
        msg.conn_id_on_b.clone(),
        end.client_id().clone(),
        peer_connection_id(&end)?.clone(),
        end.counterparty().client_id().clone(),
    );

    end.set_state(State::Open);
    ctx_b.store_connection(&ConnectionPath::new(&msg.conn_id_on_b), end)?;

    record_step(
        ctx_b,
        event,
        "success: conn_open_confirm verification passed".to_string(),
    )
}
