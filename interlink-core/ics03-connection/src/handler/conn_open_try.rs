//! Protocol logic specific to processing messages of type
//! `MsgConnectionOpenTry`.

use interlink_core_client::types::error::ClientError;
use interlink_core_connection_types::error::ConnectionError;
use interlink_core_connection_types::events::{ConnectionHandshake, HandshakeStep};
use interlink_core_connection_types::msgs::MsgConnectionOpenTry;
use interlink_core_connection_types::{ConnectionEnd, State};
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::types::identifiers::ConnectionId;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use super::{
    mirrored_end, record_step, store_new_connection, verify_host_client, PeerProofs,
};

pub fn validate<Ctx>(ctx_b: &Ctx, msg: MsgConnectionOpenTry) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    verify_host_client(
        ctx_b,
        msg.client_state_of_b_on_a.clone(),
        msg.consensus_height_of_b_on_a,
    )?;

    let draft = TryDraft::new(ctx_b, &msg)?;
    let init_on_a = mirrored_end(
        &draft.end,
        &draft.conn_id_on_b,
        State::Init,
        msg.versions_on_a.clone(),
        ctx_b.commitment_prefix(),
    )?;

    let proofs = PeerProofs::new(
        ctx_b,
        &msg.client_id_on_b,
        msg.counterparty.prefix(),
        msg.proofs_height_on_a,
    );
    proofs.connection(&draft.conn_id_on_a, &init_on_a, &msg.proof_conn_end_on_a)?;
    proofs.host_tracking(
        msg.counterparty.client_id(),
        &msg.client_state_of_b_on_a,
        &msg.proof_client_state_of_b_on_a,
        msg.consensus_height_of_b_on_a,
        &msg.proof_consensus_state_of_b_on_a,
    )
}

pub fn execute<Ctx>(ctx_b: &mut Ctx, msg: MsgConnectionOpenTry) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let TryDraft {
        conn_id_on_b,
        end,
        conn_id_on_a,
    } = TryDraft::new(ctx_b, &msg)?;
    let client_id_on_a = end.counterparty().client_id().clone();

    store_new_connection(ctx_b, &conn_id_on_b, end)?;

    record_step(
        ctx_b,
        ConnectionHandshake::with_counterparty(
            HandshakeStep::OpenTry,
            conn_id_on_b.clone(),
            msg.client_id_on_b,
            conn_id_on_a,
            client_id_on_a,
        ),
        format!("success: conn_open_try: generated new connection identifier: {conn_id_on_b}"),
    )
}

/// The TRYOPEN end the message creates under the next identifier, holding
/// the single version picked out of A's offer.
struct TryDraft {
    conn_id_on_b: ConnectionId,
    end: ConnectionEnd,
    conn_id_on_a: ConnectionId,
}

impl TryDraft {
    fn new<Ctx>(ctx_b: &Ctx, msg: &MsgConnectionOpenTry) -> Result<Self, ContextError>
    where
        Ctx: ValidationContext,
    {
        let conn_id_on_a = msg
            .counterparty
            .connection_id()
            .cloned()
            .ok_or(ConnectionError::InvalidCounterparty)?;
        let picked = ctx_b.pick_version(&msg.versions_on_a)?;
        let end = ConnectionEnd::new(
            State::TryOpen,
            msg.client_id_on_b.clone(),
            msg.counterparty.clone(),
            vec![picked],
            msg.delay_period,
        )?;

        Ok(Self {
            conn_id_on_b: ConnectionId::new(ctx_b.connection_counter()?),
            end,
            conn_id_on_a,
        })
    }
}
