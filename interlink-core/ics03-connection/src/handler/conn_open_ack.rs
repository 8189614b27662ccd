//! Protocol logic specific to processing messages of type
//! `MsgConnectionOpenAck`.

use interlink_core_client::types::error::ClientError;
use interlink_core_connection_types::events::{ConnectionHandshake, HandshakeStep};
use interlink_core_connection_types::msgs::MsgConnectionOpenAck;
use interlink_core_connection_types::State;
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::types::path::ConnectionPath;
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use super::{mirrored_end, record_step, verify_host_client, PeerProofs};

pub fn validate<Ctx>(ctx_a: &Ctx, msg: MsgConnectionOpenAck) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    verify_host_client(
        ctx_a,
        msg.client_state_of_a_on_b.clone(),
        msg.consensus_height_of_a_on_b,
    )?;

    let end = ctx_a.connection_end(&msg.conn_id_on_a)?;
    end.verify_state_matches(&State::Init)?;
    // B may only settle on a version this end offered.
    msg.version.verify_is_supported(end.versions())?;

    let try_on_b = mirrored_end(
        &end,
        &msg.conn_id_on_a,
        State::TryOpen,
        vec![msg.version.clone()],
        ctx_a.commitment_prefix(),
    )?;

    let peer = end.counterparty();
    let proofs = PeerProofs::new(ctx_a, end.client_id(), peer.prefix(), msg.proofs_height_on_b);
    proofs.connection(&msg.conn_id_on_b, &try_on_b, &msg.proof_conn_end_on_b)?;
    proofs.host_tracking(
        peer.client_id(),
        &msg.client_state_of_a_on_b,
        &msg.proof_client_state_of_a_on_b,
        msg.consensus_height_of_a_on_b,
        &msg.proof_consensus_state_of_a_on_b,
    )
}

/// Opens A's end with B's connection identifier and the version B picked.
pub fn execute<Ctx>(ctx_a: &mut Ctx, msg: MsgConnectionOpenAck) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    let mut end = ctx_a.connection_end(&msg.conn_id_on_a)?;
    let event = ConnectionHandshake::with_counterparty(
        HandshakeStep::OpenAck,
        msg.conn_id_on_a.clone(),
        end.client_id().clone(),
        msg.conn_id_on_b.clone(),
        end.counterparty().client_id().clone(),
    );

    let mut peer = end.counterparty().clone();
    peer.connection_id = Some(msg.conn_id_on_b);
    end.set_state(State::Open);
    end.set_version(msg.version);
    end.set_counterparty(peer);
    ctx_a.store_connection(&ConnectionPath::new(&msg.conn_id_on_a), end)?;

    record_step(
        ctx_a,
        event,
        "success: conn_open_ack verification passed".to_string(),
    )
}
