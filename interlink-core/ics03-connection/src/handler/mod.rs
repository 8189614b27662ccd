//! Connection handshake handlers.
//!
//! Besides the counterparty's connection end, `OpenTry` and `OpenAck` check
//! that the counterparty tracks this host faithfully: its client of this
//! chain must describe this chain, and the consensus state it recorded must
//! be the one this host produced at that height.

use interlink_core_client::context::prelude::*;
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::{CommitmentPrefix, CommitmentProofBytes};
use interlink_core_connection_types::error::ConnectionError;
use interlink_core_connection_types::events::ConnectionHandshake;
use interlink_core_connection_types::version::Version;
use interlink_core_connection_types::{ConnectionEnd, Counterparty, State};
use interlink_core_handler_types::error::ContextError;
use interlink_core_handler_types::events::{IbcEvent, MessageEvent};
use interlink_core_host::types::identifiers::{ClientId, ConnectionId};
use interlink_core_host::types::path::{
    ClientConnectionPath, ClientConsensusStatePath, ClientStatePath, ConnectionPath, Path,
};
use interlink_core_host::{ExecutionContext, ValidationContext};
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, Any};

pub mod conn_open_ack;
pub mod conn_open_confirm;
pub mod conn_open_init;
pub mod conn_open_try;

/// Proofs about the counterparty store, checked through the local client
/// `client_id` at `height`. Handshake proofs carry no delay.
pub(crate) struct PeerProofs<'a, Ctx> {
    ctx: &'a Ctx,
    client_id: &'a ClientId,
    prefix: &'a CommitmentPrefix,
    height: Height,
}

impl<'a, Ctx> PeerProofs<'a, Ctx>
where
    Ctx: ValidationContext,
{
    pub fn new(
        ctx: &'a Ctx,
        client_id: &'a ClientId,
        prefix: &'a CommitmentPrefix,
        height: Height,
    ) -> Self {
        Self {
            ctx,
            client_id,
            prefix,
            height,
        }
    }

    fn verify(
        &self,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        let client_ctx = self.ctx.get_client_validation_context();
        client_ctx.client_state(self.client_id)?.verify_membership_at_height(
            client_ctx,
            self.client_id,
            self.height,
            &DelayPeriod::none(),
            self.prefix,
            proof,
            path,
            value,
        )
    }

    /// The counterparty stores `expected` under `conn_id`.
    pub fn connection(
        &self,
        conn_id: &ConnectionId,
        expected: &ConnectionEnd,
        proof: &CommitmentProofBytes,
    ) -> Result<(), ConnectionError> {
        self.verify(
            proof,
            Path::Connection(ConnectionPath::new(conn_id)),
            encode_to_vec(expected),
        )
        .map_err(ConnectionError::ConnectionVerificationFailure)
    }

    /// The counterparty's client `host_client_id` holds `client_state`, and
    /// its consensus state at `consensus_height` is this host's own.
    pub fn host_tracking(
        &self,
        host_client_id: &ClientId,
        client_state: &Any,
        proof_client_state: &CommitmentProofBytes,
        consensus_height: Height,
        proof_consensus_state: &CommitmentProofBytes,
    ) -> Result<(), ContextError> {
        self.verify(
            proof_client_state,
            Path::ClientState(ClientStatePath::new(host_client_id.clone())),
            encode_to_vec(client_state),
        )
        .map_err(|client_error| ConnectionError::ClientStateVerificationFailure {
            client_id: host_client_id.clone(),
            client_error,
        })?;

        let own_consensus_state: Any = self.ctx.host_consensus_state(&consensus_height)?.into();
        self.verify(
            proof_consensus_state,
            Path::ClientConsensusState(ClientConsensusStatePath::new(
                host_client_id.clone(),
                consensus_height.revision_number(),
                consensus_height.revision_height(),
            )),
            encode_to_vec(&own_consensus_state),
        )
        .map_err(|client_error| ConnectionError::ConsensusStateVerificationFailure {
            height: self.height,
            client_error,
        })?;
        Ok(())
    }
}

/// The client state a counterparty keeps of this host must describe this
/// chain, and may not claim a consensus height the host has not reached.
pub(crate) fn verify_host_client<Ctx>(
    ctx: &Ctx,
    client_state: Any,
    consensus_height: Height,
) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
    <Ctx::HostClientState as TryFrom<Any>>::Error: Into<ClientError>,
{
    let host_height = ctx.host_height()?;
    if consensus_height > host_height {
        return Err(ConnectionError::InvalidConsensusHeight {
            target_height: consensus_height,
            current_height: host_height,
        }
        .into());
    }

    let client_state =
        Ctx::HostClientState::try_from(client_state).map_err(Into::<ClientError>::into)?;
    ctx.validate_self_client(client_state)
}

/// The end the counterparty holds for the connection `local` describes,
/// once it reached `state` with `versions`. An INIT end has not learnt our
/// connection identifier.
pub(crate) fn mirrored_end(
    local: &ConnectionEnd,
    local_id: &ConnectionId,
    state: State,
    versions: Vec<Version>,
    host_prefix: CommitmentPrefix,
) -> Result<ConnectionEnd, ConnectionError> {
    let known_id = (state != State::Init).then(|| local_id.clone());
    ConnectionEnd::new(
        state,
        local.counterparty().client_id().clone(),
        Counterparty::new(local.client_id().clone(), known_id, host_prefix),
        versions,
        local.delay_period(),
    )
}

pub(crate) fn peer_connection_id(end: &ConnectionEnd) -> Result<&ConnectionId, ConnectionError> {
    end.counterparty()
        .connection_id()
        .ok_or(ConnectionError::InvalidCounterparty)
}

/// Stores a connection end created by `OpenInit` or `OpenTry` under the
/// next identifier and indexes it by its client.
pub(crate) fn store_new_connection<Ctx>(
    ctx: &mut Ctx,
    conn_id: &ConnectionId,
    end: ConnectionEnd,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    ctx.increase_connection_counter()?;
    ctx.store_connection_to_client(
        &ClientConnectionPath::new(end.client_id().clone()),
        conn_id.clone(),
    )?;
    ctx.store_connection(&ConnectionPath::new(conn_id), end)
}

pub(crate) fn record_step<Ctx>(
    ctx: &mut Ctx,
    event: ConnectionHandshake,
    summary: String,
) -> Result<(), ContextError>
where
    Ctx: ExecutionContext,
{
    ctx.emit_ibc_event(IbcEvent::Message(MessageEvent::Connection))?;
    ctx.emit_ibc_event(IbcEvent::ConnectionHandshake(event))?;
    ctx.log_message(summary)
}
