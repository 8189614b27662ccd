//! Relayer operations between two [`MockContext`]s.
//!
//! Every operation is written in one direction, from `A` to `B`, so that
//! variable names follow the message fields. For the opposite direction,
//! swap the contexts.
//!
//! Proofs are always taken at the latest height of the source chain, which
//! the client on the destination chain must already trust: operations that
//! carry proofs are preceded by a client update.

use core::time::Duration;

use interlink_clients::AnyClientState;
use interlink_core::channel::types::acknowledgement::Acknowledgement;
use interlink_core::channel::types::channel::{ChannelEnd, Order};
use interlink_core::channel::types::msgs::{
    ChannelMsg, MsgAcknowledgement, MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck,
    MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry, MsgRecvPacket, MsgTimeout,
    MsgTimeoutOnClose, PacketMsg,
};
use interlink_core::channel::types::packet::Packet;
use interlink_core::channel::types::Version as ChannelVersion;
use interlink_core::client::context::prelude::*;
use interlink_core::client::types::msgs::{ClientMsg, MsgCreateClient, MsgUpdateClient};
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::CommitmentProofBytes;
use interlink_core::connection::types::msgs::{
    ConnectionMsg, MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit,
    MsgConnectionOpenTry,
};
use interlink_core::connection::types::events::HandshakeStep;
use interlink_core::connection::types::version::Version as ConnectionVersion;
use interlink_core::connection::types::Counterparty as ConnectionCounterparty;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::handler::types::msgs::MsgEnvelope;
use interlink_core::host::types::identifiers::{ChannelId, ClientId, ConnectionId, PortId, Sequence};
use interlink_core::host::types::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, ClientStatePath, CommitmentPath,
    ConnectionPath, ReceiptPath, SeqRecvPath,
};
use interlink_core::host::ValidationContext;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{Any, Signer};

use crate::context::MockContext;
use crate::fixtures::clients::headerchain::ClientStateConfig;
use crate::relayer::error::RelayerError;

fn missing_event(name: &str) -> RelayerError {
    RelayerError::MissingEvent(name.to_string())
}

/// The local connection identifier of the latest handshake event `ctx`
/// emitted for `step`.
fn connection_handshake_event(
    ctx: &MockContext,
    step: HandshakeStep,
) -> Result<ConnectionId, RelayerError> {
    ctx.last_event(|event| match event {
        IbcEvent::ConnectionHandshake(e) if e.step() == step => Some(e.conn_id().clone()),
        _ => None,
    })
    .ok_or_else(|| missing_event(step.event_type()))
}

/// The client a connection end on `ctx` is built on.
pub fn connection_client(
    ctx: &MockContext,
    conn_id: &ConnectionId,
) -> Result<ClientId, RelayerError> {
    Ok(ctx.ibc_store.connection_end(conn_id)?.client_id().clone())
}

pub fn channel_end(
    ctx: &MockContext,
    port_id: &PortId,
    chan_id: &ChannelId,
) -> Result<ChannelEnd, RelayerError> {
    Ok(ctx
        .ibc_store
        .channel_end(&ChannelEndPath::new(port_id, chan_id))?)
}

/// Creates a client on `A` from the given states.
/// Returns the client identifier on `A`.
pub fn create_client_on_a(
    ctx_a: &mut MockContext,
    client_state: Any,
    consensus_state: Any,
    signer: Signer,
) -> Result<ClientId, RelayerError> {
    let msg_for_a = MsgEnvelope::Client(ClientMsg::CreateClient(MsgCreateClient {
        client_state,
        consensus_state,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
            _ => None,
        })
        .ok_or_else(|| missing_event("create_client"))
}

/// Creates a header-chain client of `B` on `A`, trusting the latest block
/// of `B`.
pub fn create_headerchain_client_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    config: &ClientStateConfig,
    signer: Signer,
) -> Result<ClientId, RelayerError> {
    let (client_state, consensus_state) = ctx_b.headerchain_client(config);
    create_client_on_a(ctx_a, client_state.into(), consensus_state.into(), signer)
}

/// Creates a sandbox client of `B` on `A`, run by the program `A`
/// registered under `checksum`.
pub fn create_sandbox_client_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    checksum: &[u8],
    signer: Signer,
) -> Result<ClientId, RelayerError> {
    let (client_state, consensus_state) = ctx_b.sandbox_client(checksum);
    create_client_on_a(ctx_a, client_state, consensus_state, signer)
}

/// Advances the block height on `A` until it catches up with the latest
/// timestamp on `B`.
pub fn sync_clock_on_a(ctx_a: &mut MockContext, ctx_b: &MockContext) {
    while ctx_b.latest_timestamp() > ctx_a.latest_timestamp() {
        ctx_a.advance_block();
    }
}

/// The client message moving the client of `B` on `A` to `target_height`.
pub fn client_message_for(
    ctx_a: &MockContext,
    ctx_b: &MockContext,
    client_id_on_a: &ClientId,
    target_height: Height,
) -> Result<Any, RelayerError> {
    let client_state_of_b_on_a = ctx_a.client_state(client_id_on_a)?;
    let trusted_height = client_state_of_b_on_a.latest_height();

    match client_state_of_b_on_a {
        AnyClientState::HeaderChain(_) => ctx_b
            .headerchain_header(&target_height, &trusted_height)
            .map(Into::into)
            .ok_or(RelayerError::MissingBlock(target_height)),
        AnyClientState::Sandbox(_) => ctx_b
            .sandbox_header(&target_height)
            .map(|header| header.into_client_message().into())
            .ok_or(RelayerError::MissingBlock(target_height)),
        AnyClientState::Solo(_) => Err(RelayerError::UnsupportedClient {
            client_id: client_id_on_a.clone(),
        }),
    }
}

/// Updates the client on `A` with the latest header from `B`. Does nothing
/// when the client already trusts the latest block of `B`.
pub fn update_client_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    client_id_on_a: &ClientId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let trusted_height = ctx_a.client_state(client_id_on_a)?.latest_height();
    let target_height = ctx_b.latest_height();

    if trusted_height == target_height {
        return Ok(());
    }
    if trusted_height > target_height {
        return Err(RelayerError::ClientAtHigherHeight {
            client_id: client_id_on_a.clone(),
            source_height: target_height,
            destination_height: trusted_height,
        });
    }

    let msg_for_a = MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
        client_id: client_id_on_a.clone(),
        client_message: client_message_for(ctx_a, ctx_b, client_id_on_a, target_height)?,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::UpdateClient(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("update_client"))
}

/// Updates the client on `A` with the latest header from `B` after syncing
/// the timestamps.
///
/// Timestamp sync is required, as headers from the future beyond the max
/// clock drift are rejected.
pub fn update_client_on_a_with_sync(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    client_id_on_a: &ClientId,
    signer: Signer,
) -> Result<(), RelayerError> {
    sync_clock_on_a(ctx_a, ctx_b);
    update_client_on_a(ctx_a, ctx_b, client_id_on_a, signer)
}

/// `A` initiates a connection with the other end on `B`.
/// Returns the connection identifier on `A`.
pub fn connection_open_init_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    client_id_on_a: &ClientId,
    client_id_on_b: &ClientId,
    delay_period: Duration,
    signer: Signer,
) -> Result<ConnectionId, RelayerError> {
    let counterparty_b = ConnectionCounterparty::new(
        client_id_on_b.clone(),
        None,
        ctx_b.ibc_store.commitment_prefix(),
    );

    let msg_for_a = MsgEnvelope::Connection(ConnectionMsg::OpenInit(MsgConnectionOpenInit {
        client_id_on_a: client_id_on_a.clone(),
        counterparty: counterparty_b,
        version: None,
        delay_period,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    connection_handshake_event(ctx_a, HandshakeStep::OpenInit)
}

/// Proofs of the client of `B` held on `A`: its state and its latest
/// consensus state, at the latest height of `A`.
struct ClientProofs {
    client_state: Any,
    consensus_height: Height,
    proof_client_state: CommitmentProofBytes,
    proof_consensus_state: CommitmentProofBytes,
}

fn client_proofs(
    ctx_a: &MockContext,
    client_id_on_a: &ClientId,
    proofs_height_on_a: Height,
) -> Result<ClientProofs, RelayerError> {
    let client_state = ctx_a.client_state(client_id_on_a)?;
    let consensus_height = client_state.latest_height();

    Ok(ClientProofs {
        client_state: client_state.into(),
        consensus_height,
        proof_client_state: ctx_a.proof(
            proofs_height_on_a,
            ClientStatePath::new(client_id_on_a.clone()),
        )?,
        proof_consensus_state: ctx_a.proof(
            proofs_height_on_a,
            ClientConsensusStatePath::new(
                client_id_on_a.clone(),
                consensus_height.revision_number(),
                consensus_height.revision_height(),
            ),
        )?,
    })
}

/// `B` receives the connection opening attempt by `A` after `A` initiates
/// the connection. Returns the connection identifier on `B`.
pub fn connection_open_try_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    conn_id_on_a: &ConnectionId,
    client_id_on_a: &ClientId,
    client_id_on_b: &ClientId,
    signer: Signer,
) -> Result<ConnectionId, RelayerError> {
    let versions_on_a = ctx_a
        .ibc_store
        .connection_end(conn_id_on_a)?
        .versions()
        .to_vec();
    connection_open_try_on_b_offering(
        ctx_b,
        ctx_a,
        conn_id_on_a,
        client_id_on_a,
        client_id_on_b,
        versions_on_a,
        signer,
    )
}

/// Like [`connection_open_try_on_b`], with `A` claiming to offer
/// `versions_on_a` instead of what its connection end holds.
pub fn connection_open_try_on_b_offering(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    conn_id_on_a: &ConnectionId,
    client_id_on_a: &ClientId,
    client_id_on_b: &ClientId,
    versions_on_a: Vec<ConnectionVersion>,
    signer: Signer,
) -> Result<ConnectionId, RelayerError> {
    let proofs_height_on_a = ctx_a.latest_height();
    let conn_end_on_a = ctx_a.ibc_store.connection_end(conn_id_on_a)?;
    let client_proofs = client_proofs(ctx_a, client_id_on_a, proofs_height_on_a)?;

    let counterparty_a = ConnectionCounterparty::new(
        client_id_on_a.clone(),
        Some(conn_id_on_a.clone()),
        ctx_a.ibc_store.commitment_prefix(),
    );

    let msg_for_b = MsgEnvelope::Connection(ConnectionMsg::OpenTry(MsgConnectionOpenTry {
        client_id_on_b: client_id_on_b.clone(),
        client_state_of_b_on_a: client_proofs.client_state,
        counterparty: counterparty_a,
        versions_on_a,
        proof_conn_end_on_a: ctx_a.proof(proofs_height_on_a, ConnectionPath::new(conn_id_on_a))?,
        proof_client_state_of_b_on_a: client_proofs.proof_client_state,
        proof_consensus_state_of_b_on_a: client_proofs.proof_consensus_state,
        proofs_height_on_a,
        consensus_height_of_b_on_a: client_proofs.consensus_height,
        delay_period: conn_end_on_a.delay_period(),
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    connection_handshake_event(ctx_b, HandshakeStep::OpenTry)
}

/// `A` receives `B`'s acknowledgement that `B` received the connection
/// opening attempt by `A`.
pub fn connection_open_ack_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    conn_id_on_a: &ConnectionId,
    conn_id_on_b: &ConnectionId,
    client_id_on_b: &ClientId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proofs_height_on_b = ctx_b.latest_height();
    let conn_end_on_b = ctx_b.ibc_store.connection_end(conn_id_on_b)?;
    let client_proofs = client_proofs(ctx_b, client_id_on_b, proofs_height_on_b)?;

    let msg_for_a = MsgEnvelope::Connection(ConnectionMsg::OpenAck(MsgConnectionOpenAck {
        conn_id_on_a: conn_id_on_a.clone(),
        conn_id_on_b: conn_id_on_b.clone(),
        client_state_of_a_on_b: client_proofs.client_state,
        proof_conn_end_on_b: ctx_b.proof(proofs_height_on_b, ConnectionPath::new(conn_id_on_b))?,
        proof_client_state_of_a_on_b: client_proofs.proof_client_state,
        proof_consensus_state_of_a_on_b: client_proofs.proof_consensus_state,
        proofs_height_on_b,
        consensus_height_of_a_on_b: client_proofs.consensus_height,
        version: conn_end_on_b
            .version()
            .map_err(ContextError::from)?
            .clone(),
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    connection_handshake_event(ctx_a, HandshakeStep::OpenAck).map(|_| ())
}

/// `B` receives the confirmation from `A` that the connection creation was
/// successful.
pub fn connection_open_confirm_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    conn_id_on_a: &ConnectionId,
    conn_id_on_b: &ConnectionId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_a = ctx_a.latest_height();

    let msg_for_b = MsgEnvelope::Connection(ConnectionMsg::OpenConfirm(MsgConnectionOpenConfirm {
        conn_id_on_b: conn_id_on_b.clone(),
        proof_conn_end_on_a: ctx_a.proof(proof_height_on_a, ConnectionPath::new(conn_id_on_a))?,
        proof_height_on_a,
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    connection_handshake_event(ctx_b, HandshakeStep::OpenConfirm).map(|_| ())
}

/// A connection is created by `A` towards `B` using the connection
/// handshake. Returns the connection identifiers of `A` and `B`.
pub fn create_connection_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &mut MockContext,
    client_id_on_a: &ClientId,
    client_id_on_b: &ClientId,
    delay_period: Duration,
    signer: Signer,
) -> Result<(ConnectionId, ConnectionId), RelayerError> {
    let conn_id_on_a = connection_open_init_on_a(
        ctx_a,
        ctx_b,
        client_id_on_a,
        client_id_on_b,
        delay_period,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_b, ctx_a, client_id_on_b, signer.clone())?;

    let conn_id_on_b = connection_open_try_on_b(
        ctx_b,
        ctx_a,
        &conn_id_on_a,
        client_id_on_a,
        client_id_on_b,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_a, ctx_b, client_id_on_a, signer.clone())?;

    connection_open_ack_on_a(
        ctx_a,
        ctx_b,
        &conn_id_on_a,
        &conn_id_on_b,
        client_id_on_b,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_b, ctx_a, client_id_on_b, signer.clone())?;

    connection_open_confirm_on_b(ctx_b, ctx_a, &conn_id_on_a, &conn_id_on_b, signer.clone())?;

    update_client_on_a_with_sync(ctx_a, ctx_b, client_id_on_a, signer)?;

    Ok((conn_id_on_a, conn_id_on_b))
}

/// `A` initiates a channel on `port_id_on_a` with the other end on `B`.
/// Returns the channel identifier of `A`.
pub fn channel_open_init_on_a(
    ctx_a: &mut MockContext,
    conn_id_on_a: &ConnectionId,
    port_id_on_a: &PortId,
    port_id_on_b: &PortId,
    ordering: Order,
    signer: Signer,
) -> Result<ChannelId, RelayerError> {
    let msg_for_a = MsgEnvelope::Channel(ChannelMsg::OpenInit(MsgChannelOpenInit {
        port_id_on_a: port_id_on_a.clone(),
        connection_hops_on_a: vec![conn_id_on_a.clone()],
        port_id_on_b: port_id_on_b.clone(),
        ordering,
        signer,
        version_proposal: ChannelVersion::empty(),
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::OpenInitChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_open_init"))
}

/// `B` receives the channel opening attempt by `A` after `A` initiates the
/// channel. Returns the channel identifier of `B`.
pub fn channel_open_try_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    conn_id_on_b: &ConnectionId,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    signer: Signer,
) -> Result<ChannelId, RelayerError> {
    let proof_height_on_a = ctx_a.latest_height();
    let chan_end_on_a = channel_end(ctx_a, port_id_on_a, chan_id_on_a)?;

    let msg_for_b = MsgEnvelope::Channel(ChannelMsg::OpenTry(MsgChannelOpenTry {
        port_id_on_b: chan_end_on_a.counterparty().port_id().clone(),
        connection_hops_on_b: vec![conn_id_on_b.clone()],
        port_id_on_a: port_id_on_a.clone(),
        chan_id_on_a: chan_id_on_a.clone(),
        version_supported_on_a: chan_end_on_a.version().clone(),
        proof_chan_end_on_a: ctx_a.proof(
            proof_height_on_a,
            ChannelEndPath::new(port_id_on_a, chan_id_on_a),
        )?,
        proof_height_on_a,
        ordering: *chan_end_on_a.ordering(),
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    ctx_b
        .last_event(|event| match event {
            IbcEvent::OpenTryChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_open_try"))
}

/// `A` receives `B`'s acknowledgement that `B` received the channel
/// opening attempt by `A`.
pub fn channel_open_ack_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    chan_id_on_b: &ChannelId,
    port_id_on_b: &PortId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_b = ctx_b.latest_height();
    let chan_end_on_b = channel_end(ctx_b, port_id_on_b, chan_id_on_b)?;

    let msg_for_a = MsgEnvelope::Channel(ChannelMsg::OpenAck(MsgChannelOpenAck {
        port_id_on_a: port_id_on_a.clone(),
        chan_id_on_a: chan_id_on_a.clone(),
        chan_id_on_b: chan_id_on_b.clone(),
        version_on_b: chan_end_on_b.version().clone(),
        proof_chan_end_on_b: ctx_b.proof(
            proof_height_on_b,
            ChannelEndPath::new(port_id_on_b, chan_id_on_b),
        )?,
        proof_height_on_b,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::OpenAckChannel(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_open_ack"))
}

/// `B` receives the confirmation from `A` that the channel creation was
/// successful.
pub fn channel_open_confirm_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    chan_id_on_b: &ChannelId,
    port_id_on_b: &PortId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_a = ctx_a.latest_height();

    let msg_for_b = MsgEnvelope::Channel(ChannelMsg::OpenConfirm(MsgChannelOpenConfirm {
        port_id_on_b: port_id_on_b.clone(),
        chan_id_on_b: chan_id_on_b.clone(),
        proof_chan_end_on_a: ctx_a.proof(
            proof_height_on_a,
            ChannelEndPath::new(port_id_on_a, chan_id_on_a),
        )?,
        proof_height_on_a,
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    ctx_b
        .last_event(|event| match event {
            IbcEvent::OpenConfirmChannel(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_open_confirm"))
}

/// A channel is created by `A` towards `B` over an open connection using
/// the channel handshake. Returns the channel identifiers of `A` and `B`.
#[allow(clippy::too_many_arguments)]
pub fn create_channel_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &mut MockContext,
    conn_id_on_a: &ConnectionId,
    port_id_on_a: &PortId,
    conn_id_on_b: &ConnectionId,
    port_id_on_b: &PortId,
    ordering: Order,
    signer: Signer,
) -> Result<(ChannelId, ChannelId), RelayerError> {
    let client_id_on_a = connection_client(ctx_a, conn_id_on_a)?;
    let client_id_on_b = connection_client(ctx_b, conn_id_on_b)?;

    let chan_id_on_a = channel_open_init_on_a(
        ctx_a,
        conn_id_on_a,
        port_id_on_a,
        port_id_on_b,
        ordering,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_b, ctx_a, &client_id_on_b, signer.clone())?;

    let chan_id_on_b = channel_open_try_on_b(
        ctx_b,
        ctx_a,
        conn_id_on_b,
        &chan_id_on_a,
        port_id_on_a,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer.clone())?;

    channel_open_ack_on_a(
        ctx_a,
        ctx_b,
        &chan_id_on_a,
        port_id_on_a,
        &chan_id_on_b,
        port_id_on_b,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_b, ctx_a, &client_id_on_b, signer.clone())?;

    channel_open_confirm_on_b(
        ctx_b,
        ctx_a,
        &chan_id_on_a,
        port_id_on_a,
        &chan_id_on_b,
        port_id_on_b,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer)?;

    Ok((chan_id_on_a, chan_id_on_b))
}

/// `A` initiates the channel closing with the other end on `B`.
pub fn channel_close_init_on_a(
    ctx_a: &mut MockContext,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let msg_for_a = MsgEnvelope::Channel(ChannelMsg::CloseInit(MsgChannelCloseInit {
        port_id_on_a: port_id_on_a.clone(),
        chan_id_on_a: chan_id_on_a.clone(),
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::CloseInitChannel(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_close_init"))
}

/// `B` receives the channel closing attempt by `A` after `A` initiates the
/// channel closing.
pub fn channel_close_confirm_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    chan_id_on_b: &ChannelId,
    port_id_on_b: &PortId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_a = ctx_a.latest_height();

    let msg_for_b = MsgEnvelope::Channel(ChannelMsg::CloseConfirm(MsgChannelCloseConfirm {
        port_id_on_b: port_id_on_b.clone(),
        chan_id_on_b: chan_id_on_b.clone(),
        proof_chan_end_on_a: ctx_a.proof(
            proof_height_on_a,
            ChannelEndPath::new(port_id_on_a, chan_id_on_a),
        )?,
        proof_height_on_a,
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    ctx_b
        .last_event(|event| match event {
            IbcEvent::CloseConfirmChannel(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("channel_close_confirm"))
}

/// A channel is closed by `A` towards `B` using the closing handshake.
pub fn close_channel_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &mut MockContext,
    chan_id_on_a: &ChannelId,
    port_id_on_a: &PortId,
    chan_id_on_b: &ChannelId,
    port_id_on_b: &PortId,
    signer: Signer,
) -> Result<(), RelayerError> {
    let chan_end_on_b = channel_end(ctx_b, port_id_on_b, chan_id_on_b)?;
    let client_id_on_b = connection_client(ctx_b, &chan_end_on_b.connection_hops()[0])?;
    let chan_end_on_a = channel_end(ctx_a, port_id_on_a, chan_id_on_a)?;
    let client_id_on_a = connection_client(ctx_a, &chan_end_on_a.connection_hops()[0])?;

    channel_close_init_on_a(ctx_a, chan_id_on_a, port_id_on_a, signer.clone())?;

    update_client_on_a_with_sync(ctx_b, ctx_a, &client_id_on_b, signer.clone())?;

    channel_close_confirm_on_b(
        ctx_b,
        ctx_a,
        chan_id_on_a,
        port_id_on_a,
        chan_id_on_b,
        port_id_on_b,
        signer.clone(),
    )?;

    update_client_on_a_with_sync(ctx_a, ctx_b, &client_id_on_a, signer)
}

/// `B` receives a packet from an application on `A`.
/// Returns `B`'s acknowledgement of receipt.
pub fn packet_recv_on_b(
    ctx_b: &mut MockContext,
    ctx_a: &MockContext,
    packet: Packet,
    signer: Signer,
) -> Result<Acknowledgement, RelayerError> {
    let proof_height_on_a = ctx_a.latest_height();

    let msg_for_b = MsgEnvelope::Packet(PacketMsg::Recv(MsgRecvPacket {
        proof_commitment_on_a: ctx_a.proof(
            proof_height_on_a,
            CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a),
        )?,
        packet,
        proof_height_on_a,
        signer,
    }));

    ctx_b.deliver(msg_for_b)?;

    ctx_b
        .last_event(|event| match event {
            IbcEvent::WriteAcknowledgement(e) => Some(e.acknowledgement().clone()),
            _ => None,
        })
        .ok_or_else(|| missing_event("write_acknowledgement"))
}

/// `A` receives the acknowledgement from `B` that `B` received the packet
/// from `A`.
pub fn packet_ack_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    packet: Packet,
    acknowledgement: Acknowledgement,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_b = ctx_b.latest_height();

    let msg_for_a = MsgEnvelope::Packet(PacketMsg::Ack(MsgAcknowledgement {
        proof_acked_on_b: ctx_b.proof(
            proof_height_on_b,
            AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a),
        )?,
        packet,
        acknowledgement,
        proof_height_on_b,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::AcknowledgePacket(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("acknowledge_packet"))
}

/// The proof that `B` never received `packet`, and the next sequence `B`
/// expects on the channel.
fn unreceived_proof(
    ctx_b: &MockContext,
    packet: &Packet,
    proof_height_on_b: Height,
) -> Result<(Sequence, CommitmentProofBytes), RelayerError> {
    let chan_end_on_b = channel_end(ctx_b, &packet.port_id_on_b, &packet.chan_id_on_b)?;

    match chan_end_on_b.ordering() {
        Order::Ordered => {
            let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
            let next_seq_recv_on_b = ctx_b
                .ibc_store
                .get_next_sequence_recv(&seq_recv_path_on_b)?;
            let proof = ctx_b.proof(proof_height_on_b, seq_recv_path_on_b)?;
            Ok((next_seq_recv_on_b, proof))
        }
        Order::Unordered => {
            let proof = ctx_b.proof(
                proof_height_on_b,
                ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a),
            )?;
            Ok((packet.seq_on_a, proof))
        }
    }
}

/// `A` times out a packet `B` did not receive before its deadline.
pub fn packet_timeout_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    packet: Packet,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_b = ctx_b.latest_height();
    let (next_seq_recv_on_b, proof_unreceived_on_b) =
        unreceived_proof(ctx_b, &packet, proof_height_on_b)?;

    let msg_for_a = MsgEnvelope::Packet(PacketMsg::Timeout(MsgTimeout {
        packet,
        next_seq_recv_on_b,
        proof_unreceived_on_b,
        proof_height_on_b,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::TimeoutPacket(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("timeout_packet"))
}

/// `A` times out a packet `B` can no longer receive because `B` closed the
/// channel.
pub fn packet_timeout_on_close_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &MockContext,
    packet: Packet,
    signer: Signer,
) -> Result<(), RelayerError> {
    let proof_height_on_b = ctx_b.latest_height();
    let (next_seq_recv_on_b, proof_unreceived_on_b) =
        unreceived_proof(ctx_b, &packet, proof_height_on_b)?;
    let proof_close_on_b = ctx_b.proof(
        proof_height_on_b,
        ChannelEndPath::new(&packet.port_id_on_b, &packet.chan_id_on_b),
    )?;

    let msg_for_a = MsgEnvelope::Packet(PacketMsg::TimeoutOnClose(MsgTimeoutOnClose {
        packet,
        next_seq_recv_on_b,
        proof_unreceived_on_b,
        proof_close_on_b,
        proof_height_on_b,
        signer,
    }));

    ctx_a.deliver(msg_for_a)?;

    ctx_a
        .last_event(|event| match event {
            IbcEvent::TimeoutPacket(_) => Some(()),
            _ => None,
        })
        .ok_or_else(|| missing_event("timeout_packet"))
}

/// Relays a packet sent on `A` to `B`, then relays `B`'s acknowledgement
/// back to `A`. Returns the acknowledgement.
pub fn relay_packet_on_a(
    ctx_a: &mut MockContext,
    ctx_b: &mut MockContext,
    packet: Packet,
    client_id_on_a: &ClientId,
    client_id_on_b: &ClientId,
    signer: Signer,
) -> Result<Acknowledgement, RelayerError> {
    update_client_on_a_with_sync(ctx_b, ctx_a, client_id_on_b, signer.clone())?;

    let acknowledgement = packet_recv_on_b(ctx_b, ctx_a, packet.clone(), signer.clone())?;

    update_client_on_a_with_sync(ctx_a, ctx_b, client_id_on_a, signer.clone())?;

    packet_ack_on_a(ctx_a, ctx_b, packet, acknowledgement.clone(), signer)?;

    Ok(acknowledgement)
}
