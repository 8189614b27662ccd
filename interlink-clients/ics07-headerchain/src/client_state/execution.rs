use interlink_core_client::context::prelude::*;
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::{ClientConsensusStatePath, ClientStatePath};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use crate::types::{ClientState, ConsensusState, Header};

impl<E> ClientStateExecution<E> for ClientState
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        initialise(self, ctx, client_id, consensus_state)
    }

    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        update_state(self, ctx, client_id, header)
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        _client_message: Any,
    ) -> Result<(), ClientError> {
        freeze(self, ctx, client_id)
    }

    fn update_state_on_upgrade(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) -> Result<Height, ClientError> {
        upgrade(
            self,
            ctx,
            client_id,
            upgraded_client_state,
            upgraded_consensus_state,
        )
    }
}

fn consensus_path(client_id: &ClientId, height: Height) -> ClientConsensusStatePath {
    ClientConsensusStatePath::new(
        client_id.clone(),
        height.revision_number(),
        height.revision_height(),
    )
}

/// Writes the client state together with the consensus state it now trusts
/// at its latest height, stamped with the host's current time and height.
fn commit<E>(
    ctx: &mut E,
    client_id: &ClientId,
    client_state: ClientState,
    consensus_state: ConsensusState,
) -> Result<Height, ClientError>
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
{
    let height = client_state.latest_height;
    let (host_timestamp, host_height) = (ctx.host_timestamp()?, ctx.host_height()?);

    ctx.store_client_state(ClientStatePath::new(client_id.clone()), client_state.into())?;
    ctx.store_consensus_state(consensus_path(client_id, height), consensus_state.into())?;
    ctx.store_update_meta(client_id.clone(), height, host_timestamp, host_height)?;

    Ok(height)
}

pub fn initialise<E>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
    consensus_state: Any,
) -> Result<(), ClientError>
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
{
    client_state
        .validate()
        .map_err(|e| ClientError::InvalidClientState {
            description: e.to_string(),
        })?;

    commit(
        ctx,
        client_id,
        client_state.clone(),
        <ConsensusState as TryFrom<Any>>::try_from(consensus_state)?,
    )?;
    Ok(())
}

/// Installs a verified header. Expired consensus states are pruned first;
/// a header already installed by another relayer changes nothing else.
pub fn update_state<E>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
    header: Any,
) -> Result<Vec<Height>, ClientError>
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let header = Header::try_from(header)?;
    let header_height = header.height();

    prune_expired_consensus_states(client_state, ctx, client_id)?;

    if ctx
        .consensus_state(&consensus_path(client_id, header_height))
        .is_err()
    {
        let advanced = client_state.clone().with_header(&header);
        let trusted = ConsensusState::from(header);
        let (host_timestamp, host_height) = (ctx.host_timestamp()?, ctx.host_height()?);
        ctx.store_consensus_state(consensus_path(client_id, header_height), trusted.into())?;
        ctx.store_client_state(ClientStatePath::new(client_id.clone()), advanced.into())?;
        ctx.store_update_meta(client_id.clone(), header_height, host_timestamp, host_height)?;
    }

    Ok(vec![header_height])
}

/// Misbehaviour freezes the client at the same sentinel height whatever the
/// evidence.
pub fn freeze<E>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
) -> Result<(), ClientError>
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
{
    let frozen = client_state.clone().with_frozen_height(Height::min(0));
    ctx.store_client_state(ClientStatePath::new(client_id.clone()), frozen.into())?;
    Ok(())
}

/// Moves the client onto the upgraded chain. The new consensus state keeps
/// the old chain's last timestamp and next validators so the first header
/// of the new chain can be verified, but its root is a sentinel no proof
/// verifies against.
pub fn upgrade<E>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
    upgraded_client_state: Any,
    upgraded_consensus_state: Any,
) -> Result<Height, ClientError>
where
    E: ExtClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
{
    let committed = ClientState::try_from(upgraded_client_state)?;
    let last_block = <ConsensusState as TryFrom<Any>>::try_from(upgraded_consensus_state)?;

    let upgraded =
        client_state
            .upgraded_to(committed)
            .map_err(|e| ClientError::InvalidClientState {
                description: e.to_string(),
            })?;
    let anchor = ConsensusState::new(
        b"sentinel_root".to_vec().into(),
        last_block.timestamp,
        last_block.next_validators_hash,
    );

    commit(ctx, client_id, upgraded, anchor)
}

/// Deletes consensus states, oldest first, that fell out of the trusting
/// period, together with their update metadata.
pub fn prune_expired_consensus_states<E>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
) -> Result<(), ClientError>
where
    E: ClientExecutionContext + ExtClientValidationContext,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let mut heights = ctx.consensus_state_heights(client_id)?;
    heights.sort();

    let now = ctx.host_timestamp()?;
    for height in heights {
        let path = consensus_path(client_id, height);
        let stored: ConsensusState = ctx
            .consensus_state(&path)?
            .try_into()
            .map_err(Into::into)?;
        let expired = now
            .duration_since(&stored.timestamp)
            .is_some_and(|elapsed| client_state.expired(elapsed));
        if !expired {
            break;
        }

        tracing::debug!(%client_id, %height, "pruning expired consensus state");
        ctx.delete_consensus_state(path)?;
        ctx.delete_update_meta(client_id.clone(), height)?;
    }

    Ok(())
}
