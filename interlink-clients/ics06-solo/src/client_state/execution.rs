use interlink_core_client::context::prelude::*;
use interlink_core_client::types::error::{ClientError, UpgradeClientError};
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::{ClientConsensusStatePath, ClientStatePath};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use crate::types::{ClientState, ConsensusState, Header, SOLO_CLIENT_TYPE};

impl<E> ClientStateExecution<E> for ClientState
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
{
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        self.validate_basic()
            .map_err(|e| ClientError::InvalidClientState {
                description: e.to_string(),
            })?;

        let consensus_state = <ConsensusState as TryFrom<Any>>::try_from(consensus_state)?;

        store_state(ctx, client_id, self.clone(), consensus_state)
    }

    /// Installs the signer and diversifier carried by the header and moves
    /// the client to the next sequence.
    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        let header = Header::try_from(header)?;

        let new_consensus_state = ConsensusState {
            root: CommitmentRoot::from_bytes(&header.new_public_key),
            diversifier: header.new_diversifier,
            timestamp: header.timestamp,
        };
        let new_client_state = ClientState {
            sequence: self.sequence.increment(),
            is_frozen: false,
            consensus_state: new_consensus_state.clone(),
        };
        let new_sequence = new_client_state.sequence;

        tracing::debug!(%client_id, sequence = %new_sequence, "solo signer rotated");

        store_state(ctx, client_id, new_client_state, new_consensus_state)?;

        Ok(vec![new_sequence])
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        _client_message: Any,
    ) -> Result<(), ClientError> {
        let frozen_client_state = self.clone().with_frozen();

        tracing::debug!(%client_id, sequence = %self.sequence, "solo client frozen on equivocation");

        ctx.store_client_state(
            ClientStatePath::new(client_id.clone()),
            frozen_client_state.into(),
        )?;

        Ok(())
    }

    fn update_state_on_upgrade(
        &self,
        _ctx: &mut E,
        _client_id: &ClientId,
        _upgraded_client_state: Any,
        _upgraded_consensus_state: Any,
    ) -> Result<Height, ClientError> {
        Err(UpgradeClientError::UnsupportedUpgrade {
            client_type: SOLO_CLIENT_TYPE.to_string(),
        }
        .into())
    }
}

/// Stores the client state, its consensus state at the client's sequence and
/// the update metadata of that sequence.
fn store_state<E>(
    ctx: &mut E,
    client_id: &ClientId,
    client_state: ClientState,
    consensus_state: ConsensusState,
) -> Result<(), ClientError>
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
{
    let host_timestamp = ctx.host_timestamp()?;
    let host_height = ctx.host_height()?;
    let sequence = client_state.sequence;

    ctx.store_client_state(
        ClientStatePath::new(client_id.clone()),
        client_state.into(),
    )?;
    ctx.store_consensus_state(
        ClientConsensusStatePath::new(
            client_id.clone(),
            sequence.revision_number(),
            sequence.revision_height(),
        ),
        consensus_state.into(),
    )?;
    ctx.store_update_meta(client_id.clone(), sequence, host_timestamp, host_height)?;

    Ok(())
}
