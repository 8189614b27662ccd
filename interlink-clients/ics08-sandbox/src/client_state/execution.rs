use interlink_core_client::context::client_state::ClientStateExecution;
use interlink_core_client::context::{ClientExecutionContext, Convertible};
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_host::types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use crate::program::{checksum_hex, from_json, to_json, SandboxValidationContext};
use crate::store::{decode_value, encode_value, ClientStore, HostStore, StoreKey};
use crate::types::error::SandboxError;
use crate::types::msgs::{InstantiateMsg, SudoMsg, UpdateStateMsg, UpdateStateOnMisbehaviourMsg};
use crate::types::response::SudoResponse;
use crate::types::{ClientMessage, ClientState, ConsensusState};

impl<E> ClientStateExecution<E> for ClientState
where
    E: ClientExecutionContext + SandboxValidationContext,
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
        self.validate().map_err(|e| ClientError::InvalidClientState {
            description: e.to_string(),
        })?;
        let consensus_state = <ConsensusState as TryFrom<Any>>::try_from(consensus_state)?;

        let msg = InstantiateMsg {
            client_state: self.data.clone(),
            consensus_state: consensus_state.data,
            checksum: self.checksum.clone(),
            latest_height: self.latest_height,
        };

        let program = ctx.sandbox_program(&self.checksum)?;
        let mut store = HostStore::new(ctx, client_id);

        tracing::debug!(
            %client_id,
            checksum = %checksum_hex(&self.checksum),
            "instantiating sandbox program"
        );

        let response = program.instantiate(&mut store, &to_json(&msg)?)?;
        from_json::<SudoResponse>(&response)?;

        validate_post_execution_client_state(&store)?;

        store.commit()
    }

    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        let client_message = ClientMessage::try_from(header)?;

        sudo(
            self,
            ctx,
            client_id,
            UpdateStateMsg {
                client_message: client_message.data,
            }
            .into(),
            |response| match response.heights {
                Some(heights) if !heights.is_empty() => Ok(heights),
                _ => Err(SandboxError::MissingUpdatedHeights.into()),
            },
        )
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        let client_message = ClientMessage::try_from(client_message)?;

        sudo(
            self,
            ctx,
            client_id,
            UpdateStateOnMisbehaviourMsg {
                client_message: client_message.data,
            }
            .into(),
            |_| Ok(()),
        )
    }

    fn update_state_on_upgrade(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) -> Result<Height, ClientError> {
        update_on_upgrade(ctx, client_id, upgraded_client_state, upgraded_consensus_state)
    }
}

/// Commits the upgraded client and consensus states, whose proofs the
/// program checked when the upgrade was validated.
///
/// Note that this function is typically implemented as part of the
/// [`ClientStateExecution`] trait, but has been made a standalone function
/// in order to make the ClientState APIs more flexible.
pub fn update_on_upgrade<E>(
    ctx: &mut E,
    client_id: &ClientId,
    upgraded_client_state: Any,
    upgraded_consensus_state: Any,
) -> Result<Height, ClientError>
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let upgraded_client_state = ClientState::try_from(upgraded_client_state)?;
    let upgraded_consensus_state = <ConsensusState as TryFrom<Any>>::try_from(upgraded_consensus_state)?;
    let latest_height = upgraded_client_state.latest_height;

    let mut store = HostStore::new(ctx, client_id);
    store.set(
        &StoreKey::ClientState.to_vec(),
        encode_value(upgraded_client_state),
    )?;
    store.set(
        &StoreKey::ConsensusState(latest_height).to_vec(),
        encode_value(upgraded_consensus_state),
    )?;
    store.commit()?;

    Ok(latest_height)
}

/// Sends a sudo message to the client's program over a staging host store.
/// The program's writes reach the host only once `accept` takes the
/// response and the stored client state is still valid.
pub fn sudo<E, T>(
    client_state: &ClientState,
    ctx: &mut E,
    client_id: &ClientId,
    msg: SudoMsg,
    accept: impl FnOnce(SudoResponse) -> Result<T, ClientError>,
) -> Result<T, ClientError>
where
    E: ClientExecutionContext + SandboxValidationContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let program = ctx.sandbox_program(&client_state.checksum)?;
    let mut store = HostStore::new(ctx, client_id);

    tracing::debug!(%client_id, ?msg, "executing sandbox sudo message");

    let response = program.sudo(&mut store, &to_json(&msg)?)?;
    let accepted = accept(from_json(&response)?)?;

    validate_post_execution_client_state(&store)?;
    store.commit()?;

    Ok(accepted)
}

/// Checks that the program left a sandbox client state in the store.
fn validate_post_execution_client_state(store: &dyn ClientStore) -> Result<(), ClientError> {
    let value = store
        .get(&StoreKey::ClientState.to_vec())?
        .ok_or_else(|| SandboxError::program("no client state stored"))?;

    let client_state = ClientState::try_from(decode_value(&value)?)?;
    client_state
        .validate()
        .map_err(|e| ClientError::InvalidClientState {
            description: e.to_string(),
        })
}
