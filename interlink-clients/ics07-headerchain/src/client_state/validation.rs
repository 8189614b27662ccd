use interlink_core_client::context::client_state::ClientStateValidation;
use interlink_core_client::context::{Convertible, ExtClientValidationContext};
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Status;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::ClientConsensusStatePath;
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use super::{
    check_for_misbehaviour_on_misbehaviour, check_for_misbehaviour_on_update, verify_header,
    verify_misbehaviour,
};
use crate::types::{
    ClientState, ConsensusState, Header, Misbehaviour, HEADERCHAIN_HEADER_TYPE_URL,
    HEADERCHAIN_MISBEHAVIOUR_TYPE_URL,
};

impl<V> ClientStateValidation<V> for ClientState
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        verify_client_message(self, ctx, client_id, client_message)
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<bool, ClientError> {
        check_for_misbehaviour(self, ctx, client_id, client_message)
    }

    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError> {
        status(self, ctx, client_id)
    }

    fn verify_upgrade_client(
        &self,
        ctx: &V,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
        proof_upgrade_client: CommitmentProofBytes,
        proof_upgrade_consensus_state: CommitmentProofBytes,
    ) -> Result<(), ClientError> {
        let latest_consensus_state: ConsensusState = {
            let path = ClientConsensusStatePath::new(
                client_id.clone(),
                self.latest_height.revision_number(),
                self.latest_height.revision_height(),
            );
            ctx.consensus_state(&path)?.try_into().map_err(Into::into)?
        };

        super::verify_upgrade_client(
            self,
            upgraded_client_state,
            upgraded_consensus_state,
            proof_upgrade_client,
            proof_upgrade_consensus_state,
            &latest_consensus_state.root,
        )
    }
}

/// Verify the client message as part of the client state validation process.
///
/// Note that this function is typically implemented as part of the
/// [`ClientStateValidation`] trait, but has been made a standalone function
/// in order to make the ClientState APIs more flexible.
pub fn verify_client_message<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    client_message: Any,
) -> Result<(), ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    match client_message.type_url.as_str() {
        HEADERCHAIN_HEADER_TYPE_URL => {
            let header = Header::try_from(client_message)?;
            verify_header(client_state, ctx, client_id, &header)
        }
        HEADERCHAIN_MISBEHAVIOUR_TYPE_URL => {
            let misbehaviour = Misbehaviour::try_from(client_message)?;
            verify_misbehaviour(client_state, ctx, client_id, &misbehaviour)
        }
        _ => Err(ClientError::InvalidClientMessageType(
            client_message.type_url,
        )),
    }
}

/// Check for misbehaviour on the client state as part of the client state
/// validation process.
///
/// Note that this function is typically implemented as part of the
/// [`ClientStateValidation`] trait, but has been made a standalone function
/// in order to make the ClientState APIs more flexible.
pub fn check_for_misbehaviour<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    client_message: Any,
) -> Result<bool, ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    match client_message.type_url.as_str() {
        HEADERCHAIN_HEADER_TYPE_URL => {
            let header = Header::try_from(client_message)?;
            check_for_misbehaviour_on_update(client_state, ctx, client_id, &header)
        }
        HEADERCHAIN_MISBEHAVIOUR_TYPE_URL => {
            let misbehaviour = Misbehaviour::try_from(client_message)?;
            Ok(check_for_misbehaviour_on_misbehaviour(
                misbehaviour.header1(),
                misbehaviour.header2(),
            ))
        }
        _ => Err(ClientError::InvalidClientMessageType(
            client_message.type_url,
        )),
    }
}

/// Query the status of the client state.
///
/// Note that this function is typically implemented as part of the
/// [`ClientStateValidation`] trait, but has been made a standalone function
/// in order to make the ClientState APIs more flexible.
pub fn status<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
) -> Result<Status, ClientError>
where
    V: ExtClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    if client_state.is_frozen() {
        return Ok(Status::Frozen);
    }

    let latest_consensus_state: ConsensusState = {
        let client_cons_state_path = ClientConsensusStatePath::new(
            client_id.clone(),
            client_state.latest_height.revision_number(),
            client_state.latest_height.revision_height(),
        );
        match ctx.consensus_state(&client_cons_state_path) {
            Ok(cs) => cs.try_into().map_err(Into::into)?,
            // if the client state does not have an associated consensus state for its latest height
            // then it must be expired
            Err(_) => return Ok(Status::Expired),
        }
    };

    // Note: if the `duration_since()` is `None`, indicating that the latest
    // consensus state is in the future, then we don't consider the client
    // to be expired.
    let now = ctx.host_timestamp()?;
    if let Some(elapsed_since_latest_consensus_state) =
        now.duration_since(&latest_consensus_state.timestamp)
    {
        if client_state.expired(elapsed_since_latest_consensus_state) {
            return Ok(Status::Expired);
        }
    }

    Ok(Status::Active)
}
