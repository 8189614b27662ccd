use core::str::FromStr;

use interlink_core_client::context::client_state::{ClientStateCommon, ClientStateValidation};
use interlink_core_client::context::delay::{verify_delay_passed, DelayPeriod};
use interlink_core_client::context::Convertible;
use interlink_core_client::types::error::{ClientError, UpgradeClientError};
use interlink_core_client::types::{Height, Status};
use interlink_core_commitment_types::commitment::{CommitmentPrefix, CommitmentProofBytes};
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::Path;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, Timestamp};
use serde::de::DeserializeOwned;

use crate::program::{checksum_hex, from_json, to_json, SandboxValidationContext};
use crate::store::ScratchStore;
use crate::types::error::SandboxError;
use crate::types::msgs::{
    CheckForMisbehaviourMsg, QueryMsg, StatusMsg, SudoMsg, TimestampAtHeightMsg,
    VerifyClientMessageMsg, VerifyMembershipMsg, VerifyNonMembershipMsg,
    VerifyUpgradeAndUpdateStateMsg,
};
use crate::types::response::{
    CheckForMisbehaviourResponse, StatusResponse, SudoResponse, TimestampAtHeightResponse,
    VerifyClientMessageResponse,
};
use crate::types::{ClientMessage, ClientState, ConsensusState};

impl<V> ClientStateValidation<V> for ClientState
where
    V: SandboxValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        let client_message = ClientMessage::try_from(client_message)?;

        let response: VerifyClientMessageResponse = query(
            self,
            ctx,
            client_id,
            VerifyClientMessageMsg {
                client_message: client_message.data,
            }
            .into(),
        )?;

        if !response.is_valid {
            return Err(ClientError::InvalidHeader {
                description: SandboxError::RejectedClientMessage.to_string(),
            });
        }

        Ok(())
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<bool, ClientError> {
        let client_message = ClientMessage::try_from(client_message)?;

        let response: CheckForMisbehaviourResponse = query(
            self,
            ctx,
            client_id,
            CheckForMisbehaviourMsg {
                client_message: client_message.data,
            }
            .into(),
        )?;

        Ok(response.found_misbehaviour)
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
        let upgraded_client_state = ClientState::try_from(upgraded_client_state)?;
        let upgraded_consensus_state = <ConsensusState as TryFrom<Any>>::try_from(upgraded_consensus_state)?;

        upgraded_client_state
            .validate()
            .map_err(|e| ClientError::InvalidClientState {
                description: e.to_string(),
            })?;

        if upgraded_client_state.latest_height <= self.latest_height {
            return Err(UpgradeClientError::InsufficientUpgradeHeight {
                upgraded_height: upgraded_client_state.latest_height,
                client_height: self.latest_height,
            }
            .into());
        }

        sudo_unpersisted(
            self,
            ctx,
            client_id,
            VerifyUpgradeAndUpdateStateMsg {
                upgrade_client_state: upgraded_client_state.data,
                upgrade_consensus_state: upgraded_consensus_state.data,
                proof_upgrade_client: proof_upgrade_client.as_ref().to_vec(),
                proof_upgrade_consensus_state: proof_upgrade_consensus_state.as_ref().to_vec(),
            }
            .into(),
        )?;

        Ok(())
    }

    fn verify_membership_at_height(
        &self,
        ctx: &V,
        client_id: &ClientId,
        height: Height,
        delay: &DelayPeriod,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        self.status(ctx, client_id)?.verify_is_active()?;
        self.validate_proof_height(height)?;
        verify_delay_passed(ctx, client_id, height, delay)?;

        sudo_unpersisted(
            self,
            ctx,
            client_id,
            VerifyMembershipMsg {
                height,
                prefix: prefix.as_bytes().to_vec(),
                proof: proof.as_ref().to_vec(),
                path: path.to_bytes().into_vec(),
                value,
            }
            .into(),
        )?;

        Ok(())
    }

    fn verify_non_membership_at_height(
        &self,
        ctx: &V,
        client_id: &ClientId,
        height: Height,
        delay: &DelayPeriod,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), ClientError> {
        self.status(ctx, client_id)?.verify_is_active()?;
        self.validate_proof_height(height)?;
        verify_delay_passed(ctx, client_id, height, delay)?;

        sudo_unpersisted(
            self,
            ctx,
            client_id,
            VerifyNonMembershipMsg {
                height,
                prefix: prefix.as_bytes().to_vec(),
                proof: proof.as_ref().to_vec(),
                path: path.to_bytes().into_vec(),
            }
            .into(),
        )?;

        Ok(())
    }
}

/// Query the status of the client from its program. A program that cannot
/// answer leaves the client in the `Unknown` status.
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
    V: SandboxValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let response: StatusResponse =
        match query(client_state, ctx, client_id, StatusMsg {}.into()) {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(
                    %client_id,
                    error = %e,
                    "sandbox program could not report a status"
                );
                return Ok(Status::Unknown);
            }
        };

    Ok(Status::from_str(&response.status).unwrap_or(Status::Unknown))
}

/// Asks the program for the timestamp of the consensus state it holds at
/// `height`.
pub fn timestamp_at_height<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    height: Height,
) -> Result<Timestamp, ClientError>
where
    V: SandboxValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let response: TimestampAtHeightResponse = query(
        client_state,
        ctx,
        client_id,
        TimestampAtHeightMsg { height }.into(),
    )?;

    Ok(Timestamp::from_nanoseconds(response.timestamp)?)
}

/// Sends a query to the client's program.
pub fn query<V, R>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    msg: QueryMsg,
) -> Result<R, ClientError>
where
    V: SandboxValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
    R: DeserializeOwned,
{
    let program = ctx.sandbox_program(&client_state.checksum)?;
    let store = ScratchStore::new(ctx, client_id);

    tracing::trace!(
        %client_id,
        checksum = %checksum_hex(&client_state.checksum),
        ?msg,
        "querying sandbox program"
    );

    let response = program.query(&store, &to_json(&msg)?)?;

    Ok(from_json(&response)?)
}

/// Sends a sudo message to the client's program over a store whose writes
/// are discarded once the program returns.
pub fn sudo_unpersisted<V>(
    client_state: &ClientState,
    ctx: &V,
    client_id: &ClientId,
    msg: SudoMsg,
) -> Result<SudoResponse, ClientError>
where
    V: SandboxValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    let program = ctx.sandbox_program(&client_state.checksum)?;
    let mut store = ScratchStore::new(ctx, client_id);

    let response = program.sudo(&mut store, &to_json(&msg)?)?;

    Ok(from_json(&response)?)
}
