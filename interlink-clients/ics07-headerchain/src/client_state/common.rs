use interlink_core_client::context::client_state::ClientStateCommon;
use interlink_core_client::types::error::{ClientError, UpgradeClientError};
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use interlink_core_commitment_types::merkle;
use interlink_core_host::types::identifiers::ClientType;
use interlink_core_host::types::path::{Path, UpgradeClientStatePath, UpgradeConsensusStatePath};
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, Any};

use crate::types::{client_type, ClientState, ConsensusState};

impl ClientStateCommon for ClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        verify_consensus_state(consensus_state)
    }

    fn client_type(&self) -> ClientType {
        client_type()
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        validate_proof_height(self, proof_height)
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        verify_membership(prefix, proof, root, path, value)
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        verify_non_membership(prefix, proof, root, path)
    }
}

/// Verify an `Any` consensus state by attempting to convert it to a
/// header-chain consensus state with a non-empty root.
pub fn verify_consensus_state(consensus_state: Any) -> Result<(), ClientError> {
    let consensus_state = ConsensusState::try_from(consensus_state)?;

    if consensus_state.root.is_empty() {
        return Err(ClientError::InvalidConsensusState {
            description: "empty commitment root".into(),
        });
    };

    Ok(())
}

/// Validate that the client is at a sufficient height for a given proof
/// height.
pub fn validate_proof_height(
    client_state: &ClientState,
    proof_height: Height,
) -> Result<(), ClientError> {
    let latest_height = client_state.latest_height;

    if latest_height < proof_height {
        return Err(ClientError::InvalidProofHeight {
            actual: proof_height,
            expected: latest_height,
        });
    }

    Ok(())
}

/// Verifies the upgraded client and consensus states committed by the
/// counterparty under its upgrade path against `root`, the root of the
/// client's latest consensus state.
///
/// The upgraded states are committed at the last height of the current
/// revision, which is the client's latest height.
pub fn verify_upgrade_client(
    client_state: &ClientState,
    upgraded_client_state: Any,
    upgraded_consensus_state: Any,
    proof_upgrade_client: CommitmentProofBytes,
    proof_upgrade_consensus_state: CommitmentProofBytes,
    root: &CommitmentRoot,
) -> Result<(), ClientError> {
    // Make sure that the client type is of header-chain type `ClientState`
    let upgraded_client = ClientState::try_from(upgraded_client_state.clone())?;

    // Make sure that the consensus type is of header-chain type `ConsensusState`
    ConsensusState::try_from(upgraded_consensus_state.clone())?;

    // Make sure the latest height of the current client is not greater than
    // the upgrade height. This checks both the revision number and the height.
    if client_state.latest_height >= upgraded_client.latest_height {
        return Err(UpgradeClientError::InsufficientUpgradeHeight {
            upgraded_height: upgraded_client.latest_height,
            client_height: client_state.latest_height,
        })?;
    }

    if client_state.upgrade_path.is_empty() {
        return Err(UpgradeClientError::MissingUpgradePath)?;
    }

    let upgrade_path_prefix =
        CommitmentPrefix::try_from(format!("{}/", client_state.upgrade_path).into_bytes())
            .map_err(|e| UpgradeClientError::InvalidUpgradePath {
                description: e.to_string(),
            })?;

    let last_height = client_state.latest_height.revision_height();

    let client_path = Path::UpgradeClientState(UpgradeClientStatePath {
        upgrade_path: client_state.upgrade_path.clone(),
        height: last_height,
    });
    merkle::verify_membership(
        &proof_upgrade_client,
        root,
        &upgrade_path_prefix,
        &client_path.to_bytes(),
        &encode_to_vec(&upgraded_client_state),
    )
    .map_err(UpgradeClientError::InvalidUpgradeClientStateProof)?;

    let consensus_path = Path::UpgradeConsensusState(UpgradeConsensusStatePath {
        upgrade_path: client_state.upgrade_path.clone(),
        height: last_height,
    });
    merkle::verify_membership(
        &proof_upgrade_consensus_state,
        root,
        &upgrade_path_prefix,
        &consensus_path.to_bytes(),
        &encode_to_vec(&upgraded_consensus_state),
    )
    .map_err(UpgradeClientError::InvalidUpgradeConsensusStateProof)?;

    Ok(())
}

/// Verify membership of the given value against the header-chain
/// client's commitment root.
pub fn verify_membership(
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
    value: Vec<u8>,
) -> Result<(), ClientError> {
    merkle::verify_membership(proof, root, prefix, &path.to_bytes(), &value)?;
    Ok(())
}

/// Verify that the given path is absent from the header-chain client's
/// commitment root.
pub fn verify_non_membership(
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
) -> Result<(), ClientError> {
    merkle::verify_non_membership(proof, root, prefix, &path.to_bytes())?;
    Ok(())
}
