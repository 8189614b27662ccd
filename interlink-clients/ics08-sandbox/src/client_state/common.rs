use interlink_core_client::context::client_state::ClientStateCommon;
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use interlink_core_host::types::identifiers::ClientType;
use interlink_core_host::types::path::Path;
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use crate::types::error::SandboxError;
use crate::types::{client_type, ClientState, ConsensusState};

impl ClientStateCommon for ClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        ConsensusState::try_from(consensus_state)?;
        Ok(())
    }

    fn client_type(&self) -> ClientType {
        client_type()
    }

    fn latest_height(&self) -> Height {
        self.latest_height
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        if self.latest_height < proof_height {
            return Err(ClientError::InvalidProofHeight {
                actual: proof_height,
                expected: self.latest_height,
            });
        }
        Ok(())
    }

    fn verify_membership(
        &self,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        _path: Path,
        _value: Vec<u8>,
    ) -> Result<(), ClientError> {
        Err(SandboxError::RootProofUnsupported.into())
    }

    fn verify_non_membership(
        &self,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        _path: Path,
    ) -> Result<(), ClientError> {
        Err(SandboxError::RootProofUnsupported.into())
    }
}
