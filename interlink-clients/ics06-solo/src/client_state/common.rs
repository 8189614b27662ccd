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

use crate::types::error::SoloError;
use crate::types::{
    client_type, verify_signature, verifying_key, ClientState, ConsensusState, SignBytes,
    TimestampedSignatureData,
};

impl ClientStateCommon for ClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        let consensus_state = ConsensusState::try_from(consensus_state)?;
        consensus_state
            .validate_basic()
            .map_err(|e| ClientError::InvalidConsensusState {
                description: e.to_string(),
            })
    }

    fn client_type(&self) -> ClientType {
        client_type()
    }

    fn latest_height(&self) -> Height {
        self.sequence
    }

    /// Solo proofs are signatures at the current sequence, so only the
    /// latest height can be proven against.
    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        if proof_height != self.sequence {
            return Err(ClientError::InvalidProofHeight {
                actual: proof_height,
                expected: self.sequence,
            });
        }
        Ok(())
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        verify_signed_path(self, prefix, proof, root, path, value).map_err(Into::into)
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        verify_signed_path(self, prefix, proof, root, path, Vec::new()).map_err(Into::into)
    }
}

/// Verifies that the key committed in `root` signed `value` under
/// `prefix ++ path` at the client's sequence. An empty `value` attests
/// absence.
pub fn verify_signed_path(
    client_state: &ClientState,
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
    value: Vec<u8>,
) -> Result<(), SoloError> {
    let signed = TimestampedSignatureData::from_proof(proof)?;

    let consensus_timestamp = client_state.consensus_state.timestamp;
    if signed.timestamp < consensus_timestamp {
        return Err(SoloError::TimestampBeforeConsensusState {
            timestamp: signed.timestamp,
            consensus_timestamp,
        });
    }

    let sign_bytes = SignBytes {
        sequence: client_state.sequence.revision_height(),
        timestamp: signed.timestamp,
        diversifier: client_state.consensus_state.diversifier.clone(),
        path: prefix.apply(path.to_bytes().as_slice()),
        data: value,
    };

    let public_key = verifying_key(root.as_bytes())?;

    verify_signature(&public_key, &sign_bytes, &signed.signature_data)
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use interlink_core_host::types::identifiers::{ChannelId, PortId, Sequence};
    use interlink_core_host::types::path::CommitmentPath;
    use interlink_primitives::Timestamp;

    use super::*;

    fn key() -> SigningKey {
        SigningKey::from_bytes(&[1; 32])
    }

    fn client_state() -> ClientState {
        ClientState::new(
            Height::new(0, 5).unwrap(),
            ConsensusState::new(
                &key().verifying_key(),
                "solo".to_string(),
                Timestamp::from_nanoseconds(100).unwrap(),
            ),
        )
        .unwrap()
    }

    fn path() -> Path {
        Path::Commitment(CommitmentPath::new(
            &PortId::transfer(),
            &ChannelId::new(0),
            Sequence::from(1),
        ))
    }

    fn proof(prefix: &CommitmentPrefix, sequence: u64, value: &[u8]) -> CommitmentProofBytes {
        let timestamp = Timestamp::from_nanoseconds(200).unwrap();
        let sign_bytes = SignBytes {
            sequence,
            timestamp,
            diversifier: "solo".to_string(),
            path: prefix.apply(path().to_bytes().as_slice()),
            data: value.to_vec(),
        };
        TimestampedSignatureData {
            signature_data: key().sign(&sign_bytes.to_vec()).to_bytes().to_vec(),
            timestamp,
        }
        .to_vec()
        .try_into()
        .unwrap()
    }

    #[test]
    fn test_signed_value_verifies_at_current_sequence() {
        let client_state = client_state();
        let prefix = CommitmentPrefix::try_from(b"ibc".to_vec()).unwrap();
        let root = client_state.consensus_state.root.clone();

        client_state
            .verify_membership(&prefix, &proof(&prefix, 5, b"value"), &root, path(), b"value".to_vec())
            .unwrap();

        // a signature over another value or an old sequence does not verify
        assert!(client_state
            .verify_membership(&prefix, &proof(&prefix, 5, b"other"), &root, path(), b"value".to_vec())
            .is_err());
        assert!(client_state
            .verify_membership(&prefix, &proof(&prefix, 4, b"value"), &root, path(), b"value".to_vec())
            .is_err());

        client_state
            .verify_non_membership(&prefix, &proof(&prefix, 5, b""), &root, path())
            .unwrap();
    }

    #[test]
    fn test_only_latest_height_is_provable() {
        let client_state = client_state();
        assert!(client_state
            .validate_proof_height(Height::new(0, 5).unwrap())
            .is_ok());
        assert!(client_state
            .validate_proof_height(Height::new(0, 4).unwrap())
            .is_err());
    }
}
