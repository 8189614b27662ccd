use interlink_core_client::context::client_state::ClientStateValidation;
use interlink_core_client::context::ClientValidationContext;
use interlink_core_client::types::error::{ClientError, UpgradeClientError};
use interlink_core_client::types::Status;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host::types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, Any};

use crate::types::error::SoloError;
use crate::types::{
    verify_signature, verifying_key, ClientState, Header, HeaderData, Misbehaviour,
    SignBytes, SignatureAndData, SENTINEL_HEADER_PATH, SOLO_CLIENT_TYPE, SOLO_HEADER_TYPE_URL,
    SOLO_MISBEHAVIOUR_TYPE_URL,
};

impl<V> ClientStateValidation<V> for ClientState
where
    V: ClientValidationContext,
{
    /// A header is valid if the currently registered public key signed over
    /// the new public key at the current sequence. Misbehaviour is valid if
    /// the current key signed two different messages at one sequence.
    fn verify_client_message(
        &self,
        _ctx: &V,
        _client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        match client_message.type_url.as_str() {
            SOLO_HEADER_TYPE_URL => {
                let header = Header::try_from(client_message)?;
                verify_header(self, &header).map_err(SoloError::into_header_error)
            }
            SOLO_MISBEHAVIOUR_TYPE_URL => {
                let misbehaviour = Misbehaviour::try_from(client_message)?;
                verify_misbehaviour(self, &misbehaviour)
                    .map_err(SoloError::into_misbehaviour_error)
            }
            _ => Err(ClientError::InvalidClientMessageType(
                client_message.type_url,
            )),
        }
    }

    /// Verified misbehaviour is always misbehaviour; a header never is.
    fn check_for_misbehaviour(
        &self,
        _ctx: &V,
        _client_id: &ClientId,
        client_message: Any,
    ) -> Result<bool, ClientError> {
        match client_message.type_url.as_str() {
            SOLO_HEADER_TYPE_URL => Ok(false),
            SOLO_MISBEHAVIOUR_TYPE_URL => Ok(true),
            _ => Err(ClientError::InvalidClientMessageType(
                client_message.type_url,
            )),
        }
    }

    /// A solo client never expires.
    fn status(&self, _ctx: &V, _client_id: &ClientId) -> Result<Status, ClientError> {
        if self.is_frozen {
            return Ok(Status::Frozen);
        }
        Ok(Status::Active)
    }

    fn verify_upgrade_client(
        &self,
        _ctx: &V,
        _client_id: &ClientId,
        _upgraded_client_state: Any,
        _upgraded_consensus_state: Any,
        _proof_upgrade_client: CommitmentProofBytes,
        _proof_upgrade_consensus_state: CommitmentProofBytes,
    ) -> Result<(), ClientError> {
        Err(UpgradeClientError::UnsupportedUpgrade {
            client_type: SOLO_CLIENT_TYPE.to_string(),
        }
        .into())
    }
}

/// Checks the header is signed by the current key over the incoming key and
/// diversifier at the current sequence.
pub fn verify_header(client_state: &ClientState, header: &Header) -> Result<(), SoloError> {
    let consensus_state = &client_state.consensus_state;

    // assert update timestamp is not less than current consensus state timestamp
    if header.timestamp < consensus_state.timestamp {
        return Err(SoloError::TimestampBeforeConsensusState {
            timestamp: header.timestamp,
            consensus_timestamp: consensus_state.timestamp,
        });
    }

    if header.new_diversifier.trim().is_empty() {
        return Err(SoloError::EmptyDiversifier);
    }
    verifying_key(&header.new_public_key)?;

    let header_data = HeaderData {
        new_public_key: header.new_public_key,
        new_diversifier: header.new_diversifier.clone(),
    };
    let sign_bytes = SignBytes {
        sequence: client_state.sequence.revision_height(),
        timestamp: header.timestamp,
        diversifier: consensus_state.diversifier.clone(),
        path: SENTINEL_HEADER_PATH.to_vec(),
        data: encode_to_vec(&header_data),
    };

    verify_signature(&consensus_state.public_key()?, &sign_bytes, &header.signature)
}

/// Checks both signatures of the evidence were made by the current key at
/// the client's sequence.
pub fn verify_misbehaviour(
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), SoloError> {
    misbehaviour.validate_basic()?;

    let client_sequence = client_state.sequence.revision_height();
    if misbehaviour.sequence != client_sequence {
        return Err(SoloError::MismatchedSequence {
            misbehaviour: misbehaviour.sequence,
            client: client_sequence,
        });
    }

    verify_signature_and_data(client_state, misbehaviour.sequence, &misbehaviour.signature_one)?;
    verify_signature_and_data(client_state, misbehaviour.sequence, &misbehaviour.signature_two)
}

fn verify_signature_and_data(
    client_state: &ClientState,
    sequence: u64,
    signature_and_data: &SignatureAndData,
) -> Result<(), SoloError> {
    let sign_bytes = SignBytes {
        sequence,
        timestamp: signature_and_data.timestamp,
        diversifier: client_state.consensus_state.diversifier.clone(),
        path: signature_and_data.path.clone(),
        data: signature_and_data.data.clone(),
    };

    verify_signature(
        &client_state.consensus_state.public_key()?,
        &sign_bytes,
        &signature_and_data.signature,
    )
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use interlink_core_client::types::Height;
    use interlink_primitives::Timestamp;

    use super::*;
    use crate::types::ConsensusState;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn at(nanos: u64) -> Timestamp {
        Timestamp::from_nanoseconds(nanos).unwrap()
    }

    fn client_state() -> ClientState {
        ClientState::new(
            Height::new(0, 3).unwrap(),
            ConsensusState::new(&key(1).verifying_key(), "solo".to_string(), at(100)),
        )
        .unwrap()
    }

    fn signed_header(signer: &SigningKey, sequence: u64, timestamp: Timestamp) -> Header {
        let new_public_key = key(2).verifying_key().to_bytes();
        let data = HeaderData {
            new_public_key,
            new_diversifier: "solo-2".to_string(),
        };
        let sign_bytes = SignBytes {
            sequence,
            timestamp,
            diversifier: "solo".to_string(),
            path: SENTINEL_HEADER_PATH.to_vec(),
            data: encode_to_vec(&data),
        };
        Header {
            timestamp,
            signature: signer.sign(&sign_bytes.to_vec()).to_bytes().to_vec(),
            new_public_key,
            new_diversifier: "solo-2".to_string(),
        }
    }

    fn signature_and_data(data: &[u8]) -> SignatureAndData {
        let sign_bytes = SignBytes {
            sequence: 3,
            timestamp: at(200),
            diversifier: "solo".to_string(),
            path: b"path".to_vec(),
            data: data.to_vec(),
        };
        SignatureAndData {
            signature: key(1).sign(&sign_bytes.to_vec()).to_bytes().to_vec(),
            path: b"path".to_vec(),
            data: data.to_vec(),
            timestamp: at(200),
        }
    }

    #[test]
    fn test_header_signed_by_current_key_verifies() {
        verify_header(&client_state(), &signed_header(&key(1), 3, at(150))).unwrap();
    }

    #[test]
    fn test_header_rejections() {
        // signed by a key the client does not trust
        assert!(matches!(
            verify_header(&client_state(), &signed_header(&key(9), 3, at(150))),
            Err(SoloError::InvalidSignature(_))
        ));
        // signed for a stale sequence
        assert!(matches!(
            verify_header(&client_state(), &signed_header(&key(1), 2, at(150))),
            Err(SoloError::InvalidSignature(_))
        ));
        // older than the consensus state
        assert!(matches!(
            verify_header(&client_state(), &signed_header(&key(1), 3, at(50))),
            Err(SoloError::TimestampBeforeConsensusState { .. })
        ));
    }

    #[test]
    fn test_double_signing_is_misbehaviour() {
        let misbehaviour = Misbehaviour {
            client_id: ClientId::new(SOLO_CLIENT_TYPE, 0).unwrap(),
            sequence: 3,
            signature_one: signature_and_data(b"one"),
            signature_two: signature_and_data(b"two"),
        };
        verify_misbehaviour(&client_state(), &misbehaviour).unwrap();

        let identical = Misbehaviour {
            signature_two: signature_and_data(b"one"),
            ..misbehaviour.clone()
        };
        assert!(matches!(
            verify_misbehaviour(&client_state(), &identical),
            Err(SoloError::IdenticalSignatureData)
        ));

        let wrong_sequence = Misbehaviour {
            sequence: 4,
            ..misbehaviour
        };
        assert!(matches!(
            verify_misbehaviour(&client_state(), &wrong_sequence),
            Err(SoloError::MismatchedSequence { .. })
        ));
    }
}
