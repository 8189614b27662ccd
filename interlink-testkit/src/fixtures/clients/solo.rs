//! A solo signer producing headers, proofs and misbehaviour for solo
//! clients.

use ed25519_dalek::{Signer, SigningKey};
use interlink_clients::solo::types::{
    ClientState, ConsensusState, Header, HeaderData, Misbehaviour, SignBytes, SignatureAndData,
    TimestampedSignatureData, SENTINEL_HEADER_PATH,
};
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::{CommitmentPrefix, CommitmentProofBytes};
use interlink_core::host::types::identifiers::ClientId;
use interlink_core::host::types::path::Path;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{encode_to_vec, Timestamp};

#[derive(Debug)]
pub struct SoloSigner {
    key: SigningKey,
    diversifier: String,
}

impl SoloSigner {
    pub fn new(seed: u8, diversifier: &str) -> Self {
        Self {
            key: SigningKey::from_bytes(&[seed; 32]),
            diversifier: diversifier.to_string(),
        }
    }

    pub fn diversifier(&self) -> &str {
        &self.diversifier
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.key.verifying_key().to_bytes()
    }

    pub fn consensus_state(&self, timestamp: Timestamp) -> ConsensusState {
        ConsensusState::new(&self.key.verifying_key(), self.diversifier.clone(), timestamp)
    }

    /// A client trusting this signer at `sequence`.
    pub fn client_state(&self, sequence: u64, timestamp: Timestamp) -> ClientState {
        ClientState::new(
            Height::new(0, sequence).expect("Never fails"),
            self.consensus_state(timestamp),
        )
        .expect("Never fails")
    }

    /// Signs `data` under `path` at `sequence`.
    pub fn sign(&self, sequence: u64, timestamp: Timestamp, path: Vec<u8>, data: Vec<u8>) -> Vec<u8> {
        let sign_bytes = SignBytes {
            sequence,
            timestamp,
            diversifier: self.diversifier.clone(),
            path,
            data,
        };
        self.key.sign(&sign_bytes.to_vec()).to_bytes().to_vec()
    }

    /// A header handing the client over to `next` at `sequence`.
    pub fn header(&self, sequence: u64, timestamp: Timestamp, next: &SoloSigner) -> Header {
        let header_data = HeaderData {
            new_public_key: next.public_key(),
            new_diversifier: next.diversifier.clone(),
        };
        Header {
            timestamp,
            signature: self.sign(
                sequence,
                timestamp,
                SENTINEL_HEADER_PATH.to_vec(),
                encode_to_vec(&header_data),
            ),
            new_public_key: header_data.new_public_key,
            new_diversifier: header_data.new_diversifier,
        }
    }

    /// A proof that `value` is stored at `path`. An empty `value` proves
    /// absence.
    pub fn proof(
        &self,
        sequence: u64,
        timestamp: Timestamp,
        prefix: &CommitmentPrefix,
        path: &Path,
        value: Vec<u8>,
    ) -> CommitmentProofBytes {
        let signature_data = self.sign(
            sequence,
            timestamp,
            prefix.apply(path.to_bytes().as_slice()),
            value,
        );
        TimestampedSignatureData {
            signature_data,
            timestamp,
        }
        .to_vec()
        .try_into()
        .expect("Never fails")
    }

    /// Two signatures over different data at `sequence`.
    pub fn misbehaviour(&self, client_id: ClientId, sequence: u64, timestamp: Timestamp) -> Misbehaviour {
        let signature_and_data = |data: &[u8]| SignatureAndData {
            signature: self.sign(sequence, timestamp, b"solo/equivocation".to_vec(), data.to_vec()),
            path: b"solo/equivocation".to_vec(),
            data: data.to_vec(),
            timestamp,
        };

        Misbehaviour {
            client_id,
            sequence,
            signature_one: signature_and_data(b"one"),
            signature_two: signature_and_data(b"two"),
        }
    }
}
