//! Defines the solo `ConsensusState` type

use ed25519_dalek::VerifyingKey;
use interlink_core_client::types::error::ClientError;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Timestamp};

use crate::types::error::SoloError;

pub const SOLO_CONSENSUS_STATE_TYPE_URL: &str = "/interlink.lightclients.solo.v1.ConsensusState";

/// The signer a solo client currently trusts.
///
/// The commitment root of a solo consensus state is the signer's public
/// key: proofs are signatures, and the key is what they verify against.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConsensusState {
    pub root: CommitmentRoot,
    pub diversifier: String,
    pub timestamp: Timestamp,
}

impl ConsensusState {
    pub fn new(public_key: &VerifyingKey, diversifier: String, timestamp: Timestamp) -> Self {
        Self {
            root: CommitmentRoot::from_bytes(public_key.as_bytes()),
            diversifier,
            timestamp,
        }
    }

    pub fn public_key(&self) -> Result<VerifyingKey, SoloError> {
        verifying_key(self.root.as_bytes())
    }

    pub fn validate_basic(&self) -> Result<(), SoloError> {
        if self.diversifier.trim().is_empty() {
            return Err(SoloError::EmptyDiversifier);
        }
        self.public_key().map(|_| ())
    }
}

/// Parses raw bytes as an ed25519 verifying key.
pub fn verifying_key(bytes: &[u8]) -> Result<VerifyingKey, SoloError> {
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| SoloError::InvalidPublicKeyLength(bytes.len()))?;
    VerifyingKey::from_bytes(&bytes).map_err(SoloError::InvalidPublicKey)
}

impl AnyCodec for ConsensusState {
    const TYPE_URL: &'static str = SOLO_CONSENSUS_STATE_TYPE_URL;
}

impl TryFrom<Any> for ConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != SOLO_CONSENSUS_STATE_TYPE_URL {
            return Err(ClientError::InvalidConsensusStateType(raw.type_url));
        }
        Ok(Self::decode_vec(&raw.value)?)
    }
}

impl From<ConsensusState> for Any {
    fn from(consensus_state: ConsensusState) -> Self {
        consensus_state.to_any()
    }
}
