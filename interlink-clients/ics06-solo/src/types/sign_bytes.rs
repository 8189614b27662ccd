//! The payloads a solo signer signs.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, DecodingError, Timestamp};

use crate::types::error::SoloError;

/// Path the signer uses when signing a header.
pub const SENTINEL_HEADER_PATH: &[u8] = b"solo:header";

/// The bytes every solo signature covers.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct SignBytes {
    pub sequence: u64,
    pub timestamp: Timestamp,
    /// Lets one key serve several clients without two of them sharing
    /// signatures.
    pub diversifier: String,
    pub path: Vec<u8>,
    /// Empty for a proof of absence.
    pub data: Vec<u8>,
}

impl SignBytes {
    pub fn to_vec(&self) -> Vec<u8> {
        encode_to_vec(self)
    }
}

/// The data signed by a header: the key and diversifier taking over.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct HeaderData {
    pub new_public_key: [u8; 32],
    pub new_diversifier: String,
}

/// The content of a solo state proof: a signature over [`SignBytes`] and the
/// timestamp it was made at.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct TimestampedSignatureData {
    pub signature_data: Vec<u8>,
    pub timestamp: Timestamp,
}

impl TimestampedSignatureData {
    pub fn from_proof(proof: &CommitmentProofBytes) -> Result<Self, SoloError> {
        let proof: &[u8] = proof.as_ref();
        if proof.is_empty() {
            return Err(SoloError::EmptyProof);
        }
        let data: Self = borsh::from_slice(proof).map_err(DecodingError::invalid_raw_data)?;
        if data.signature_data.is_empty() {
            return Err(SoloError::EmptySignature);
        }
        Ok(data)
    }

    pub fn to_vec(&self) -> Vec<u8> {
        encode_to_vec(self)
    }
}

/// Verifies that `public_key` produced `signature` over `sign_bytes`.
pub fn verify_signature(
    public_key: &VerifyingKey,
    sign_bytes: &SignBytes,
    signature: &[u8],
) -> Result<(), SoloError> {
    if signature.is_empty() {
        return Err(SoloError::EmptySignature);
    }
    let signature = Signature::from_slice(signature).map_err(SoloError::InvalidSignature)?;
    public_key
        .verify(&sign_bytes.to_vec(), &signature)
        .map_err(SoloError::InvalidSignature)
}
