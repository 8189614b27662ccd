//! Defines core commitment types

use core::fmt;

use interlink_primitives::prelude::*;
use prost::Message;
use subtle_encoding::{Encoding, Hex};

use crate::error::CommitmentError;

/// Encodes a commitment root; most often a Merkle tree root hash.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitmentRoot {
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = Hex::upper_case()
            .encode_to_string(&self.bytes)
            .map_err(|_| fmt::Error)?;
        f.debug_tuple("CommitmentRoot").field(&hex).finish()
    }
}

impl CommitmentRoot {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Vec::from(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

/// Demonstrates membership or non-membership of a key against a known
/// commitment root. Opaque to the engine; the proof verifier decodes it as an
/// `ics23::CommitmentProof`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, PartialEq, Eq, derive_more::Into, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitmentProofBytes {
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = Hex::upper_case()
            .encode_to_string(&self.bytes)
            .map_err(|_| fmt::Error)?;
        f.debug_tuple("CommitmentProof").field(&hex).finish()
    }
}

impl AsRef<[u8]> for CommitmentProofBytes {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl CommitmentProofBytes {
    /// Decodes the proof as an `ics23::CommitmentProof`.
    pub fn to_ics23(&self) -> Result<ics23::CommitmentProof, CommitmentError> {
        ics23::CommitmentProof::decode(self.bytes.as_slice())
            .map_err(|e| CommitmentError::DecodingFailure(e.to_string()))
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::EmptyCommitmentProof)
        } else {
            Ok(Self { bytes })
        }
    }
}

impl TryFrom<ics23::CommitmentProof> for CommitmentProofBytes {
    type Error = CommitmentError;

    fn try_from(proof: ics23::CommitmentProof) -> Result<Self, Self::Error> {
        proof.encode_to_vec().try_into()
    }
}

/// Defines the store prefix under which a chain commits the engine's state.
/// A proven key is the prefix followed by the rendered path.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitmentPrefix {
    bytes: Vec<u8>,
}

impl CommitmentPrefix {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Builds the store key proven for `path` under this prefix.
    pub fn apply(&self, path: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.bytes.len() + path.len());
        key.extend_from_slice(&self.bytes);
        key.extend_from_slice(path);
        key
    }
}

impl TryFrom<Vec<u8>> for CommitmentPrefix {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::EmptyCommitmentPrefix)
        } else {
            Ok(Self { bytes })
        }
    }
}

impl fmt::Debug for CommitmentPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match core::str::from_utf8(self.as_bytes()) {
            Ok(s) => write!(f, "{s}"),
            Err(_e) => write!(f, "<not valid UTF8: {:?}>", self.as_bytes()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_rejected() {
        assert!(CommitmentPrefix::try_from(Vec::new()).is_err());
        assert!(CommitmentProofBytes::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_prefix_apply() {
        let prefix = CommitmentPrefix::try_from(b"ibc/".to_vec()).unwrap();
        assert_eq!(prefix.apply(b"connections/connection-0"), b"ibc/connections/connection-0".to_vec());
        assert_eq!(std::format!("{prefix:?}"), "ibc/");
    }
}
