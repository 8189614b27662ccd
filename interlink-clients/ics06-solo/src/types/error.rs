//! Defines the solo light client's error type

use displaydoc::Display;
use ed25519_dalek::SignatureError;
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_primitives::prelude::*;
use interlink_primitives::{DecodingError, Timestamp};

/// The main error type for the solo light client
#[derive(Debug, Display)]
pub enum SoloError {
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// sequence cannot be zero
    ZeroSequence,
    /// solo client heights carry revision 0; got `{0}`
    NonZeroRevision(Height),
    /// empty diversifier
    EmptyDiversifier,
    /// public key must be 32 bytes; got `{0}`
    InvalidPublicKeyLength(usize),
    /// invalid public key: `{0}`
    InvalidPublicKey(SignatureError),
    /// empty signature
    EmptySignature,
    /// signature verification failed: `{0}`
    InvalidSignature(SignatureError),
    /// empty proof
    EmptyProof,
    /// timestamp `{timestamp}` is earlier than the consensus state timestamp `{consensus_timestamp}`
    TimestampBeforeConsensusState {
        timestamp: Timestamp,
        consensus_timestamp: Timestamp,
    },
    /// misbehaviour sequence `{misbehaviour}` does not match the client sequence `{client}`
    MismatchedSequence { misbehaviour: u64, client: u64 },
    /// misbehaviour signatures sign identical data
    IdenticalSignatureData,
}

#[cfg(feature = "std")]
impl std::error::Error for SoloError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Decoding(e) => Some(e),
            Self::InvalidPublicKey(e) | Self::InvalidSignature(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodingError> for SoloError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<SoloError> for ClientError {
    fn from(e: SoloError) -> Self {
        Self::ClientSpecific {
            description: e.to_string(),
        }
    }
}

impl SoloError {
    pub fn into_header_error(self) -> ClientError {
        ClientError::InvalidHeader {
            description: self.to_string(),
        }
    }

    pub fn into_misbehaviour_error(self) -> ClientError {
        ClientError::InvalidMisbehaviour {
            description: self.to_string(),
        }
    }
}
