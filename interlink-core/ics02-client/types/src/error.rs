//! Defines the client error type

use core::convert::Infallible;

use displaydoc::Display;
use interlink_core_commitment_types::error::CommitmentError;
use interlink_core_host_types::error::IdentifierError;
use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{DecodingError, Timestamp, TimestampError};

use crate::height::Height;
use crate::Status;

/// Encodes all the possible client errors
#[derive(Debug, Display)]
pub enum ClientError {
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    Identifier(IdentifierError),
    /// upgrade client error: `{0}`
    Upgrade(UpgradeClientError),
    /// timestamp error: `{0}`
    Timestamp(TimestampError),
    /// invalid trust threshold: `{numerator}`/`{denominator}`
    InvalidTrustThreshold { numerator: u64, denominator: u64 },
    /// invalid client state type: `{0}`
    InvalidClientStateType(String),
    /// invalid consensus state type: `{0}`
    InvalidConsensusStateType(String),
    /// invalid client message type: `{0}`
    InvalidClientMessageType(String),
    /// invalid height; cannot be zero or negative
    InvalidHeight,
    /// invalid status: `{0}`
    InvalidStatus(String),
    /// invalid header: `{description}`
    InvalidHeader { description: String },
    /// invalid misbehaviour: `{description}`
    InvalidMisbehaviour { description: String },
    /// invalid client state: `{description}`
    InvalidClientState { description: String },
    /// invalid consensus state: `{description}`
    InvalidConsensusState { description: String },
    /// client `{client_id}` is frozen
    ClientFrozen { client_id: ClientId },
    /// client is not active; status is `{status}`
    ClientNotActive { status: Status },
    /// client state not found: `{client_id}`
    ClientStateNotFound { client_id: ClientId },
    /// client state already exists: `{client_id}`
    ClientStateAlreadyExists { client_id: ClientId },
    /// consensus state not found for client `{client_id}` at height `{height}`
    ConsensusStateNotFound { client_id: ClientId, height: Height },
    /// missing local consensus state at `{0}`
    MissingLocalConsensusState(Height),
    /// missing update metadata for client `{client_id}` at height `{height}`
    MissingUpdateMeta { client_id: ClientId, height: Height },
    /// invalid proof height; expected `{actual}` <= `{expected}`
    InvalidProofHeight { actual: Height, expected: Height },
    /// invalid consensus state timestamp: `{0}`
    InvalidConsensusStateTimestamp(Timestamp),
    /// invalid proof: `{0}`
    InvalidProof(CommitmentError),
    /// delay period has not elapsed: earliest valid time `{earliest_time}`, earliest valid height `{earliest_height}`
    DelayPeriodNotElapsed {
        earliest_time: Timestamp,
        earliest_height: Height,
    },
    /// client-specific error: `{description}`
    ClientSpecific { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl From<&'static str> for ClientError {
    fn from(s: &'static str) -> Self {
        Self::Other {
            description: s.to_string(),
        }
    }
}

impl From<Infallible> for ClientError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl From<CommitmentError> for ClientError {
    fn from(e: CommitmentError) -> Self {
        Self::InvalidProof(e)
    }
}

impl From<DecodingError> for ClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ClientError {
    fn from(e: IdentifierError) -> Self {
        Self::Identifier(e)
    }
}

impl From<TimestampError> for ClientError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidProof(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::Identifier(e) => Some(e),
            Self::Upgrade(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            _ => None,
        }
    }
}

/// Encodes all the possible upgrade client errors
#[derive(Debug, Display)]
pub enum UpgradeClientError {
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// client type `{client_type}` does not support upgrades
    UnsupportedUpgrade { client_type: String },
    /// invalid proof for the upgraded client state: `{0}`
    InvalidUpgradeClientStateProof(CommitmentError),
    /// invalid proof for the upgraded consensus state: `{0}`
    InvalidUpgradeConsensusStateProof(CommitmentError),
    /// invalid upgrade path: `{description}`
    InvalidUpgradePath { description: String },
    /// missing upgrade path
    MissingUpgradePath,
    /// insufficient upgrade client height `{upgraded_height}`; must be greater than current client height `{client_height}`
    InsufficientUpgradeHeight {
        upgraded_height: Height,
        client_height: Height,
    },
}

impl From<UpgradeClientError> for ClientError {
    fn from(e: UpgradeClientError) -> Self {
        ClientError::Upgrade(e)
    }
}

impl From<DecodingError> for UpgradeClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for UpgradeClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Decoding(e) => Some(e),
            Self::InvalidUpgradeClientStateProof(e) => Some(e),
            Self::InvalidUpgradeConsensusStateProof(e) => Some(e),
            _ => None,
        }
    }
}
