//! Defines the connection error type

use displaydoc::Display;
use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::Height;
use interlink_core_host_types::error::IdentifierError;
use interlink_core_host_types::identifiers::{ClientId, ConnectionId};
use interlink_primitives::prelude::*;
use interlink_primitives::{Timestamp, TimestampError};

use crate::version::Version;

#[derive(Debug, Display)]
pub enum ConnectionError {
    /// client error: `{0}`
    Client(ClientError),
    /// invalid connection state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// consensus height claimed by the client on the other party is too advanced: `{target_height}` (host chain current height: `{current_height}`)
    InvalidConsensusHeight {
        target_height: Height,
        current_height: Height,
    },
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// empty supported versions
    EmptyVersions,
    /// single version must be negotiated on connection before opening channel
    InvalidVersionLength,
    /// version \"`{version}`\" not supported
    VersionNotSupported { version: Version },
    /// no common version
    NoCommonVersion,
    /// empty supported features
    EmptyFeatures,
    /// feature \"`{feature}`\" not supported
    FeatureNotSupported { feature: String },
    /// no common features
    NoCommonFeatures,
    /// no connection was found for the connection id `{connection_id}`
    ConnectionNotFound { connection_id: ConnectionId },
    /// connection `{connection_id}` already exists
    ConnectionAlreadyExists { connection_id: ConnectionId },
    /// invalid counterparty
    InvalidCounterparty,
    /// the connection end proof verification failed: `{0}`
    ConnectionVerificationFailure(ClientError),
    /// the consensus proof verification failed (height: `{height}`), client error: `{client_error}`
    ConsensusStateVerificationFailure {
        height: Height,
        client_error: ClientError,
    },
    /// the client state proof verification failed for client id `{client_id}`, client error: `{client_error}`
    ClientStateVerificationFailure {
        client_id: ClientId,
        client_error: ClientError,
    },
    /// invalid self client state: `{description}`
    InvalidSelfClientState { description: String },
    /// not enough blocks elapsed, current height `{current_host_height}` is still less than earliest acceptable height `{earliest_valid_height}`
    NotEnoughBlocksElapsed {
        current_host_height: Height,
        earliest_valid_height: Height,
    },
    /// not enough time elapsed, current timestamp `{current_host_time}` is still less than earliest acceptable timestamp `{earliest_valid_time}`
    NotEnoughTimeElapsed {
        current_host_time: Timestamp,
        earliest_valid_time: Timestamp,
    },
    /// timestamp error: `{0}`
    Timestamp(TimestampError),
    /// connection counter overflow error
    CounterOverflow,
    /// other error: `{description}`
    Other { description: String },
}

impl From<ClientError> for ConnectionError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<IdentifierError> for ConnectionError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

impl From<TimestampError> for ConnectionError {
    fn from(e: TimestampError) -> Self {
        Self::Timestamp(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Client(e)
            | Self::ConnectionVerificationFailure(e)
            | Self::ConsensusStateVerificationFailure {
                client_error: e, ..
            }
            | Self::ClientStateVerificationFailure {
                client_error: e, ..
            } => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::Timestamp(e) => Some(e),
            _ => None,
        }
    }
}
