//! Defines the main channel, packet and capability error types

use displaydoc::Display;
use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::Height;
use interlink_core_host_types::error::IdentifierError;
use interlink_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use interlink_primitives::prelude::*;
use interlink_primitives::{Timestamp, TimestampError};

use super::timeout::TimeoutHeight;
use crate::commitment::PacketCommitment;
use crate::timeout::TimeoutTimestamp;
use crate::Version;

#[derive(Debug, Display)]
pub enum ChannelError {
    /// application module error: `{description}`
    AppModule { description: String },
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid channel state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// invalid connection hops length: expected `{expected}`, actual `{actual}`
    InvalidConnectionHopsLength { expected: u64, actual: u64 },
    /// channel is closed
    ChannelClosed,
    /// channel end has no counterparty channel id
    MissingCounterparty,
    /// connection `{connection_id}` has no counterparty connection id
    UndefinedConnectionCounterparty { connection_id: ConnectionId },
    /// connection `{connection_id}` is not open
    ConnectionNotOpen { connection_id: ConnectionId },
    /// unsupported version: expected `{expected}`, actual `{actual}`
    UnsupportedVersion { expected: Version, actual: Version },
    /// application module rejected version `{proposed}`
    VersionNegotiationFailed { proposed: Version },
    /// non-existent channel end: (`{port_id}`, `{channel_id}`)
    NonexistentChannel {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// failed proof verification: `{0}`
    FailedProofVerification(ClientError),
    /// channel counter overflowed
    CounterOverflow,
}

#[derive(Debug, Display)]
pub enum PacketError {
    /// application module error: `{description}`
    AppModule { description: String },
    /// channel error: `{0}`
    Channel(ChannelError),
    /// invalid timeout: timeout height `{timeout_height}` and timeout timestamp `{timeout_timestamp}` already elapsed at counterparty height `{chain_height}` and time `{chain_timestamp}`
    InvalidTimeout {
        timeout_height: TimeoutHeight,
        timeout_timestamp: TimeoutTimestamp,
        chain_height: Height,
        chain_timestamp: Timestamp,
    },
    /// packet timed out: timeout height `{timeout_height}` or timeout timestamp `{timeout_timestamp}` reached at height `{chain_height}` and time `{chain_timestamp}`
    TimeoutElapsed {
        timeout_height: TimeoutHeight,
        timeout_timestamp: TimeoutTimestamp,
        chain_height: Height,
        chain_timestamp: Timestamp,
    },
    /// packet timeout height `{timeout_height}` > chain height `{chain_height}` and timeout timestamp `{timeout_timestamp}` > chain timestamp `{chain_timestamp}`
    TimeoutNotElapsed {
        timeout_height: TimeoutHeight,
        chain_height: Height,
        timeout_timestamp: TimeoutTimestamp,
        chain_timestamp: Timestamp,
    },
    /// packet sequence out of order: expected `{expected}`, actual `{actual}`
    PacketSequenceOutOfOrder {
        expected: Sequence,
        actual: Sequence,
    },
    /// packet `{0}` was already received
    PacketAlreadyReceived(Sequence),
    /// no commitment found for packet `{0}`; it was already acknowledged or timed out
    PacketCommitmentNotFound(Sequence),
    /// packet receipt not found for sequence `{0}`
    PacketReceiptNotFound(Sequence),
    /// packet acknowledgement not found for sequence `{0}`
    PacketAcknowledgementNotFound(Sequence),
    /// missing next send sequence for port `{port_id}` and channel `{channel_id}`
    MissingNextSendSeq {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// missing next recv sequence for port `{port_id}` and channel `{channel_id}`
    MissingNextRecvSeq {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// missing next ack sequence for port `{port_id}` and channel `{channel_id}`
    MissingNextAckSeq {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// mismatched commitments for packet `{sequence}`: expected `{expected:?}`, actual `{actual:?}`
    MismatchedPacketCommitments {
        sequence: Sequence,
        expected: PacketCommitment,
        actual: PacketCommitment,
    },
    /// packet destination (`{port_id}`, `{channel_id}`) does not match the channel counterparty
    InvalidPacketCounterparty {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// missing timeout
    MissingTimeout,
    /// invalid timeout timestamp: `{0}`
    InvalidTimeoutTimestamp(TimestampError),
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// empty acknowledgement not allowed
    EmptyAcknowledgement,
    /// empty acknowledgement status not allowed
    EmptyAcknowledgementStatus,
    /// failed to encode acknowledgement status: `{description}`
    EncodeAcknowledgementStatus { description: String },
    /// packet data bytes cannot be empty
    EmptyPacketData,
    /// packet acknowledgement for sequence `{0}` already exists
    DuplicateAcknowledgement(Sequence),
    /// packet sequence cannot be 0
    ZeroPacketSequence,
    /// failed packet verification for packet with sequence `{sequence}`: `{client_error}`
    FailedPacketVerification {
        sequence: Sequence,
        client_error: ClientError,
    },
    /// sequence counter overflowed
    CounterOverflow,
}

/// Failures of the channel capability registry.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum CapabilityError {
    /// capability for (`{port_id}`, `{channel_id}`) is not held by the caller
    Unauthorized {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// no capability was minted for (`{port_id}`, `{channel_id}`)
    NotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// capability for (`{port_id}`, `{channel_id}`) was already claimed
    AlreadyClaimed {
        port_id: PortId,
        channel_id: ChannelId,
    },
}

impl From<IdentifierError> for ChannelError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<ChannelError> for PacketError {
    fn from(err: ChannelError) -> Self {
        Self::Channel(err)
    }
}

impl From<IdentifierError> for PacketError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

impl From<TimestampError> for PacketError {
    fn from(err: TimestampError) -> Self {
        Self::InvalidTimeoutTimestamp(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Channel(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::InvalidTimeoutTimestamp(e) => Some(e),
            Self::FailedPacketVerification {
                client_error: e, ..
            } => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::FailedProofVerification(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CapabilityError {}
