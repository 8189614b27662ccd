//! Defines the header-chain light client's error type

use core::time::Duration;

use displaydoc::Display;
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_host::types::error::IdentifierError;
use interlink_primitives::prelude::*;
use interlink_primitives::Timestamp;

/// The main error type for the header-chain light client
#[derive(Debug, Display)]
pub enum HeaderChainError {
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid trust threshold `{numerator}`/`{denominator}`; must lie within [1/3, 1]
    InvalidTrustThreshold { numerator: u64, denominator: u64 },
    /// invalid trusting period `{trusting_period:?}`; must be non-zero and below the unbonding period `{unbonding_period:?}`
    InvalidTrustingPeriod {
        trusting_period: Duration,
        unbonding_period: Duration,
    },
    /// invalid max clock drift; must be greater than 0
    InvalidMaxClockDrift,
    /// latest height revision `{height}` does not match chain id revision `{revision_number}`
    MismatchedRevisionNumber { height: Height, revision_number: u64 },
    /// empty upgrade path
    EmptyUpgradePath,
    /// mismatched header chain ids: expected `{expected}`, actual `{actual}`
    MismatchedHeaderChainIds { expected: String, actual: String },
    /// header height `{header_height}` must be greater than the trusted height `{trusted_height}`
    NonIncreasingHeight {
        header_height: Height,
        trusted_height: Height,
    },
    /// header validator set does not hash to the header's validators hash
    MismatchedValidatorsHash,
    /// trusted next validator set does not hash to the trusted consensus state's next validators hash
    MismatchedTrustedValidatorsHash,
    /// adjacent header validators hash does not match the trusted next validators hash
    MismatchedAdjacentValidatorsHash,
    /// empty validator set
    EmptyValidatorSet,
    /// invalid signature from validator `{index}`
    InvalidSignature { index: usize },
    /// duplicate signature from validator `{index}`
    DuplicateSignature { index: usize },
    /// insufficient voting power: `{signed}` of `{total}` signed, more than `{numerator}`/`{denominator}` required
    InsufficientVotingPower {
        signed: u64,
        total: u64,
        numerator: u64,
        denominator: u64,
    },
    /// header timestamp `{header_time}` must be after the trusted timestamp `{trusted_time}`
    NonIncreasingTimestamp {
        header_time: Timestamp,
        trusted_time: Timestamp,
    },
    /// header timestamp `{header_time}` is beyond the clock drift past host time `{host_time}`
    HeaderFromFuture {
        header_time: Timestamp,
        host_time: Timestamp,
    },
    /// trusted consensus state at `{trusted_time}` is outside the trusting period `{trusting_period:?}`
    TrustedStateExpired {
        trusted_time: Timestamp,
        trusting_period: Duration,
    },
    /// misbehaviour headers belong to different chains: `{0}` and `{1}`
    MisbehaviourChainIdMismatch(String, String),
    /// misbehaviour header heights are out of order: `{0}` < `{1}`
    MisbehaviourHeightsOutOfOrder(Height, Height),
}

#[cfg(feature = "std")]
impl std::error::Error for HeaderChainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}

impl From<IdentifierError> for HeaderChainError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

impl From<HeaderChainError> for ClientError {
    fn from(e: HeaderChainError) -> Self {
        Self::ClientSpecific {
            description: e.to_string(),
        }
    }
}

impl HeaderChainError {
    /// Reports the error as a rejected header.
    pub fn into_header_error(self) -> ClientError {
        ClientError::InvalidHeader {
            description: self.to_string(),
        }
    }

    /// Reports the error as rejected misbehaviour evidence.
    pub fn into_misbehaviour_error(self) -> ClientError {
        ClientError::InvalidMisbehaviour {
            description: self.to_string(),
        }
    }
}
