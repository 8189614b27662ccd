//! Defines the domain type for header-chain headers

use core::fmt::{Display, Error as FmtError, Formatter};

use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_core_host::types::identifiers::ChainId;
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, Any, AnyCodec, Timestamp};
use sha2::{Digest, Sha256};

use crate::types::error::HeaderChainError;
use crate::types::{CommitSignature, ValidatorSet};

pub const HEADERCHAIN_HEADER_TYPE_URL: &str = "/interlink.lightclients.headerchain.v1.Header";

/// The block header validators sign.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct BlockHeader {
    pub chain_id: ChainId,
    pub height: Height,
    pub timestamp: Timestamp,
    /// Commitment root of the chain's provable store after this block.
    pub app_hash: CommitmentRoot,
    pub validators_hash: Vec<u8>,
    pub next_validators_hash: Vec<u8>,
}

impl BlockHeader {
    /// The bytes every validator signs for this block.
    pub fn sign_bytes(&self) -> Vec<u8> {
        encode_to_vec(self)
    }

    pub fn hash(&self) -> Vec<u8> {
        Sha256::digest(self.sign_bytes()).to_vec()
    }
}

/// A block header with the validator signatures committing to it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct SignedHeader {
    pub header: BlockHeader,
    pub commit: Vec<CommitSignature>,
}

/// The client message advancing a header-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Header {
    // contains the commitment root
    pub signed_header: SignedHeader,
    // the validator set that signed the header
    pub validator_set: ValidatorSet,
    // the height of a consensus state already trusted by the client
    pub trusted_height: Height,
    // the next validator set committed by the trusted consensus state
    pub trusted_next_validator_set: ValidatorSet,
}

impl core::fmt::Debug for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, " Header {{...}}")
    }
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Header {{ chain_id: {}, height: {}, timestamp: {}, trusted_height: {}, signatures: {} }}",
            self.signed_header.header.chain_id,
            self.height(),
            self.timestamp(),
            self.trusted_height,
            self.signed_header.commit.len()
        )
    }
}

impl Header {
    pub fn height(&self) -> Height {
        self.signed_header.header.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.signed_header.header.timestamp
    }

    pub fn is_adjacent(&self) -> bool {
        self.trusted_height.revision_number() == self.height().revision_number()
            && self.trusted_height.increment() == self.height()
    }

    /// Checks the header is internally consistent and belongs to `chain_id`.
    pub fn validate_basic(&self, chain_id: &ChainId) -> Result<(), HeaderChainError> {
        let block = &self.signed_header.header;

        if &block.chain_id != chain_id {
            return Err(HeaderChainError::MismatchedHeaderChainIds {
                expected: chain_id.to_string(),
                actual: block.chain_id.to_string(),
            });
        }

        if block.height.revision_number() != chain_id.revision_number() {
            return Err(HeaderChainError::MismatchedRevisionNumber {
                height: block.height,
                revision_number: chain_id.revision_number(),
            });
        }

        if block.height <= self.trusted_height {
            return Err(HeaderChainError::NonIncreasingHeight {
                header_height: block.height,
                trusted_height: self.trusted_height,
            });
        }

        if self.validator_set.hash() != block.validators_hash {
            return Err(HeaderChainError::MismatchedValidatorsHash);
        }

        Ok(())
    }

    /// `trusted_next_validator_set` was given to us by the relayer. Thus, we
    /// need to ensure that the relayer gave us the right set, i.e. by
    /// ensuring that it matches the hash we have stored on chain.
    pub fn check_trusted_next_validator_set(
        &self,
        trusted_next_validators_hash: &[u8],
    ) -> Result<(), HeaderChainError> {
        if self.trusted_next_validator_set.hash() == trusted_next_validators_hash {
            Ok(())
        } else {
            Err(HeaderChainError::MismatchedTrustedValidatorsHash)
        }
    }
}

impl AnyCodec for Header {
    const TYPE_URL: &'static str = HEADERCHAIN_HEADER_TYPE_URL;
}

impl TryFrom<Any> for Header {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        Ok(Self::from_any(&raw)?)
    }
}

impl From<Header> for Any {
    fn from(header: Header) -> Self {
        header.to_any()
    }
}
