//! Defines the header-chain `ConsensusState` type

use interlink_core_client::types::error::ClientError;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Timestamp};

use crate::types::Header;

pub const HEADERCHAIN_CONSENSUS_STATE_TYPE_URL: &str =
    "/interlink.lightclients.headerchain.v1.ConsensusState";

/// Defines the header-chain light client's consensus state
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConsensusState {
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
    pub next_validators_hash: Vec<u8>,
}

impl ConsensusState {
    pub fn new(root: CommitmentRoot, timestamp: Timestamp, next_validators_hash: Vec<u8>) -> Self {
        Self {
            timestamp,
            root,
            next_validators_hash,
        }
    }
}

impl AnyCodec for ConsensusState {
    const TYPE_URL: &'static str = HEADERCHAIN_CONSENSUS_STATE_TYPE_URL;
}

impl TryFrom<Any> for ConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != HEADERCHAIN_CONSENSUS_STATE_TYPE_URL {
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

impl From<Header> for ConsensusState {
    fn from(header: Header) -> Self {
        let block = header.signed_header.header;
        Self {
            timestamp: block.timestamp,
            root: block.app_hash,
            next_validators_hash: block.next_validators_hash,
        }
    }
}
