//! Defines the consensus state type for the sandbox light client.

use interlink_core_client::types::error::ClientError;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Timestamp};

use crate::types::Bytes;

pub const SANDBOX_CONSENSUS_STATE_TYPE_URL: &str =
    "/interlink.lightclients.sandbox.v1.ConsensusState";

/// A consensus state written by a sandbox program.
///
/// `data` is opaque to the host. The program also records the timestamp and
/// root it derived, so the host can answer timestamp and expiry questions
/// without calling into the program.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConsensusState {
    pub data: Bytes,
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
}

impl ConsensusState {
    pub fn new(data: Bytes, timestamp: Timestamp, root: CommitmentRoot) -> Self {
        Self {
            data,
            timestamp,
            root,
        }
    }
}

impl AnyCodec for ConsensusState {
    const TYPE_URL: &'static str = SANDBOX_CONSENSUS_STATE_TYPE_URL;
}

impl TryFrom<Any> for ConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != SANDBOX_CONSENSUS_STATE_TYPE_URL {
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
