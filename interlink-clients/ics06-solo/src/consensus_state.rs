//! Implements the core [`ConsensusState`] trait for the solo consensus state.

use interlink_core_client::context::consensus_state::ConsensusState;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::Timestamp;

use crate::types::ConsensusState as ConsensusStateType;

impl ConsensusState for ConsensusStateType {
    fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
