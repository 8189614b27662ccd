use interlink_core_client::context::consensus_state::ConsensusState as ConsensusStateTrait;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::Timestamp;

use crate::types::ConsensusState;

impl ConsensusStateTrait for ConsensusState {
    fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}
