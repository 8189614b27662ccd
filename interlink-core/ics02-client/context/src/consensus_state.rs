//! Defines the trait to be implemented by all concrete consensus state types

use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::Timestamp;

/// Defines methods that all `ConsensusState`s should provide.
///
/// One can think of a "consensus state" as a pruned header, to be stored on
/// chain. It only contains the header's information needed by the handlers.
pub trait ConsensusState: Send + Sync {
    /// Commitment root of the consensus state, which is used for key-value
    /// pair verification.
    fn root(&self) -> &CommitmentRoot;

    /// The timestamp of the consensus state
    fn timestamp(&self) -> Timestamp;
}
