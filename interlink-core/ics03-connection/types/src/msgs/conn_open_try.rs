use core::time::Duration;

use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::utils::borsh_duration;
use interlink_primitives::{Any, AnyCodec, Signer};

use crate::connection::Counterparty;
use crate::version::Version;

pub const CONN_OPEN_TRY_TYPE_URL: &str = "/interlink.core.connection.v1.MsgConnectionOpenTry";

/// Per our convention, this message is sent to chain B.
/// The handler will check proofs of chain A.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgConnectionOpenTry {
    /// ClientId on B that the connection is being opened for
    pub client_id_on_b: ClientId,
    /// ClientState of client tracking chain B on chain A
    pub client_state_of_b_on_a: Any,
    /// ClientId, ConnectionId and prefix of chain A
    pub counterparty: Counterparty,
    /// Versions supported by chain A
    pub versions_on_a: Vec<Version>,
    /// proof of ConnectionEnd stored on Chain A during ConnOpenInit
    pub proof_conn_end_on_a: CommitmentProofBytes,
    /// proof that chain A has stored ClientState of chain B on its client
    pub proof_client_state_of_b_on_a: CommitmentProofBytes,
    /// proof that chain A has stored ConsensusState of chain B on its client
    pub proof_consensus_state_of_b_on_a: CommitmentProofBytes,
    /// Height at which all proofs in this message were taken
    pub proofs_height_on_a: Height,
    /// height of latest header of chain A that updated the client on chain B
    pub consensus_height_of_b_on_a: Height,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    pub delay_period: Duration,
    pub signer: Signer,
}

impl AnyCodec for MsgConnectionOpenTry {
    const TYPE_URL: &'static str = CONN_OPEN_TRY_TYPE_URL;
}
