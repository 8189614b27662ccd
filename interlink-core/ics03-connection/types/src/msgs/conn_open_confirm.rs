use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::ConnectionId;
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

pub const CONN_OPEN_CONFIRM_TYPE_URL: &str =
    "/interlink.core.connection.v1.MsgConnectionOpenConfirm";

/// Per our convention, this message is sent to chain B.
/// The handler will check proofs of chain A.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgConnectionOpenConfirm {
    /// ConnectionId that chain B has chosen for it's ConnectionEnd
    pub conn_id_on_b: ConnectionId,
    /// proof of ConnectionEnd stored on Chain A during ConnOpenInit
    pub proof_conn_end_on_a: CommitmentProofBytes,
    /// Height at which `proof_conn_end_on_a` in this message was taken
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgConnectionOpenConfirm {
    const TYPE_URL: &'static str = CONN_OPEN_CONFIRM_TYPE_URL;
}
