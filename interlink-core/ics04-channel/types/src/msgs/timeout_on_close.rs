use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::Sequence;
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::packet::Packet;

pub const TIMEOUT_ON_CLOSE_TYPE_URL: &str = "/interlink.core.channel.v1.MsgTimeoutOnClose";

/// Message definition for packet timeout domain type when the counterparty
/// channel end was closed before the packet could be received.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgTimeoutOnClose {
    pub packet: Packet,
    pub next_seq_recv_on_b: Sequence,
    pub proof_unreceived_on_b: CommitmentProofBytes,
    /// Proof that chain B's channel end is CLOSED
    pub proof_close_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgTimeoutOnClose {
    const TYPE_URL: &'static str = TIMEOUT_ON_CLOSE_TYPE_URL;
}
