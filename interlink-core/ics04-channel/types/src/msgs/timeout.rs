use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::Sequence;
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::packet::Packet;

pub const TIMEOUT_TYPE_URL: &str = "/interlink.core.channel.v1.MsgTimeout";

/// Message definition for packet timeout domain type, which is sent on
/// chain A and needs to prove that a previously sent packet was not
/// received on chain B.
///
/// On unordered channels `proof_unreceived_on_b` proves the absence of the
/// packet receipt; on ordered channels it proves that chain B's
/// `nextSequenceRecv` is `next_seq_recv_on_b`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgTimeout {
    pub packet: Packet,
    pub next_seq_recv_on_b: Sequence,
    pub proof_unreceived_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgTimeout {
    const TYPE_URL: &'static str = TIMEOUT_TYPE_URL;
}
