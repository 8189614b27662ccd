use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::acknowledgement::Acknowledgement;
use crate::packet::Packet;

pub const ACKNOWLEDGEMENT_TYPE_URL: &str = "/interlink.core.channel.v1.MsgAcknowledgement";

/// Message definition for packet acknowledgements.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgAcknowledgement {
    pub packet: Packet,
    pub acknowledgement: Acknowledgement,
    /// Proof of packet acknowledgement on the receiving chain
    pub proof_acked_on_b: CommitmentProofBytes,
    /// Height at which the commitment proof in this message were taken
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgAcknowledgement {
    const TYPE_URL: &'static str = ACKNOWLEDGEMENT_TYPE_URL;
}
