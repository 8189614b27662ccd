use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::packet::Packet;

pub const RECV_PACKET_TYPE_URL: &str = "/interlink.core.channel.v1.MsgRecvPacket";

/// Message definition for the "packet receiving" datagram.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgRecvPacket {
    /// The packet to be received
    pub packet: Packet,
    /// Proof of packet commitment on the sending chain
    pub proof_commitment_on_a: CommitmentProofBytes,
    /// Height at which the commitment proof in this message were taken
    pub proof_height_on_a: Height,
    /// The signer of the message
    pub signer: Signer,
}

impl AnyCodec for MsgRecvPacket {
    const TYPE_URL: &'static str = RECV_PACKET_TYPE_URL;
}
