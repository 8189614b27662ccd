use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::{ChannelId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

pub const CHAN_CLOSE_CONFIRM_TYPE_URL: &str = "/interlink.core.channel.v1.MsgChannelCloseConfirm";

/// Message definition for the second step in the channel close handshake
/// (`ChanCloseConfirm` datagram). Per our convention, this message is sent
/// to chain B.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgChannelCloseConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgChannelCloseConfirm {
    const TYPE_URL: &'static str = CHAN_CLOSE_CONFIRM_TYPE_URL;
}
