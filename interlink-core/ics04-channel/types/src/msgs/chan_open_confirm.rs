use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::{ChannelId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

pub const CHAN_OPEN_CONFIRM_TYPE_URL: &str = "/interlink.core.channel.v1.MsgChannelOpenConfirm";

/// Message definition for the fourth step in the channel open handshake
/// (`ChanOpenConfirm` datagram). Per our convention, this message is sent
/// to chain B.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgChannelOpenConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgChannelOpenConfirm {
    const TYPE_URL: &'static str = CHAN_OPEN_CONFIRM_TYPE_URL;
}
