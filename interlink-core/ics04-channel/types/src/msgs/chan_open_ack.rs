use interlink_core_client_types::Height;
use interlink_core_commitment_types::commitment::CommitmentProofBytes;
use interlink_core_host_types::identifiers::{ChannelId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::Version;

pub const CHAN_OPEN_ACK_TYPE_URL: &str = "/interlink.core.channel.v1.MsgChannelOpenAck";

/// Message definition for the third step in the channel open handshake
/// (`ChanOpenAck` datagram). Per our convention, this message is sent to
/// chain A.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgChannelOpenAck {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub chan_id_on_b: ChannelId,
    pub version_on_b: Version,
    pub proof_chan_end_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

impl AnyCodec for MsgChannelOpenAck {
    const TYPE_URL: &'static str = CHAN_OPEN_ACK_TYPE_URL;
}
