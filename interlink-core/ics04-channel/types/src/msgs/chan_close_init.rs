use interlink_core_host_types::identifiers::{ChannelId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

pub const CHAN_CLOSE_INIT_TYPE_URL: &str = "/interlink.core.channel.v1.MsgChannelCloseInit";

/// Message definition for the first step in the channel close handshake
/// (`ChanCloseInit` datagram). Per our convention, this message is sent to
/// chain A.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgChannelCloseInit {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub signer: Signer,
}

impl AnyCodec for MsgChannelCloseInit {
    const TYPE_URL: &'static str = CHAN_CLOSE_INIT_TYPE_URL;
}
