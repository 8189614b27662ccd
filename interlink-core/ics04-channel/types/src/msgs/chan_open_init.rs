use interlink_core_host_types::identifiers::{ConnectionId, PortId};
use interlink_primitives::prelude::*;
use interlink_primitives::{AnyCodec, Signer};

use crate::channel::{verify_connection_hops_length, ChannelEnd, Counterparty, Order, State};
use crate::error::ChannelError;
use crate::Version;

pub const CHAN_OPEN_INIT_TYPE_URL: &str = "/interlink.core.channel.v1.MsgChannelOpenInit";

/// Message definition for the first step in the channel open handshake
/// (`ChanOpenInit` datagram). Per our convention, this message is sent to
/// chain A.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgChannelOpenInit {
    pub port_id_on_a: PortId,
    pub connection_hops_on_a: Vec<ConnectionId>,
    pub port_id_on_b: PortId,
    pub ordering: Order,
    pub signer: Signer,
    /// Allow a relayer to specify a particular version by providing a non-empty version string
    pub version_proposal: Version,
}

impl MsgChannelOpenInit {
    /// Only single-hop channels are supported.
    pub fn verify_connection_hops_length(&self) -> Result<(), ChannelError> {
        verify_connection_hops_length(&self.connection_hops_on_a, 1)
    }

    /// The channel end this message creates in state INIT.
    pub fn channel_end(&self) -> Result<ChannelEnd, ChannelError> {
        ChannelEnd::new(
            State::Init,
            self.ordering,
            Counterparty::new(self.port_id_on_b.clone(), None),
            self.connection_hops_on_a.clone(),
            self.version_proposal.clone(),
        )
    }
}

impl AnyCodec for MsgChannelOpenInit {
    const TYPE_URL: &'static str = CHAN_OPEN_INIT_TYPE_URL;
}
