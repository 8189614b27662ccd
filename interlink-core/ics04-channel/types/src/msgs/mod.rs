//! Message definitions for the channel open and close handshake datagrams,
//! as well as the relayer-submitted packet datagrams.

mod acknowledgement;
mod chan_close_confirm;
mod chan_close_init;
mod chan_open_ack;
mod chan_open_confirm;
mod chan_open_init;
mod chan_open_try;
mod recv_packet;
mod timeout;
mod timeout_on_close;

pub use acknowledgement::*;
pub use chan_close_confirm::*;
pub use chan_close_init::*;
pub use chan_open_ack::*;
pub use chan_open_confirm::*;
pub use chan_open_init::*;
pub use chan_open_try::*;
use interlink_core_host_types::identifiers::*;
use interlink_primitives::prelude::*;
pub use recv_packet::*;
pub use timeout::*;
pub use timeout_on_close::*;

/// All channel messages
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, derive_more::From, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum ChannelMsg {
    OpenInit(MsgChannelOpenInit),
    OpenTry(MsgChannelOpenTry),
    OpenAck(MsgChannelOpenAck),
    OpenConfirm(MsgChannelOpenConfirm),
    CloseInit(MsgChannelCloseInit),
    CloseConfirm(MsgChannelCloseConfirm),
}

/// All packet messages
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, derive_more::From, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum PacketMsg {
    Recv(MsgRecvPacket),
    Ack(MsgAcknowledgement),
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
}

impl ChannelMsg {
    /// The port and, once the channel exists, the channel of the local end
    /// the message acts on. Opening messages create their channel.
    pub fn local_end(&self) -> (&PortId, Option<&ChannelId>) {
        match self {
            Self::OpenInit(msg) => (&msg.port_id_on_a, None),
            Self::OpenTry(msg) => (&msg.port_id_on_b, None),
            Self::OpenAck(msg) => (&msg.port_id_on_a, Some(&msg.chan_id_on_a)),
            Self::OpenConfirm(msg) => (&msg.port_id_on_b, Some(&msg.chan_id_on_b)),
            Self::CloseInit(msg) => (&msg.port_id_on_a, Some(&msg.chan_id_on_a)),
            Self::CloseConfirm(msg) => (&msg.port_id_on_b, Some(&msg.chan_id_on_b)),
        }
    }
}

impl PacketMsg {
    /// Only `Recv` arrives at the destination end; every other packet
    /// message returns to the end that sent the packet.
    pub fn local_end(&self) -> (&PortId, &ChannelId) {
        let packet = match self {
            Self::Recv(msg) => return (&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b),
            Self::Ack(msg) => &msg.packet,
            Self::Timeout(msg) => &msg.packet,
            Self::TimeoutOnClose(msg) => &msg.packet,
        };
        (&packet.port_id_on_a, &packet.chan_id_on_a)
    }
}
