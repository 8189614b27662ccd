use interlink_core_host_types::identifiers::ConnectionId;
use interlink_primitives::prelude::*;

use crate::acknowledgement::Acknowledgement;
use crate::channel::Order;
use crate::packet::Packet;

/// Packet event types
pub const SEND_PACKET_EVENT: &str = "send_packet";
pub const RECEIVE_PACKET_EVENT: &str = "recv_packet";
pub const WRITE_ACK_EVENT: &str = "write_acknowledgement";
pub const ACK_PACKET_EVENT: &str = "acknowledge_packet";
pub const TIMEOUT_EVENT: &str = "timeout_packet";

/// Emitted by the sending chain; relayers pick up the full packet from it,
/// since only its commitment is stored.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct SendPacket {
    packet: Packet,
    channel_ordering: Order,
    src_connection_id: ConnectionId,
}

impl SendPacket {
    pub fn new(packet: Packet, channel_ordering: Order, src_connection_id: ConnectionId) -> Self {
        Self {
            packet,
            channel_ordering,
            src_connection_id,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }
    pub fn src_connection_id(&self) -> &ConnectionId {
        &self.src_connection_id
    }

    pub fn event_type(&self) -> &str {
        SEND_PACKET_EVENT
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ReceivePacket {
    packet: Packet,
    channel_ordering: Order,
    dst_connection_id: ConnectionId,
}

impl ReceivePacket {
    pub fn new(packet: Packet, channel_ordering: Order, dst_connection_id: ConnectionId) -> Self {
        Self {
            packet,
            channel_ordering,
            dst_connection_id,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }
    pub fn dst_connection_id(&self) -> &ConnectionId {
        &self.dst_connection_id
    }

    pub fn event_type(&self) -> &str {
        RECEIVE_PACKET_EVENT
    }
}

/// Emitted by the receiving chain once the application acknowledgement is
/// committed; relayers carry `acknowledgement` back to the sender.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct WriteAcknowledgement {
    packet: Packet,
    acknowledgement: Acknowledgement,
    dst_connection_id: ConnectionId,
}

impl WriteAcknowledgement {
    pub fn new(
        packet: Packet,
        acknowledgement: Acknowledgement,
        dst_connection_id: ConnectionId,
    ) -> Self {
        Self {
            packet,
            acknowledgement,
            dst_connection_id,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    pub fn acknowledgement(&self) -> &Acknowledgement {
        &self.acknowledgement
    }
    pub fn dst_connection_id(&self) -> &ConnectionId {
        &self.dst_connection_id
    }

    pub fn event_type(&self) -> &str {
        WRITE_ACK_EVENT
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct AcknowledgePacket {
    packet: Packet,
    channel_ordering: Order,
    src_connection_id: ConnectionId,
}

impl AcknowledgePacket {
    pub fn new(packet: Packet, channel_ordering: Order, src_connection_id: ConnectionId) -> Self {
        Self {
            packet,
            channel_ordering,
            src_connection_id,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }
    pub fn src_connection_id(&self) -> &ConnectionId {
        &self.src_connection_id
    }

    pub fn event_type(&self) -> &str {
        ACK_PACKET_EVENT
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct TimeoutPacket {
    packet: Packet,
    channel_ordering: Order,
}

impl TimeoutPacket {
    pub fn new(packet: Packet, channel_ordering: Order) -> Self {
        Self {
            packet,
            channel_ordering,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }
    pub fn channel_ordering(&self) -> &Order {
        &self.channel_ordering
    }

    pub fn event_type(&self) -> &str {
        TIMEOUT_EVENT
    }
}
