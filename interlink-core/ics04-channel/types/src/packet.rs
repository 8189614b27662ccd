//! Defines the packet type
use interlink_core_client_types::Height;
use interlink_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use interlink_primitives::prelude::*;
use interlink_primitives::Timestamp;

use crate::error::PacketError;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

/// Enumeration of proof carrying packet messages, helper for relayers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketMsgType {
    Recv,
    Ack,
    TimeoutUnordered,
    TimeoutOrdered,
    TimeoutOnClose,
}

impl core::fmt::Display for PacketMsgType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PacketMsgType::Recv => write!(f, "(PacketMsgType::Recv)"),
            PacketMsgType::Ack => write!(f, "(PacketMsgType::Ack)"),
            PacketMsgType::TimeoutUnordered => write!(f, "(PacketMsgType::TimeoutUnordered)"),
            PacketMsgType::TimeoutOrdered => write!(f, "(PacketMsgType::TimeoutOrdered)"),
            PacketMsgType::TimeoutOnClose => write!(f, "(PacketMsgType::TimeoutOnClose)"),
        }
    }
}

/// Packet receipt, used over unordered channels.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub enum Receipt {
    Ok,
}

impl Receipt {
    /// The value committed under a receipt path.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            Receipt::Ok => &[1],
        }
    }
}

/// The packet type; this is what applications send to one another.
///
/// Each application defines the structure of the `data` field.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Hash, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: TimeoutTimestamp,
}

struct PacketData<'a>(&'a [u8]);

impl<'a> core::fmt::Debug for PacketData<'a> {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(formatter, "{:?}", self.0)
    }
}

impl core::fmt::Debug for Packet {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        let data_wrapper = PacketData(&self.data);

        formatter
            .debug_struct("Packet")
            .field("sequence", &self.seq_on_a)
            .field("source_port", &self.port_id_on_a)
            .field("source_channel", &self.chan_id_on_a)
            .field("destination_port", &self.port_id_on_b)
            .field("destination_channel", &self.chan_id_on_b)
            .field("data", &data_wrapper)
            .field("timeout_height", &self.timeout_height_on_b)
            .field("timeout_timestamp", &self.timeout_timestamp_on_b)
            .finish()
    }
}

impl Packet {
    /// Checks whether the packet is timed-out relative to the current state
    /// of the destination chain: its height `dst_chain_height` and its
    /// latest block time `dst_chain_ts`.
    ///
    /// A timed-out packet must be timed out on the source chain with a
    /// `MsgTimeout` instead of being received.
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout_height_on_b.has_expired(dst_chain_height)
            || self.timeout_timestamp_on_b.has_expired(dst_chain_ts)
    }

    /// Rejects zero sequences, empty data and packets without any timeout.
    pub fn validate_basic(&self) -> Result<(), PacketError> {
        if self.seq_on_a.is_zero() {
            return Err(PacketError::ZeroPacketSequence);
        }
        if self.data.is_empty() {
            return Err(PacketError::EmptyPacketData);
        }
        if !self.timeout_height_on_b.is_set() && !self.timeout_timestamp_on_b.is_set() {
            return Err(PacketError::MissingTimeout);
        }
        Ok(())
    }
}

/// Custom debug output to omit the packet data
impl core::fmt::Display for Packet {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(
            f,
            "seq:{}, path:{}/{}->{}/{}, toh:{}, tos:{})",
            self.seq_on_a,
            self.chan_id_on_a,
            self.port_id_on_a,
            self.chan_id_on_b,
            self.port_id_on_b,
            self.timeout_height_on_b,
            self.timeout_timestamp_on_b
        )
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    pub fn dummy_packet(timeout_height: TimeoutHeight, timeout_ts: TimeoutTimestamp) -> Packet {
        Packet {
            seq_on_a: 1.into(),
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: ChannelId::new(0),
            port_id_on_b: PortId::transfer(),
            chan_id_on_b: ChannelId::new(1),
            data: vec![0x42],
            timeout_height_on_b: timeout_height,
            timeout_timestamp_on_b: timeout_ts,
        }
    }

    #[rstest]
    #[case::height_not_reached(19, 100, false)]
    #[case::height_reached(20, 100, true)]
    #[case::timestamp_reached(19, 500, true)]
    fn test_packet_timed_out(#[case] height: u64, #[case] now: u64, #[case] expected: bool) {
        let packet = dummy_packet(
            Height::new(0, 20).unwrap().into(),
            TimeoutTimestamp::At(Timestamp::from_nanoseconds(500).unwrap()),
        );
        assert_eq!(
            packet.timed_out(
                &Timestamp::from_nanoseconds(now).unwrap(),
                Height::new(0, height).unwrap()
            ),
            expected
        );
    }

    #[test]
    fn test_packet_without_timeout_is_invalid() {
        let packet = dummy_packet(TimeoutHeight::Never, TimeoutTimestamp::Never);
        assert!(matches!(
            packet.validate_basic(),
            Err(PacketError::MissingTimeout)
        ));
    }
}
