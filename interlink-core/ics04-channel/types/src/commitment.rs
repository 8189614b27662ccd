//! Types and utilities related to packet commitments.

use interlink_primitives::prelude::*;

use super::acknowledgement::Acknowledgement;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

/// Packet commitment
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for PacketCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Acknowledgement commitment to be stored
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl AsRef<[u8]> for AcknowledgementCommitment {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Compute the commitment for a packet.
///
/// An absent timeout height or timestamp is committed as zero.
pub fn compute_packet_commitment(
    packet_data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &TimeoutTimestamp,
) -> PacketCommitment {
    let mut hash_input = [0; 8 * 3 + 32];

    hash_input[..8].copy_from_slice(&timeout_timestamp.nanoseconds().to_be_bytes());
    hash_input[8..16].copy_from_slice(&timeout_height.commitment_revision_number().to_be_bytes());
    hash_input[16..24].copy_from_slice(&timeout_height.commitment_revision_height().to_be_bytes());
    hash_input[24..].copy_from_slice(&hash(packet_data));

    hash(&hash_input).to_vec().into()
}

/// Compute the commitment for an acknowledgement.
pub fn compute_ack_commitment(ack: &Acknowledgement) -> AcknowledgementCommitment {
    hash(ack.as_ref()).to_vec().into()
}

/// Commitments must be SHA-256 digests; counterparties recompute them when
/// checking proofs.
fn hash(data: &[u8]) -> [u8; 32] {
    use sha2::Digest;

    sha2::Sha256::digest(data).into()
}

#[cfg(test)]
mod test {
    use interlink_core_client_types::Height;
    use interlink_primitives::Timestamp;

    use super::*;

    #[test]
    fn test_compute_packet_commitment() {
        let expected: [u8; 32] = [
            0xa9, 0x28, 0xb5, 0x1f, 0x62, 0xbd, 0x54, 0x00, 0x91, 0xec, 0x45, 0x1f, 0x4e, 0xf3,
            0x45, 0x79, 0x4f, 0x05, 0x9e, 0x65, 0x91, 0x08, 0x16, 0x86, 0x61, 0x26, 0xdc, 0x36,
            0x4f, 0x84, 0xcc, 0x15,
        ];
        let actual = compute_packet_commitment(
            b"packet data",
            &TimeoutHeight::At(Height::new(42, 24).unwrap()),
            &TimeoutTimestamp::At(Timestamp::from_nanoseconds(0x42).unwrap()),
        );
        assert_eq!(&expected[..], actual.as_ref());
    }

    #[test]
    fn test_compute_ack_commitment() {
        let expected: [u8; 32] = [
            0x05, 0x4e, 0xde, 0xc1, 0xd0, 0x21, 0x1f, 0x62, 0x4f, 0xed, 0x0c, 0xbc, 0xa9, 0xd4,
            0xf9, 0x40, 0x0b, 0x0e, 0x49, 0x1c, 0x43, 0x74, 0x2a, 0xf2, 0xc5, 0xb0, 0xab, 0xeb,
            0xf0, 0xc9, 0x90, 0xd8,
        ];
        let ack = Acknowledgement::try_from(vec![0, 1, 2, 3]).unwrap();
        let actual = compute_ack_commitment(&ack);
        assert_eq!(&expected[..], actual.as_ref())
    }

    #[test]
    fn test_commitment_binds_timeouts() {
        let a = compute_packet_commitment(b"data", &TimeoutHeight::Never, &TimeoutTimestamp::Never);
        let b = compute_packet_commitment(
            b"data",
            &TimeoutHeight::At(Height::new(0, 1).unwrap()),
            &TimeoutTimestamp::Never,
        );
        assert_ne!(a, b);
    }
}
