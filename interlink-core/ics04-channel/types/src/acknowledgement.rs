//! Defines acknowledgment types used by packet messages and applications.

use core::fmt::{Display, Error as FmtError, Formatter};

use derive_more::Into;
use interlink_primitives::prelude::*;

use super::error::PacketError;

/// A generic Acknowledgement type that modules may interpret as they like.
///
/// NOTE: An acknowledgement cannot be empty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Into, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Acknowledgement(Vec<u8>);

impl Acknowledgement {
    // Returns the data as a slice of bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = PacketError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(PacketError::EmptyAcknowledgement)
        } else {
            Ok(Self(bytes))
        }
    }
}

/// Defines a convenience type for applications to construct an
/// [`Acknowledgement`] based on the success or failure of processing a
/// received packet.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum AcknowledgementStatus {
    /// Successful Acknowledgement
    /// e.g. `{"result":"AQ=="}`
    #[serde(rename = "result")]
    Success(StatusValue),
    /// Error Acknowledgement
    /// e.g. `{"error":"cannot decode packet data"}`
    #[serde(rename = "error")]
    Error(StatusValue),
}

/// A wrapper type that guards variants of [`AcknowledgementStatus`] against
/// being constructed with an empty value.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusValue(String);

impl StatusValue {
    /// Constructs a new instance of `StatusValue` if the given value is not empty.
    pub fn new(value: impl ToString) -> Result<Self, PacketError> {
        let value = value.to_string();

        if value.is_empty() {
            return Err(PacketError::EmptyAcknowledgementStatus);
        }

        Ok(Self(value))
    }
}

impl Display for StatusValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{status_value}", status_value = self.0)
    }
}

impl AcknowledgementStatus {
    pub fn success(value: StatusValue) -> Self {
        Self::Success(value)
    }

    pub fn error(value: StatusValue) -> Self {
        Self::Error(value)
    }

    pub fn is_successful(&self) -> bool {
        matches!(self, AcknowledgementStatus::Success(_))
    }
}

impl Display for AcknowledgementStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            AcknowledgementStatus::Success(v) | AcknowledgementStatus::Error(v) => write!(f, "{v}"),
        }
    }
}

/// Encodes the status as its JSON object.
impl TryFrom<AcknowledgementStatus> for Acknowledgement {
    type Error = PacketError;

    fn try_from(ack_status: AcknowledgementStatus) -> Result<Self, Self::Error> {
        serde_json::to_vec(&ack_status)
            .map(Self)
            .map_err(|e| PacketError::EncodeAcknowledgementStatus {
                description: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ack_status_rendering() {
        let ack =
            Acknowledgement::try_from(AcknowledgementStatus::success(StatusValue::new("AQ==").unwrap()))
                .unwrap();
        assert_eq!(ack.as_bytes(), br#"{"result":"AQ=="}"#);

        let ack = Acknowledgement::try_from(AcknowledgementStatus::error(
            StatusValue::new("bad packet").unwrap(),
        ))
        .unwrap();
        assert_eq!(ack.as_bytes(), br#"{"error":"bad packet"}"#);
    }

    #[test]
    fn test_ack_status_escapes_quotes() {
        let status = AcknowledgementStatus::error(StatusValue::new(r#"bad "data" \ here"#).unwrap());
        let ack = Acknowledgement::try_from(status.clone()).unwrap();

        assert_eq!(ack.as_bytes(), br#"{"error":"bad \"data\" \\ here"}"#);
        let decoded: AcknowledgementStatus = serde_json::from_slice(ack.as_bytes()).unwrap();
        assert_eq!(decoded, status);
    }

    #[test]
    fn test_empty_acks_rejected() {
        assert!(Acknowledgement::try_from(Vec::new()).is_err());
        assert!(StatusValue::new("").is_err());
    }
}
