//! Defines the solo header type

use core::fmt::{Display, Error as FmtError, Formatter};

use interlink_core_client::types::error::ClientError;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Timestamp};

pub const SOLO_HEADER_TYPE_URL: &str = "/interlink.lightclients.solo.v1.Header";

/// Rotates the signer of a solo client. Signed by the current key over
/// [`HeaderData`](crate::types::HeaderData) at the client's sequence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Header {
    pub timestamp: Timestamp,
    pub signature: Vec<u8>,
    pub new_public_key: [u8; 32],
    pub new_diversifier: String,
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Header {{ timestamp: {}, new_diversifier: {} }}",
            self.timestamp, self.new_diversifier
        )
    }
}

impl AnyCodec for Header {
    const TYPE_URL: &'static str = SOLO_HEADER_TYPE_URL;
}

impl TryFrom<Any> for Header {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        Ok(Self::from_any(&raw)?)
    }
}

impl From<Header> for Any {
    fn from(header: Header) -> Self {
        header.to_any()
    }
}
