use crate::prelude::*;

/// A self-describing envelope: a type URL naming the payload type and the
/// payload's canonical encoding.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, Default, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub struct Any {
    pub type_url: String,
    pub value: Vec<u8>,
}

impl Any {
    pub fn new(type_url: impl ToString, value: Vec<u8>) -> Self {
        Self {
            type_url: type_url.to_string(),
            value,
        }
    }
}
