use core::str::FromStr;

use derive_more::{Display, Into};
use interlink_primitives::prelude::*;

use crate::error::IdentifierError;
use crate::validate::{validate_client_identifier, validate_client_type};

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Into,
    Display,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct ClientId(String);

impl ClientId {
    /// Builds a new client identifier `{client_type}-{counter}`.
    pub fn new(client_type: &str, counter: u64) -> Result<Self, IdentifierError> {
        let client_type = client_type.trim();
        validate_client_type(client_type).map(|()| Self::format(client_type, counter))
    }

    pub(super) fn format(client_type: &str, counter: u64) -> Self {
        Self(format!("{client_type}-{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Returns the client type prefix, i.e. everything before the last dash.
    pub fn client_type_prefix(&self) -> &str {
        self.0
            .rsplit_once('-')
            .map(|(prefix, _)| prefix)
            .unwrap_or(&self.0)
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_client_identifier(s).map(|_| Self(s.to_string()))
    }
}

impl PartialEq<str> for ClientId {
    fn eq(&self, other: &str) -> bool {
        self.as_str().eq(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id_from_type() {
        let id = ClientId::new("07-headerchain", 3).unwrap();
        assert_eq!(id.as_str(), "07-headerchain-3");
        assert_eq!(id.client_type_prefix(), "07-headerchain");
    }

    #[test]
    fn test_client_id_parse() {
        assert!(ClientId::from_str("06-solomachine-12").is_ok());
        assert!(ClientId::from_str("bad id").is_err());
    }
}
