use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use interlink_primitives::prelude::*;

use super::ClientId;
use crate::error::IdentifierError;
use crate::validate::validate_client_type;

/// Type of the light client, e.g. `07-headerchain`. Doubles as the prefix
/// of every client identifier of that type and as the dispatch tag selecting
/// the verification algorithm.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub struct ClientType(String);

impl ClientType {
    pub fn new(s: &str) -> Result<Self, IdentifierError> {
        let s = s.trim();
        validate_client_type(s).map(|_| Self(s.to_string()))
    }

    /// Builds a `ClientId` with this type as its prefix.
    pub fn build_client_id(&self, counter: u64) -> ClientId {
        ClientId::format(self.as_str(), counter)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClientType {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for ClientType {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.0)
    }
}
