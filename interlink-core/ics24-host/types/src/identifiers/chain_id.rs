use core::fmt::{Debug, Display, Error as FmtError, Formatter};
use core::str::FromStr;

use interlink_primitives::prelude::*;

use crate::error::IdentifierError;
use crate::validate::{validate_identifier_chars, validate_identifier_length};

/// Defines the domain type for chain identifiers.
///
/// A `ChainId` of the form `{chain name}-{revision number}` carries the
/// revision number that heights on that chain are tagged with. Any other
/// valid identifier has revision number 0.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainId {
    id: String,
    revision_number: u64,
}

impl ChainId {
    pub fn new(chain_id: &str) -> Result<Self, IdentifierError> {
        Self::from_str(chain_id)
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    pub fn split_chain_id(&self) -> Result<(&str, u64), IdentifierError> {
        parse_chain_id_string(self.as_str())
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    /// Increases the revision number by one. Fails if the identifier is not
    /// in `{chain name}-{revision number}` form or the number overflows.
    pub fn increment_revision_number(&mut self) -> Result<(), IdentifierError> {
        let (chain_name, _) = self.split_chain_id()?;
        let inc_revision_number = self
            .revision_number
            .checked_add(1)
            .ok_or(IdentifierError::OverflowedRevisionNumber)?;
        self.id = format!("{}-{}", chain_name, inc_revision_number);
        self.revision_number = inc_revision_number;
        Ok(())
    }
}

impl FromStr for ChainId {
    type Err = IdentifierError;

    fn from_str(id: &str) -> Result<Self, Self::Err> {
        validate_identifier_chars(id)?;
        validate_identifier_length(id, 1, 64)?;
        let revision_number = parse_chain_id_string(id)
            .map(|(_, revision_number)| revision_number)
            .unwrap_or(0);

        Ok(Self {
            id: id.to_string(),
            revision_number,
        })
    }
}

impl Display for ChainId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.id)
    }
}

impl borsh::BorshSerialize for ChainId {
    fn serialize<W: borsh::io::Write>(&self, writer: &mut W) -> borsh::io::Result<()> {
        borsh::BorshSerialize::serialize(&self.id, writer)
    }
}

impl borsh::BorshDeserialize for ChainId {
    fn deserialize_reader<R: borsh::io::Read>(reader: &mut R) -> borsh::io::Result<Self> {
        let id = String::deserialize_reader(reader)?;
        Self::from_str(&id).map_err(|_| borsh::io::ErrorKind::InvalidData.into())
    }
}

/// Parses a string of the form `{chain name}-{revision number}`.
fn parse_chain_id_string(chain_id_str: &str) -> Result<(&str, u64), IdentifierError> {
    chain_id_str
        .rsplit_once('-')
        .filter(|(_, rev_number_str)| {
            !rev_number_str.is_empty()
                && (rev_number_str == &"0" || !rev_number_str.starts_with('0'))
        })
        .and_then(|(chain_name, rev_number_str)| {
            rev_number_str
                .parse()
                .ok()
                .map(|revision_number| (chain_name, revision_number))
        })
        .ok_or(IdentifierError::FailedToParse {
            value: chain_id_str.to_string(),
            description: "expected `{chain name}-{revision number}`".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("chainA-0", 0)]
    #[case("chainA-12", 12)]
    #[case("chain-with-dashes-3", 3)]
    #[case("chainA", 0)]
    #[case("chainA-01", 0)]
    fn test_revision_number(#[case] id: &str, #[case] revision_number: u64) {
        let chain_id = ChainId::new(id).unwrap();
        assert_eq!(chain_id.revision_number(), revision_number);
        assert_eq!(chain_id.as_str(), id);
    }

    #[test]
    fn test_increment_revision_number() {
        let mut chain_id = ChainId::new("chainA-1").unwrap();
        chain_id.increment_revision_number().unwrap();
        assert_eq!(chain_id.revision_number(), 2);
        assert_eq!(chain_id.as_str(), "chainA-2");

        let mut plain = ChainId::new("chainA").unwrap();
        assert!(plain.increment_revision_number().is_err());
    }

    #[test]
    fn test_invalid_chain_id() {
        assert!(ChainId::new("").is_err());
        assert!(ChainId::new("chain/A-1").is_err());
    }
}
