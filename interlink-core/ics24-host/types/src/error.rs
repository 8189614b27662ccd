use displaydoc::Display;
use interlink_primitives::prelude::*;

/// Errors that arise when parsing identifiers.
#[derive(Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// id `{id}` has invalid length; must be between [`{min}`,`{max}`]
    InvalidLength { id: String, min: u64, max: u64 },
    /// id `{0}` can only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`
    InvalidCharacter(String),
    /// invalid prefix: `{0}`
    InvalidPrefix(String),
    /// failed to parse `{value}`: `{description}`
    FailedToParse { value: String, description: String },
    /// overflowed revision number
    OverflowedRevisionNumber,
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}
