//! Foundational error types shared across the interlink workspace.

use displaydoc::Display;

use crate::prelude::*;

/// Causes of decoding failures
#[derive(Debug, Display)]
pub enum DecodingError {
    /// invalid identifier error: `{0}`
    InvalidIdentifier(String),
    /// invalid field: `{0}`
    InvalidField(String),
    /// invalid JSON data: `{description}`
    InvalidJson { description: String },
    /// invalid UTF-8 data: `{description}`
    InvalidUtf8 { description: String },
    /// missing field: `{0}`
    MissingField(String),
    /// mismatched type URLs: expected `{expected}`, actual `{actual}`
    MismatchedTypeUrls { expected: String, actual: String },
    /// unknown type URL: `{0}`
    UnknownTypeUrl(String),
    /// failed to decode raw value: `{description}`
    FailedToDecodeRaw { description: String },
}

impl DecodingError {
    pub fn invalid_raw_data(description: impl ToString) -> Self {
        Self::FailedToDecodeRaw {
            description: description.to_string(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {}
