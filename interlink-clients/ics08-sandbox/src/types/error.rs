//! Defines the sandbox light client's error type

use displaydoc::Display;
use interlink_core_client::types::error::ClientError;
use interlink_primitives::prelude::*;
use interlink_primitives::DecodingError;

/// The main error type for the sandbox light client
#[derive(Debug, Display)]
pub enum SandboxError {
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// empty program checksum
    EmptyChecksum,
    /// no sandbox program is registered under checksum `{0}`
    UnknownProgram(String),
    /// sandbox program failed: `{description}`
    Program { description: String },
    /// unrecognized client store key `{0}`
    UnknownStoreKey(String),
    /// sandbox program rejected the client message
    RejectedClientMessage,
    /// sandbox program reported no updated heights
    MissingUpdatedHeights,
    /// sandbox proofs are verified by the program against a stored height, not a bare root
    RootProofUnsupported,
}

#[cfg(feature = "std")]
impl std::error::Error for SandboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Decoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodingError> for SandboxError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<SandboxError> for ClientError {
    fn from(e: SandboxError) -> Self {
        match e {
            SandboxError::Decoding(e) => Self::Decoding(e),
            e => Self::ClientSpecific {
                description: e.to_string(),
            },
        }
    }
}

impl SandboxError {
    pub fn json(e: impl ToString) -> Self {
        Self::Decoding(DecodingError::InvalidJson {
            description: e.to_string(),
        })
    }

    pub fn program(description: impl ToString) -> Self {
        Self::Program {
            description: description.to_string(),
        }
    }
}
