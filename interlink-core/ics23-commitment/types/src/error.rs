//! Defines the commitment error type

use displaydoc::Display;
use interlink_primitives::prelude::*;

#[derive(Debug, Display)]
pub enum CommitmentError {
    /// empty commitment prefix
    EmptyCommitmentPrefix,
    /// empty commitment proof
    EmptyCommitmentProof,
    /// empty commitment root
    EmptyCommitmentRoot,
    /// empty verified value
    EmptyVerifiedValue,
    /// empty commitment path
    EmptyCommitmentPath,
    /// proof is not a `{expected}` proof
    UnexpectedProofKind { expected: String },
    /// proof was built for key `{actual:?}` instead of `{expected:?}`
    MismatchedKey { expected: Vec<u8>, actual: Vec<u8> },
    /// proof verification failed
    VerificationFailure,
    /// decoding commitment proof bytes failed: `{0}`
    DecodingFailure(String),
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}
