//! Commitment roots, prefixes and proofs, together with the proof verifier
//! checking membership and non-membership of a key/value pair against a root.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod commitment;
pub mod error;
pub mod merkle;

/// Re-exports the `ics23` proof types hosts use to build proofs.
pub mod proto {
    pub use ics23;
}
