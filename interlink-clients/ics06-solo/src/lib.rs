//! ICS 06: the solo light client.
//!
//! A solo client tracks one ed25519 key. Every header is the key's signature
//! over the next public key and diversifier at the current sequence, and
//! every state proof is the key's signature over a path and value at the
//! client's latest sequence.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod client_state;
pub mod consensus_state;
pub mod types;

pub use types::{client_type, SOLO_CLIENT_TYPE};
