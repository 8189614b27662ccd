//! ICS 07: the header-chain light client.
//!
//! Tracks a counterparty whose blocks are signed by an ed25519 validator
//! set. A header is accepted when more than two thirds of its own validator
//! set signed it and, for non-adjacent headers, the validators trusted at
//! the header's trusted height contributed at least the client's trust
//! threshold of their voting power. Proofs are ics23 proofs against the
//! application root carried by each header.
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

pub use types::{client_type, HEADERCHAIN_CLIENT_TYPE};
