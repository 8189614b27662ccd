//! Data structures of the solo light client.

use core::str::FromStr;

use interlink_core_host::types::identifiers::ClientType;

mod client_state;
mod consensus_state;
mod header;
mod misbehaviour;
mod sign_bytes;

pub use client_state::*;
pub use consensus_state::*;
pub use header::*;
pub use misbehaviour::*;
pub use sign_bytes::*;

pub mod error;

pub const SOLO_CLIENT_TYPE: &str = "06-solo";

/// Returns the solo `ClientType`
pub fn client_type() -> ClientType {
    ClientType::from_str(SOLO_CLIENT_TYPE).expect("Never fails because it's valid")
}
