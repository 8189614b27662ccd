//! Data structures of the sandbox light client and its message protocol.

use core::str::FromStr;

use interlink_core_host::types::identifiers::ClientType;
use interlink_primitives::prelude::*;

mod client_message;
mod client_state;
mod consensus_state;

pub use client_message::*;
pub use client_state::*;
pub use consensus_state::*;

pub mod error;
pub mod msgs;
pub mod response;
pub mod serializer;

pub type Bytes = Vec<u8>;

pub const SANDBOX_CLIENT_TYPE: &str = "08-sandbox";

/// Returns the sandbox `ClientType`
pub fn client_type() -> ClientType {
    ClientType::from_str(SANDBOX_CLIENT_TYPE).expect("Never fails because it's valid")
}
