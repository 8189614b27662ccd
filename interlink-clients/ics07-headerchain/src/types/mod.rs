//! Data structures of the header-chain light client.

use core::str::FromStr;

use interlink_core_host::types::identifiers::ClientType;

mod client_state;
mod consensus_state;
mod header;
mod misbehaviour;
mod trust_threshold;
mod validator;

pub use client_state::*;
pub use consensus_state::*;
pub use header::*;
pub use misbehaviour::*;
pub use trust_threshold::*;
pub use validator::*;

pub mod error;

pub const HEADERCHAIN_CLIENT_TYPE: &str = "07-headerchain";

/// Returns the header-chain `ClientType`
pub fn client_type() -> ClientType {
    ClientType::from_str(HEADERCHAIN_CLIENT_TYPE).expect("Never fails because it's valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headerchain_client_type() {
        let _ = ClientType::from_str(HEADERCHAIN_CLIENT_TYPE).unwrap();
    }
}
