//! Definition of domain type message `MsgCreateClient`.

use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Signer};

pub const CREATE_CLIENT_TYPE_URL: &str = "/interlink.core.client.v1.MsgCreateClient";

/// A type of message that triggers the creation of a new on-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgCreateClient {
    pub client_state: Any,
    pub consensus_state: Any,
    pub signer: Signer,
}

impl MsgCreateClient {
    pub fn new(client_state: Any, consensus_state: Any, signer: Signer) -> Self {
        MsgCreateClient {
            client_state,
            consensus_state,
            signer,
        }
    }
}

impl AnyCodec for MsgCreateClient {
    const TYPE_URL: &'static str = CREATE_CLIENT_TYPE_URL;
}
