//! Definition of domain type message `MsgUpdateClient`.

use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Signer};

pub const UPDATE_CLIENT_TYPE_URL: &str = "/interlink.core.client.v1.MsgUpdateClient";

/// Represents the message that triggers the update of an on-chain client
/// either with new headers, or evidence of misbehaviour.
/// Note that conflicting headers are detected as misbehaviour when they
/// arrive through this message too.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgUpdateClient {
    pub client_id: ClientId,
    pub client_message: Any,
    pub signer: Signer,
}

impl AnyCodec for MsgUpdateClient {
    const TYPE_URL: &'static str = UPDATE_CLIENT_TYPE_URL;
}
