//! Defines the client message type for the sandbox light client.

use interlink_core_client::types::error::ClientError;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec};

use crate::types::Bytes;

pub const SANDBOX_CLIENT_MESSAGE_TYPE_URL: &str =
    "/interlink.lightclients.sandbox.v1.ClientMessage";

/// A header or misbehaviour evidence, opaque to the host.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ClientMessage {
    pub data: Bytes,
}

impl AnyCodec for ClientMessage {
    const TYPE_URL: &'static str = SANDBOX_CLIENT_MESSAGE_TYPE_URL;
}

impl TryFrom<Any> for ClientMessage {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != SANDBOX_CLIENT_MESSAGE_TYPE_URL {
            return Err(ClientError::InvalidClientMessageType(raw.type_url));
        }
        Ok(Self::decode_vec(&raw.value)?)
    }
}

impl From<ClientMessage> for Any {
    fn from(client_message: ClientMessage) -> Self {
        client_message.to_any()
    }
}
