//! Defines the client state type for the sandbox light client.

use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec};

use crate::types::error::SandboxError;
use crate::types::Bytes;

pub const SANDBOX_CLIENT_STATE_TYPE_URL: &str = "/interlink.lightclients.sandbox.v1.ClientState";

/// The host's view of a sandbox client: the program's own client state as
/// opaque bytes, the checksum selecting the program, and the latest height
/// the program reported.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ClientState {
    pub data: Bytes,
    pub checksum: Bytes,
    pub latest_height: Height,
}

impl ClientState {
    pub fn new(data: Bytes, checksum: Bytes, latest_height: Height) -> Self {
        Self {
            data,
            checksum,
            latest_height,
        }
    }

    pub fn validate(&self) -> Result<(), SandboxError> {
        if self.checksum.is_empty() {
            return Err(SandboxError::EmptyChecksum);
        }
        Ok(())
    }
}

impl AnyCodec for ClientState {
    const TYPE_URL: &'static str = SANDBOX_CLIENT_STATE_TYPE_URL;
}

impl TryFrom<Any> for ClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != SANDBOX_CLIENT_STATE_TYPE_URL {
            return Err(ClientError::InvalidClientStateType(raw.type_url));
        }
        Ok(Self::decode_vec(&raw.value)?)
    }
}

impl From<ClientState> for Any {
    fn from(client_state: ClientState) -> Self {
        client_state.to_any()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_checksum_is_invalid() {
        let height = Height::new(0, 1).unwrap();
        assert!(ClientState::new(b"data".to_vec(), vec![], height)
            .validate()
            .is_err());
        assert!(ClientState::new(b"data".to_vec(), b"sum".to_vec(), height)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_any_conversion_checks_type_url() {
        let client_state =
            ClientState::new(b"data".to_vec(), b"sum".to_vec(), Height::new(0, 1).unwrap());
        let any: Any = client_state.clone().into();
        assert_eq!(ClientState::try_from(any.clone()).unwrap(), client_state);

        let wrong = Any::new("/interlink.lightclients.solo.v1.ClientState", any.value);
        assert!(matches!(
            ClientState::try_from(wrong),
            Err(ClientError::InvalidClientStateType(_))
        ));
    }
}
