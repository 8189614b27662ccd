//! Contains the implementation of the solo `ClientState` domain type.

use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec};

use crate::types::error::SoloError;
use crate::types::ConsensusState;

pub const SOLO_CLIENT_STATE_TYPE_URL: &str = "/interlink.lightclients.solo.v1.ClientState";

/// ClientState defines a solo client that tracks the current consensus
/// state and whether the client is frozen.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ClientState {
    /// latest sequence of the client state; revision number is always 0
    pub sequence: Height,
    pub is_frozen: bool,
    pub consensus_state: ConsensusState,
}

impl ClientState {
    pub fn new(sequence: Height, consensus_state: ConsensusState) -> Result<Self, SoloError> {
        let client_state = Self {
            sequence,
            is_frozen: false,
            consensus_state,
        };
        client_state.validate_basic()?;
        Ok(client_state)
    }

    pub fn with_frozen(self) -> Self {
        Self {
            is_frozen: true,
            ..self
        }
    }

    pub fn latest_height(&self) -> Height {
        self.sequence
    }

    pub fn validate_basic(&self) -> Result<(), SoloError> {
        if self.sequence.revision_number() != 0 {
            return Err(SoloError::NonZeroRevision(self.sequence));
        }
        self.sequence.validate().map_err(|_| SoloError::ZeroSequence)?;
        self.consensus_state.validate_basic()
    }
}

impl AnyCodec for ClientState {
    const TYPE_URL: &'static str = SOLO_CLIENT_STATE_TYPE_URL;
}

impl TryFrom<Any> for ClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        if raw.type_url != SOLO_CLIENT_STATE_TYPE_URL {
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
    use ed25519_dalek::SigningKey;
    use interlink_primitives::Timestamp;
    use rstest::rstest;

    use super::*;

    fn consensus_state(diversifier: &str) -> ConsensusState {
        ConsensusState::new(
            &SigningKey::from_bytes(&[7; 32]).verifying_key(),
            diversifier.to_string(),
            Timestamp::from_nanoseconds(1).unwrap(),
        )
    }

    #[rstest]
    #[case(Height::min(0), "solo", true)]
    #[case(Height::min(1), "solo", false)]
    #[case(Height::min(0), " ", false)]
    fn test_client_state_validation(
        #[case] sequence: Height,
        #[case] diversifier: &str,
        #[case] valid: bool,
    ) {
        assert_eq!(
            ClientState::new(sequence, consensus_state(diversifier)).is_ok(),
            valid
        );
    }

    #[test]
    fn test_root_is_the_public_key() {
        let key = SigningKey::from_bytes(&[7; 32]).verifying_key();
        let cs = consensus_state("solo");
        assert_eq!(cs.root.as_bytes(), key.as_bytes());
        assert_eq!(cs.public_key().unwrap(), key);
    }
}
