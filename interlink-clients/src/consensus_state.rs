use derive_more::From;
use interlink_client_headerchain::types::{
    ConsensusState as HeaderChainConsensusState, HEADERCHAIN_CONSENSUS_STATE_TYPE_URL,
};
use interlink_client_sandbox::types::{
    ConsensusState as SandboxConsensusState, SANDBOX_CONSENSUS_STATE_TYPE_URL,
};
use interlink_client_solo::types::{
    ConsensusState as SoloConsensusState, SOLO_CONSENSUS_STATE_TYPE_URL,
};
use interlink_core_client::context::consensus_state::ConsensusState;
use interlink_core_client::types::error::ClientError;
use interlink_core_commitment_types::commitment::CommitmentRoot;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, Timestamp};

/// A consensus state of any of the supported light clients.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum AnyConsensusState {
    HeaderChain(HeaderChainConsensusState),
    Solo(SoloConsensusState),
    Sandbox(SandboxConsensusState),
}

impl AnyConsensusState {
    pub fn type_url(&self) -> &'static str {
        match self {
            Self::HeaderChain(_) => HEADERCHAIN_CONSENSUS_STATE_TYPE_URL,
            Self::Solo(_) => SOLO_CONSENSUS_STATE_TYPE_URL,
            Self::Sandbox(_) => SANDBOX_CONSENSUS_STATE_TYPE_URL,
        }
    }
}

impl ConsensusState for AnyConsensusState {
    fn root(&self) -> &CommitmentRoot {
        match self {
            Self::HeaderChain(cs) => cs.root(),
            Self::Solo(cs) => cs.root(),
            Self::Sandbox(cs) => cs.root(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::HeaderChain(cs) => cs.timestamp(),
            Self::Solo(cs) => cs.timestamp(),
            Self::Sandbox(cs) => cs.timestamp(),
        }
    }
}

impl TryFrom<Any> for AnyConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            HEADERCHAIN_CONSENSUS_STATE_TYPE_URL => {
                HeaderChainConsensusState::try_from(raw).map(Into::into)
            }
            SOLO_CONSENSUS_STATE_TYPE_URL => SoloConsensusState::try_from(raw).map(Into::into),
            SANDBOX_CONSENSUS_STATE_TYPE_URL => {
                SandboxConsensusState::try_from(raw).map(Into::into)
            }
            _ => Err(ClientError::InvalidConsensusStateType(raw.type_url)),
        }
    }
}

impl From<AnyConsensusState> for Any {
    fn from(consensus_state: AnyConsensusState) -> Self {
        match consensus_state {
            AnyConsensusState::HeaderChain(cs) => cs.into(),
            AnyConsensusState::Solo(cs) => cs.into(),
            AnyConsensusState::Sandbox(cs) => cs.into(),
        }
    }
}

impl TryFrom<AnyConsensusState> for HeaderChainConsensusState {
    type Error = ClientError;

    fn try_from(value: AnyConsensusState) -> Result<Self, Self::Error> {
        match value {
            AnyConsensusState::HeaderChain(cs) => Ok(cs),
            other => Err(ClientError::InvalidConsensusStateType(
                other.type_url().to_string(),
            )),
        }
    }
}

impl TryFrom<AnyConsensusState> for SoloConsensusState {
    type Error = ClientError;

    fn try_from(value: AnyConsensusState) -> Result<Self, Self::Error> {
        match value {
            AnyConsensusState::Solo(cs) => Ok(cs),
            other => Err(ClientError::InvalidConsensusStateType(
                other.type_url().to_string(),
            )),
        }
    }
}

impl TryFrom<AnyConsensusState> for SandboxConsensusState {
    type Error = ClientError;

    fn try_from(value: AnyConsensusState) -> Result<Self, Self::Error> {
        match value {
            AnyConsensusState::Sandbox(cs) => Ok(cs),
            other => Err(ClientError::InvalidConsensusStateType(
                other.type_url().to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use interlink_core_commitment_types::commitment::CommitmentRoot;

    use super::*;

    fn sandbox_state() -> SandboxConsensusState {
        SandboxConsensusState::new(
            b"data".to_vec(),
            Timestamp::from_nanoseconds(5).unwrap(),
            CommitmentRoot::from_bytes(b"root"),
        )
    }

    #[test]
    fn test_dispatch_by_type_url() {
        let any: Any = sandbox_state().into();
        let state = AnyConsensusState::try_from(any).unwrap();
        assert_eq!(state, AnyConsensusState::Sandbox(sandbox_state()));
        assert_eq!(state.root().as_bytes(), b"root");
    }

    #[test]
    fn test_unknown_type_url_rejected() {
        let any = Any::new("/interlink.lightclients.unknown.v1.ConsensusState", vec![]);
        assert!(matches!(
            AnyConsensusState::try_from(any),
            Err(ClientError::InvalidConsensusStateType(_))
        ));
    }

    #[test]
    fn test_narrowing_to_the_wrong_variant_fails() {
        let state = AnyConsensusState::from(sandbox_state());
        assert!(SoloConsensusState::try_from(state).is_err());
    }
}
