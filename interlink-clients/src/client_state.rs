use derive_more::From;
use interlink_client_headerchain::types::{
    ClientState as HeaderChainClientState, ConsensusState as HeaderChainConsensusState,
    HEADERCHAIN_CLIENT_STATE_TYPE_URL,
};
use interlink_client_sandbox::types::{
    ClientState as SandboxClientState, ConsensusState as SandboxConsensusState,
    SANDBOX_CLIENT_STATE_TYPE_URL,
};
use interlink_client_sandbox::SandboxValidationContext;
use interlink_client_solo::types::{
    ClientState as SoloClientState, ConsensusState as SoloConsensusState,
    SOLO_CLIENT_STATE_TYPE_URL,
};
use interlink_core_client::context::client_state::{
    ClientStateCommon, ClientStateExecution, ClientStateValidation,
};
use interlink_core_client::context::delay::DelayPeriod;
use interlink_core_client::context::{
    Convertible, ExtClientExecutionContext, ExtClientValidationContext,
};
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::{Height, Status};
use interlink_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use interlink_core_host::types::identifiers::{ClientId, ClientType};
use interlink_core_host::types::path::Path;
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

/// The client state of any of the supported light clients.
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum AnyClientState {
    HeaderChain(HeaderChainClientState),
    Solo(SoloClientState),
    Sandbox(SandboxClientState),
}

impl AnyClientState {
    pub fn type_url(&self) -> &'static str {
        match self {
            Self::HeaderChain(_) => HEADERCHAIN_CLIENT_STATE_TYPE_URL,
            Self::Solo(_) => SOLO_CLIENT_STATE_TYPE_URL,
            Self::Sandbox(_) => SANDBOX_CLIENT_STATE_TYPE_URL,
        }
    }
}

impl TryFrom<Any> for AnyClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            HEADERCHAIN_CLIENT_STATE_TYPE_URL => {
                HeaderChainClientState::try_from(raw).map(Into::into)
            }
            SOLO_CLIENT_STATE_TYPE_URL => SoloClientState::try_from(raw).map(Into::into),
            SANDBOX_CLIENT_STATE_TYPE_URL => SandboxClientState::try_from(raw).map(Into::into),
            _ => Err(ClientError::InvalidClientStateType(raw.type_url)),
        }
    }
}

impl From<AnyClientState> for Any {
    fn from(client_state: AnyClientState) -> Self {
        match client_state {
            AnyClientState::HeaderChain(cs) => cs.into(),
            AnyClientState::Solo(cs) => cs.into(),
            AnyClientState::Sandbox(cs) => cs.into(),
        }
    }
}

impl ClientStateCommon for AnyClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_consensus_state(consensus_state),
            Self::Solo(cs) => cs.verify_consensus_state(consensus_state),
            Self::Sandbox(cs) => cs.verify_consensus_state(consensus_state),
        }
    }

    fn client_type(&self) -> ClientType {
        match self {
            Self::HeaderChain(cs) => cs.client_type(),
            Self::Solo(cs) => cs.client_type(),
            Self::Sandbox(cs) => cs.client_type(),
        }
    }

    fn latest_height(&self) -> Height {
        match self {
            Self::HeaderChain(cs) => ClientStateCommon::latest_height(cs),
            Self::Solo(cs) => ClientStateCommon::latest_height(cs),
            Self::Sandbox(cs) => ClientStateCommon::latest_height(cs),
        }
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.validate_proof_height(proof_height),
            Self::Solo(cs) => cs.validate_proof_height(proof_height),
            Self::Sandbox(cs) => cs.validate_proof_height(proof_height),
        }
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_membership(prefix, proof, root, path, value),
            Self::Solo(cs) => cs.verify_membership(prefix, proof, root, path, value),
            Self::Sandbox(cs) => cs.verify_membership(prefix, proof, root, path, value),
        }
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_non_membership(prefix, proof, root, path),
            Self::Solo(cs) => cs.verify_non_membership(prefix, proof, root, path),
            Self::Sandbox(cs) => cs.verify_non_membership(prefix, proof, root, path),
        }
    }
}

impl<V> ClientStateValidation<V> for AnyClientState
where
    V: ExtClientValidationContext + SandboxValidationContext,
    HeaderChainConsensusState: Convertible<V::ConsensusStateRef>,
    <HeaderChainConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
    SandboxConsensusState: Convertible<V::ConsensusStateRef>,
    <SandboxConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_client_message(ctx, client_id, client_message),
            Self::Solo(cs) => cs.verify_client_message(ctx, client_id, client_message),
            Self::Sandbox(cs) => cs.verify_client_message(ctx, client_id, client_message),
        }
    }

    fn check_for_misbehaviour(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<bool, ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.check_for_misbehaviour(ctx, client_id, client_message),
            Self::Solo(cs) => cs.check_for_misbehaviour(ctx, client_id, client_message),
            Self::Sandbox(cs) => cs.check_for_misbehaviour(ctx, client_id, client_message),
        }
    }

    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.status(ctx, client_id),
            Self::Solo(cs) => cs.status(ctx, client_id),
            Self::Sandbox(cs) => cs.status(ctx, client_id),
        }
    }

    fn verify_upgrade_client(
        &self,
        ctx: &V,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
        proof_upgrade_client: CommitmentProofBytes,
        proof_upgrade_consensus_state: CommitmentProofBytes,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_upgrade_client(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
                proof_upgrade_client,
                proof_upgrade_consensus_state,
            ),
            Self::Solo(cs) => cs.verify_upgrade_client(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
                proof_upgrade_client,
                proof_upgrade_consensus_state,
            ),
            Self::Sandbox(cs) => cs.verify_upgrade_client(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
                proof_upgrade_client,
                proof_upgrade_consensus_state,
            ),
        }
    }

    // sandbox clients check proofs inside their program
    fn verify_membership_at_height(
        &self,
        ctx: &V,
        client_id: &ClientId,
        height: Height,
        delay: &DelayPeriod,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path, value,
            ),
            Self::Solo(cs) => cs.verify_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path, value,
            ),
            Self::Sandbox(cs) => cs.verify_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path, value,
            ),
        }
    }

    fn verify_non_membership_at_height(
        &self,
        ctx: &V,
        client_id: &ClientId,
        height: Height,
        delay: &DelayPeriod,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        path: Path,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.verify_non_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path,
            ),
            Self::Solo(cs) => cs.verify_non_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path,
            ),
            Self::Sandbox(cs) => cs.verify_non_membership_at_height(
                ctx, client_id, height, delay, prefix, proof, path,
            ),
        }
    }
}

impl<E> ClientStateExecution<E> for AnyClientState
where
    E: ExtClientExecutionContext + SandboxValidationContext,
    E::ClientStateRef:
        From<HeaderChainClientState> + From<SoloClientState> + From<SandboxClientState>,
    HeaderChainConsensusState: Convertible<E::ConsensusStateRef>,
    <HeaderChainConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
    SoloConsensusState: Convertible<E::ConsensusStateRef>,
    SandboxConsensusState: Convertible<E::ConsensusStateRef>,
    <SandboxConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.initialise(ctx, client_id, consensus_state),
            Self::Solo(cs) => cs.initialise(ctx, client_id, consensus_state),
            Self::Sandbox(cs) => cs.initialise(ctx, client_id, consensus_state),
        }
    }

    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.update_state(ctx, client_id, header),
            Self::Solo(cs) => cs.update_state(ctx, client_id, header),
            Self::Sandbox(cs) => cs.update_state(ctx, client_id, header),
        }
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        match self {
            Self::HeaderChain(cs) => {
                cs.update_state_on_misbehaviour(ctx, client_id, client_message)
            }
            Self::Solo(cs) => cs.update_state_on_misbehaviour(ctx, client_id, client_message),
            Self::Sandbox(cs) => cs.update_state_on_misbehaviour(ctx, client_id, client_message),
        }
    }

    fn update_state_on_upgrade(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) -> Result<Height, ClientError> {
        match self {
            Self::HeaderChain(cs) => cs.update_state_on_upgrade(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
            ),
            Self::Solo(cs) => cs.update_state_on_upgrade(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
            ),
            Self::Sandbox(cs) => cs.update_state_on_upgrade(
                ctx,
                client_id,
                upgraded_client_state,
                upgraded_consensus_state,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn sandbox_state() -> SandboxClientState {
        SandboxClientState::new(
            b"program-state".to_vec(),
            b"checksum".to_vec(),
            Height::new(0, 7).unwrap(),
        )
    }

    #[test]
    fn test_dispatch_by_type_url() {
        let any: Any = sandbox_state().into();
        let state = AnyClientState::try_from(any.clone()).unwrap();

        assert_eq!(state, AnyClientState::Sandbox(sandbox_state()));
        assert_eq!(state.client_type().as_str(), "08-sandbox");
        assert_eq!(state.latest_height(), Height::new(0, 7).unwrap());
        assert_eq!(Any::from(state), any);
    }

    #[rstest]
    #[case("/interlink.lightclients.unknown.v1.ClientState")]
    #[case("")]
    fn test_unknown_type_url_rejected(#[case] type_url: &str) {
        let any = Any::new(type_url, vec![1, 2, 3]);
        assert!(matches!(
            AnyClientState::try_from(any),
            Err(ClientError::InvalidClientStateType(_))
        ));
    }

    #[test]
    fn test_mismatched_payload_is_a_decoding_error() {
        let any = Any::new(SOLO_CLIENT_STATE_TYPE_URL, vec![0xff; 3]);
        assert!(AnyClientState::try_from(any).is_err());
    }
}
