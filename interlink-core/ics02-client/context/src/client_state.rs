//! The traits a light client state implements. Handlers only ever talk to
//! a client through these.

use interlink_core_client_types::error::ClientError;
use interlink_core_client_types::{Height, Status};
use interlink_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use interlink_core_host_types::identifiers::{ClientId, ClientType};
use interlink_core_host_types::path::{ClientConsensusStatePath, Path};
use interlink_primitives::prelude::*;
use interlink_primitives::Any;

use crate::consensus_state::ConsensusState;
use crate::context::{ClientExecutionContext, ClientValidationContext};
use crate::delay::{verify_delay_passed, DelayPeriod};
use crate::Convertible;

/// What a client state can answer on its own, without the host store.
pub trait ClientStateCommon: Convertible<Any> {
    /// Fails unless `consensus_state` decodes into this client's consensus
    /// state type.
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError>;

    fn client_type(&self) -> ClientType;

    fn latest_height(&self) -> Height;

    /// Fails for proofs at heights the client has not reached.
    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError>;

    /// Checks `proof` that `value` sits under `path` below `root`.
    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError>;

    /// Checks `proof` that nothing sits under `path` below `root`.
    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError>;
}

/// Checks that read the host store through `V`. A client needing more than
/// [`ClientValidationContext`] offers adds its own bound on `V`.
pub trait ClientStateValidation<V>: ClientStateCommon
where
    V: ClientValidationContext,
{
    /// Verifies a header or a misbehaviour report. Everything called on the
    /// message afterwards trusts its content.
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError>;

    /// Whether a verified message proves the counterparty misbehaved. A
    /// header conflicting with a stored consensus state counts.
    fn check_for_misbehaviour(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<bool, ClientError>;

    /// Only an active client verifies anything.
    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError>;

    /// Verifies the upgraded states against the counterparty's upgrade
    /// path, as committed at the client's latest height. That height is the
    /// last one of the old revision, so no proof height is taken.
    fn verify_upgrade_client(
        &self,
        ctx: &V,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
        proof_upgrade_client: CommitmentProofBytes,
        proof_upgrade_consensus_state: CommitmentProofBytes,
    ) -> Result<(), ClientError>;

    /// Verifies that `value` is committed under `path` in the counterparty
    /// state observed at `height`, once the `delay` since that state was
    /// recorded has passed.
    #[allow(clippy::too_many_arguments)]
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
        let trusted = trusted_at(self, ctx, client_id, height, delay)?;
        self.verify_membership(prefix, proof, trusted.root(), path, value)
    }

    /// Verifies that nothing is committed under `path` in the counterparty
    /// state observed at `height`, once the `delay` has passed.
    #[allow(clippy::too_many_arguments)]
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
        let trusted = trusted_at(self, ctx, client_id, height, delay)?;
        self.verify_non_membership(prefix, proof, trusted.root(), path)
    }
}

/// The consensus state at `height`, provided the client is active, has
/// reached `height` and the connection `delay` has passed since it was
/// installed.
fn trusted_at<S, V>(
    client_state: &S,
    ctx: &V,
    client_id: &ClientId,
    height: Height,
    delay: &DelayPeriod,
) -> Result<V::ConsensusStateRef, ClientError>
where
    S: ClientStateValidation<V> + ?Sized,
    V: ClientValidationContext,
{
    client_state.status(ctx, client_id)?.verify_is_active()?;
    client_state.validate_proof_height(height)?;

    let trusted = ctx.consensus_state(&ClientConsensusStatePath::new(
        client_id.clone(),
        height.revision_number(),
        height.revision_height(),
    ))?;
    verify_delay_passed(ctx, client_id, height, delay)?;
    Ok(trusted)
}

/// State transitions a client performs through `E` once a message passed
/// validation.
pub trait ClientStateExecution<E>: ClientStateValidation<E>
where
    E: ClientExecutionContext,
{
    /// Stores the client and its first consensus state.
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError>;

    /// Installs a verified header and returns the heights it added. An
    /// empty list is treated as a failed update.
    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError>;

    /// Freezes the client on verified misbehaviour.
    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError>;

    /// Replaces the stored states with the verified upgraded ones and
    /// returns the new latest height.
    fn update_state_on_upgrade(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) -> Result<Height, ClientError>;
}

/// Everything a client state implements, blanket-implemented from the three
/// traits above.
pub trait ClientState<V: ClientValidationContext, E: ClientExecutionContext>:
    Send + Sync + ClientStateCommon + ClientStateValidation<V> + ClientStateExecution<E>
{
}

impl<V: ClientValidationContext, E: ClientExecutionContext, T> ClientState<V, E> for T where
    T: Send + Sync + ClientStateCommon + ClientStateValidation<V> + ClientStateExecution<E>
{
}
