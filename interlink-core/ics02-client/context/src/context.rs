use interlink_core_client_types::Height;
use interlink_core_handler_types::error::ContextError;
use interlink_core_host_types::identifiers::ClientId;
use interlink_core_host_types::path::{ClientConsensusStatePath, ClientStatePath};
use interlink_primitives::prelude::*;
use interlink_primitives::Timestamp;

use crate::client_state::{ClientStateExecution, ClientStateValidation};
use crate::consensus_state::ConsensusState;

/// The host store as a light client sees it while checking a message. This
/// is the `V` of [`ClientStateValidation`].
pub trait ClientValidationContext: Sized {
    type ClientStateRef: ClientStateValidation<Self>;
    type ConsensusStateRef: ConsensusState;

    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ContextError>;

    /// Fails when nothing is stored at the path.
    fn consensus_state(
        &self,
        client_cons_state_path: &ClientConsensusStatePath,
    ) -> Result<Self::ConsensusStateRef, ContextError>;

    /// Host time and height at which the consensus state at `height` was
    /// installed. Connection delays are measured from here.
    fn client_update_meta(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<(Timestamp, Height), ContextError>;

    fn host_timestamp(&self) -> Result<Timestamp, ContextError>;

    fn host_height(&self) -> Result<Height, ContextError>;
}

/// Storage a light client writes through. Clients own their client and
/// consensus states, so the handlers never store them directly. This is the
/// `E` of [`ClientStateExecution`].
pub trait ClientExecutionContext:
    ClientValidationContext<ClientStateRef = Self::ClientStateMut>
{
    type ClientStateMut: ClientStateExecution<Self>;

    fn client_state_mut(&self, client_id: &ClientId) -> Result<Self::ClientStateMut, ContextError> {
        self.client_state(client_id)
    }

    fn store_client_state(
        &mut self,
        client_state_path: ClientStatePath,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ContextError>;

    fn store_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ContextError>;

    fn delete_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
    ) -> Result<(), ContextError>;

    /// Records when the host installed the consensus state at `height`.
    fn store_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_timestamp: Timestamp,
        host_height: Height,
    ) -> Result<(), ContextError>;

    fn delete_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
    ) -> Result<(), ContextError>;
}

/// Extends the client validation context with ordered access to the stored
/// consensus states, which header-chain clients use for monotonicity checks
/// and pruning.
pub trait ExtClientValidationContext: ClientValidationContext {
    /// Heights of every stored consensus state, in no particular order.
    fn consensus_state_heights(&self, client_id: &ClientId) -> Result<Vec<Height>, ContextError>;

    /// Nearest stored consensus state above `height`.
    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Option<Self::ConsensusStateRef>, ContextError>;

    /// Nearest stored consensus state below `height`.
    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Option<Self::ConsensusStateRef>, ContextError>;
}

/// Shorthand bound for execution contexts with ordered consensus state
/// access.
pub trait ExtClientExecutionContext: ExtClientValidationContext + ClientExecutionContext {}

impl<T> ExtClientExecutionContext for T where T: ExtClientValidationContext + ClientExecutionContext {}

/// Two-way conversion between a host's state enum and one of the concrete
/// client types it wraps.
pub trait Convertible<C>: TryFrom<C> + Into<C> {}

impl<T, C> Convertible<C> for T where T: TryFrom<C> + Into<C> {}
