use alloc::sync::Arc;
use core::str::FromStr;

use interlink_clients::sandbox::program::checksum_hex;
use interlink_clients::sandbox::types::error::SandboxError;
use interlink_clients::sandbox::{SandboxProgram, SandboxValidationContext};
use interlink_clients::{AnyClientState, AnyConsensusState};
use interlink_core::client::context::{
    ClientExecutionContext, ClientValidationContext, ExtClientValidationContext,
};
use interlink_core::client::types::error::ClientError;
use interlink_core::client::types::Height;
use interlink_core::handler::types::error::ContextError;
use interlink_core::host::types::identifiers::ClientId;
use interlink_core::host::types::path::{
    ClientConsensusStatePath, ClientStatePath, Path, CLIENT_PREFIX, CONSENSUS_STATE_PREFIX,
};
use interlink_core::host::ValidationContext;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{encode_to_vec, Any, Timestamp};

use crate::testapp::ibc::core::types::MockIbcStore;

impl MockIbcStore {
    /// Heights of the consensus states stored for `client_id`, in ascending
    /// order.
    fn stored_consensus_heights(&self, client_id: &ClientId) -> Vec<Height> {
        let prefix = self
            .commitment_prefix
            .apply(format!("{CLIENT_PREFIX}/{client_id}/{CONSENSUS_STATE_PREFIX}/").as_bytes());

        let mut heights: Vec<Height> = self
            .store
            .prefix_iter(&prefix)
            .filter_map(|(key, _)| {
                core::str::from_utf8(&key[prefix.len()..])
                    .ok()
                    .and_then(|raw| Height::from_str(raw).ok())
            })
            .collect();
        heights.sort();
        heights
    }

    fn consensus_state_at(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<AnyConsensusState, ContextError> {
        self.consensus_state(&ClientConsensusStatePath::new(
            client_id.clone(),
            height.revision_number(),
            height.revision_height(),
        ))
    }
}

impl ClientValidationContext for MockIbcStore {
    type ClientStateRef = AnyClientState;
    type ConsensusStateRef = AnyConsensusState;

    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ContextError> {
        self.stored_client_state(client_id)?.ok_or_else(|| {
            ClientError::ClientStateNotFound {
                client_id: client_id.clone(),
            }
            .into()
        })
    }

    fn consensus_state(
        &self,
        client_cons_state_path: &ClientConsensusStatePath,
    ) -> Result<Self::ConsensusStateRef, ContextError> {
        match self.stored_consensus_state(client_cons_state_path)? {
            Some(consensus_state) => Ok(consensus_state),
            None => Err(ClientError::ConsensusStateNotFound {
                client_id: client_cons_state_path.client_id.clone(),
                height: Height::new(
                    client_cons_state_path.revision_number,
                    client_cons_state_path.revision_height,
                )?,
            }
            .into()),
        }
    }

    fn client_update_meta(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<(Timestamp, Height), ContextError> {
        self.update_meta
            .get(&(client_id.clone(), *height))
            .copied()
            .ok_or_else(|| {
                ClientError::MissingUpdateMeta {
                    client_id: client_id.clone(),
                    height: *height,
                }
                .into()
            })
    }

    fn host_timestamp(&self) -> Result<Timestamp, ContextError> {
        ValidationContext::host_timestamp(self)
    }

    fn host_height(&self) -> Result<Height, ContextError> {
        ValidationContext::host_height(self)
    }
}

impl ExtClientValidationContext for MockIbcStore {
    fn consensus_state_heights(&self, client_id: &ClientId) -> Result<Vec<Height>, ContextError> {
        Ok(self.stored_consensus_heights(client_id))
    }

    fn next_consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Option<Self::ConsensusStateRef>, ContextError> {
        self.stored_consensus_heights(client_id)
            .into_iter()
            .find(|h| h > height)
            .map(|h| self.consensus_state_at(client_id, h))
            .transpose()
    }

    fn prev_consensus_state(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<Option<Self::ConsensusStateRef>, ContextError> {
        self.stored_consensus_heights(client_id)
            .into_iter()
            .rev()
            .find(|h| h < height)
            .map(|h| self.consensus_state_at(client_id, h))
            .transpose()
    }
}

impl ClientExecutionContext for MockIbcStore {
    type ClientStateMut = AnyClientState;

    fn store_client_state(
        &mut self,
        client_state_path: ClientStatePath,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::ClientState(client_state_path),
            encode_to_vec(&Any::from(client_state)),
        );
        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ContextError> {
        self.set_path(
            &Path::ClientConsensusState(consensus_state_path),
            encode_to_vec(&Any::from(consensus_state)),
        );
        Ok(())
    }

    fn delete_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
    ) -> Result<(), ContextError> {
        self.delete_path(&Path::ClientConsensusState(consensus_state_path));
        Ok(())
    }

    fn store_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_timestamp: Timestamp,
        host_height: Height,
    ) -> Result<(), ContextError> {
        self.update_meta
            .insert((client_id, height), (host_timestamp, host_height));
        Ok(())
    }

    fn delete_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
    ) -> Result<(), ContextError> {
        self.update_meta.remove(&(client_id, height));
        Ok(())
    }
}

impl SandboxValidationContext for MockIbcStore {
    fn sandbox_program(&self, checksum: &[u8]) -> Result<Arc<dyn SandboxProgram>, ContextError> {
        self.sandbox_programs.get(checksum).cloned().ok_or_else(|| {
            ClientError::from(SandboxError::UnknownProgram(checksum_hex(checksum))).into()
        })
    }
}
