//! The state a mock host keeps on behalf of the protocol engine.

use alloc::sync::Arc;
use core::fmt::{Debug, Formatter};
use core::time::Duration;

use interlink_clients::headerchain::types::ConsensusState as HostConsensusState;
use interlink_clients::sandbox::SandboxProgram;
use interlink_clients::{AnyClientState, AnyConsensusState};
use interlink_core::channel::types::capability::CapabilityRegistry;
use interlink_core::client::types::error::ClientError;
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::{CommitmentPrefix, CommitmentRoot};
use interlink_core::connection::types::version::Version as ConnectionVersion;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::host::types::identifiers::{ChainId, ClientId};
use interlink_core::host::types::path::{
    ClientConsensusStatePath, ClientStatePath, Path, UpgradeClientStatePath,
    UpgradeConsensusStatePath,
};
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{encode_to_vec, Any, DecodingError, Timestamp};

use crate::hosts::HostParams;
use crate::store::{ProvableStore, StoreError};

/// The protocol state of a mock host: every provable value lives in a
/// [`ProvableStore`] under the host's commitment prefix, while counters,
/// update metadata and capabilities stay private to the host.
#[derive(Clone)]
pub struct MockIbcStore {
    pub chain_id: ChainId,
    pub commitment_prefix: CommitmentPrefix,
    pub max_expected_time_per_block: Duration,
    pub connection_versions: Vec<ConnectionVersion>,
    pub block_time: Duration,

    /// Provable key/value state, committed once per block.
    pub store: ProvableStore,

    /// Consensus states of the host itself, by block height.
    pub host_consensus_states: BTreeMap<Height, HostConsensusState>,

    /// Height and timestamp of the latest committed block.
    pub latest_block: Option<(Height, Timestamp)>,

    /// Host time and height at which each client consensus state was stored.
    pub update_meta: BTreeMap<(ClientId, Height), (Timestamp, Height)>,

    pub client_counter: u64,
    pub connection_counter: u64,
    pub channel_counter: u64,

    pub capabilities: CapabilityRegistry,

    /// Programs backing sandbox clients, by checksum.
    pub sandbox_programs: BTreeMap<Vec<u8>, Arc<dyn SandboxProgram>>,

    /// Emitted events in order
    pub events: Vec<IbcEvent>,

    /// Logs of the protocol handlers
    pub logs: Vec<String>,
}

impl Debug for MockIbcStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockIbcStore")
            .field("chain_id", &self.chain_id)
            .field("latest_block", &self.latest_block)
            .field("client_counter", &self.client_counter)
            .field("connection_counter", &self.connection_counter)
            .field("channel_counter", &self.channel_counter)
            .field("sandbox_programs", &self.sandbox_programs.len())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl MockIbcStore {
    pub fn new(params: &HostParams) -> Self {
        Self {
            chain_id: params.chain_id.clone(),
            commitment_prefix: params.commitment_prefix.clone(),
            max_expected_time_per_block: params.max_expected_time_per_block,
            connection_versions: params.connection_versions.clone(),
            block_time: params.block_time,
            store: ProvableStore::new(),
            host_consensus_states: BTreeMap::new(),
            latest_block: None,
            update_meta: BTreeMap::new(),
            client_counter: 0,
            connection_counter: 0,
            channel_counter: 0,
            capabilities: CapabilityRegistry::new(),
            sandbox_programs: BTreeMap::new(),
            events: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn register_sandbox_program(&mut self, checksum: Vec<u8>, program: Arc<dyn SandboxProgram>) {
        self.sandbox_programs.insert(checksum, program);
    }

    /// The height of the block being built.
    pub fn pending_height(&self) -> Height {
        match self.latest_block {
            Some((height, _)) => height.increment(),
            None => Height::new(self.chain_id.revision_number(), 1).expect("Never fails"),
        }
    }

    /// The timestamp the block being built will carry.
    pub fn pending_timestamp(&self) -> Result<Timestamp, ContextError> {
        match self.latest_block {
            Some((_, timestamp)) => (timestamp + self.block_time).map_err(|e| {
                ContextError::from(ClientError::Other {
                    description: e.to_string(),
                })
            }),
            None => Err(ClientError::Other {
                description: "no block committed yet".to_string(),
            }
            .into()),
        }
    }

    /// Freezes the working state as the block at `height` and returns its
    /// root.
    pub fn commit_block(
        &mut self,
        height: Height,
        timestamp: Timestamp,
    ) -> Result<CommitmentRoot, StoreError> {
        let root = self.store.commit(height.revision_height())?;
        self.latest_block = Some((height, timestamp));
        Ok(CommitmentRoot::from(root))
    }

    pub fn store_host_consensus_state(&mut self, height: Height, consensus_state: HostConsensusState) {
        self.host_consensus_states.insert(height, consensus_state);
    }

    pub fn path_key(&self, path: &Path) -> Vec<u8> {
        self.commitment_prefix.apply(path.to_bytes().as_slice())
    }

    /// The working value stored under `path`.
    pub fn get_path(&self, path: &Path) -> Option<&[u8]> {
        self.store.get(&self.path_key(path))
    }

    pub fn set_path(&mut self, path: &Path, value: Vec<u8>) {
        let key = self.path_key(path);
        self.store.set(key, value);
    }

    pub fn delete_path(&mut self, path: &Path) {
        let key = self.path_key(path);
        self.store.delete(&key);
    }

    /// Proves the value, or the absence of a value, under `path` at the
    /// block committed at `height`.
    pub fn path_proof(
        &self,
        height: Height,
        path: &Path,
    ) -> Result<ics23::CommitmentProof, StoreError> {
        self.store
            .get_proof(height.revision_height(), &self.path_key(path))
    }

    /// Store key of an upgraded state committed under `upgrade_path`.
    pub fn upgrade_key(upgrade_path: &str, path: &Path) -> Vec<u8> {
        let mut key = format!("{upgrade_path}/").into_bytes();
        key.extend_from_slice(path.to_bytes().as_slice());
        key
    }

    /// Commits the client and consensus states counterparties upgrade to,
    /// for the upgrade planned at `plan_height`.
    pub fn schedule_upgrade(
        &mut self,
        upgrade_path: &str,
        plan_height: u64,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) {
        let client_path = Path::UpgradeClientState(UpgradeClientStatePath {
            upgrade_path: upgrade_path.to_string(),
            height: plan_height,
        });
        let consensus_path = Path::UpgradeConsensusState(UpgradeConsensusStatePath {
            upgrade_path: upgrade_path.to_string(),
            height: plan_height,
        });

        self.store.set(
            Self::upgrade_key(upgrade_path, &client_path),
            encode_to_vec(&upgraded_client_state),
        );
        self.store.set(
            Self::upgrade_key(upgrade_path, &consensus_path),
            encode_to_vec(&upgraded_consensus_state),
        );
    }

    /// Proves the upgraded state committed under `upgrade_path` at the
    /// block committed at `height`.
    pub fn upgrade_proof(
        &self,
        height: Height,
        upgrade_path: &str,
        path: &Path,
    ) -> Result<ics23::CommitmentProof, StoreError> {
        self.store.get_proof(
            height.revision_height(),
            &Self::upgrade_key(upgrade_path, path),
        )
    }

    /// Decodes the client state stored for `client_id`, if any.
    pub fn stored_client_state(
        &self,
        client_id: &ClientId,
    ) -> Result<Option<AnyClientState>, ContextError> {
        let path = Path::ClientState(ClientStatePath::new(client_id.clone()));
        match self.get_path(&path) {
            Some(bytes) => {
                let any: Any = decode(bytes)?;
                Ok(Some(AnyClientState::try_from(any)?))
            }
            None => Ok(None),
        }
    }

    /// Decodes the consensus state stored under `path`, if any.
    pub fn stored_consensus_state(
        &self,
        path: &ClientConsensusStatePath,
    ) -> Result<Option<AnyConsensusState>, ContextError> {
        match self.get_path(&Path::ClientConsensusState(path.clone())) {
            Some(bytes) => {
                let any: Any = decode(bytes)?;
                Ok(Some(AnyConsensusState::try_from(any)?))
            }
            None => Ok(None),
        }
    }
}

/// Decodes a borsh value read from the store.
pub(crate) fn decode<T: borsh::BorshDeserialize>(bytes: &[u8]) -> Result<T, ContextError> {
    borsh::from_slice(bytes)
        .map_err(|e| ClientError::from(DecodingError::invalid_raw_data(e)).into())
}
