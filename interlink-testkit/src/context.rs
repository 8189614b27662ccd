use alloc::sync::Arc;
use core::time::Duration;

use interlink_clients::headerchain::types::{
    ClientState as HeaderChainClientState, ConsensusState as HeaderChainConsensusState, Header,
};
use interlink_clients::sandbox::SandboxProgram;
use interlink_clients::AnyClientState;
use interlink_core::channel::handler::send_packet::send_packet;
use interlink_core::channel::types::packet::Packet;
use interlink_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use interlink_core::client::context::prelude::*;
use interlink_core::client::types::{Height, Status};
use interlink_core::commitment_types::commitment::CommitmentProofBytes;
use interlink_core::entrypoint::dispatch;
use interlink_core::handler::types::error::ContextError;
use interlink_core::handler::types::events::IbcEvent;
use interlink_core::handler::types::msgs::MsgEnvelope;
use interlink_core::host::types::identifiers::{ChannelId, ClientId, PortId};
use interlink_core::host::types::path::{Path, UpgradeClientStatePath, UpgradeConsensusStatePath};
use interlink_core::host::ValidationContext;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{Any, Timestamp};

use crate::fixtures::clients::headerchain::ClientStateConfig;
use crate::hosts::{HostBlock, HostParams, MockHost, DEFAULT_UPGRADE_PATH};
use crate::relayer::error::RelayerError;
use crate::testapp::ibc::applications::mock::{mock_port_id, MockModule};
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockIbcStore;
use crate::testapp::ibc::sandbox::{mock_sandbox_client, MockHeader};

/// A mock chain: a host producing signed blocks, the protocol state it
/// commits in every block, and a router with the mock application bound to
/// the `mock` port.
#[derive(Debug)]
pub struct MockContext {
    /// The host chain underlying this context.
    pub host: MockHost,

    /// Protocol state, committed at the end of every block.
    pub ibc_store: MockIbcStore,

    /// Routes channel and packet messages to the bound applications.
    pub ibc_router: MockRouter,

    /// Handle on the application bound to the `mock` port.
    pub module: MockModule,
}

/// A chain with default parameters, produced up to height 5. No clients, no
/// connections and no channels are present.
impl Default for MockContext {
    fn default() -> Self {
        Self::new(&HostParams::default())
    }
}

impl MockContext {
    /// Builds a chain and produces its first `params.latest_height` blocks.
    pub fn new(params: &HostParams) -> Self {
        let module = MockModule::new();

        let mut ctx = Self {
            host: MockHost::new(params),
            ibc_store: MockIbcStore::new(params),
            ibc_router: MockRouter::new_with_mock(module.clone()),
            module,
        };

        for _ in 0..params.latest_height {
            ctx.advance_block();
        }

        ctx
    }

    pub fn ibc_store(&self) -> &MockIbcStore {
        &self.ibc_store
    }

    pub fn register_sandbox_program(
        &mut self,
        checksum: &[u8],
        program: Arc<dyn SandboxProgram>,
    ) -> &mut Self {
        self.ibc_store
            .register_sandbox_program(checksum.to_vec(), program);
        self
    }

    /// Commits the protocol state and seals it in a new block carrying
    /// `timestamp`.
    pub fn produce_block(&mut self, timestamp: Timestamp) {
        let (height, _) = self.host.next_block_coordinates();

        let root = self
            .ibc_store
            .commit_block(height, timestamp)
            .expect("no error");

        let consensus_state = self.host.push_block(timestamp, root).consensus_state();
        self.ibc_store
            .store_host_consensus_state(height, consensus_state);

        tracing::trace!(chain_id = %self.host.chain_id(), %height, "produced block");
    }

    /// Produces the next block, one block time after the latest.
    pub fn advance_block(&mut self) {
        let (_, timestamp) = self.host.next_block_coordinates();
        self.produce_block(timestamp);
    }

    /// Produces the next block `elapsed` after the latest, to let time pass
    /// on the chain without producing the blocks in between.
    pub fn advance_block_by(&mut self, elapsed: Duration) {
        let timestamp = (self.latest_timestamp() + elapsed).expect("no overflow");
        self.produce_block(timestamp);
    }

    pub fn latest_block(&self) -> &HostBlock {
        self.host.latest_block().expect("genesis block exists")
    }

    pub fn host_block(&self, target_height: &Height) -> Option<&HostBlock> {
        self.host.get_block(target_height)
    }

    pub fn latest_height(&self) -> Height {
        let latest_host_height = self.latest_block().height();
        assert_eq!(
            self.ibc_store.latest_block.map(|(height, _)| height),
            Some(latest_host_height),
            "The IBC store and the host chain must have the same height"
        );
        latest_host_height
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.latest_block().timestamp()
    }

    pub fn timestamp_at(&self, height: Height) -> Timestamp {
        self.host_block(&height)
            .expect("block exists")
            .timestamp()
    }

    /// Delivers a message to the protocol engine and seals its effects in a
    /// new block. A rejected message leaves the chain untouched.
    pub fn deliver(&mut self, msg: MsgEnvelope) -> Result<(), RelayerError> {
        dispatch(&mut self.ibc_store, &mut self.ibc_router, msg)
            .map_err(RelayerError::TransactionFailed)?;
        self.advance_block();
        Ok(())
    }

    /// Sends `data` from the mock application over the channel
    /// `(port_id, chan_id)`, then seals the commitment in a new block.
    pub fn send_packet(
        &mut self,
        port_id: &PortId,
        chan_id: &ChannelId,
        data: Vec<u8>,
        timeout_height_on_b: TimeoutHeight,
        timeout_timestamp_on_b: TimeoutTimestamp,
    ) -> Result<Packet, RelayerError> {
        let state = self.module.state();
        let capability = state
            .capabilities
            .get(&(port_id.clone(), chan_id.clone()))
            .ok_or_else(|| RelayerError::MissingCapability {
                port_id: port_id.clone(),
                channel_id: chan_id.clone(),
            })?;

        let packet = send_packet(
            &mut self.ibc_store,
            capability,
            data,
            timeout_height_on_b,
            timeout_timestamp_on_b,
        )
        .map_err(RelayerError::TransactionFailed)?;
        drop(state);

        self.advance_block();
        Ok(packet)
    }

    /// Sends `data` over a channel bound to the `mock` port, with no timeout
    /// height and no timeout timestamp.
    pub fn send_mock_packet(
        &mut self,
        chan_id: &ChannelId,
        data: Vec<u8>,
    ) -> Result<Packet, RelayerError> {
        self.send_packet(
            &mock_port_id(),
            chan_id,
            data,
            TimeoutHeight::no_timeout(),
            TimeoutTimestamp::no_timeout(),
        )
    }

    pub fn client_state(&self, client_id: &ClientId) -> Result<AnyClientState, ContextError> {
        self.ibc_store.client_state(client_id)
    }

    pub fn client_status(&self, client_id: &ClientId) -> Result<Status, ContextError> {
        let client_state = self.client_state(client_id)?;
        Ok(client_state.status(&self.ibc_store, client_id)?)
    }

    /// Proves the value, or the absence of a value, under `path` in the
    /// block at `height`.
    pub fn proof(
        &self,
        height: Height,
        path: impl Into<Path>,
    ) -> Result<CommitmentProofBytes, RelayerError> {
        let proof = self
            .ibc_store
            .path_proof(height, &path.into())
            .map_err(RelayerError::Store)?;
        CommitmentProofBytes::try_from(proof).map_err(RelayerError::Proof)
    }

    /// Commits the states counterparties upgrade their clients of this chain
    /// to, for the upgrade planned at `plan_height`.
    pub fn schedule_upgrade(
        &mut self,
        plan_height: Height,
        upgraded_client_state: Any,
        upgraded_consensus_state: Any,
    ) {
        self.ibc_store.schedule_upgrade(
            DEFAULT_UPGRADE_PATH,
            plan_height.revision_height(),
            upgraded_client_state,
            upgraded_consensus_state,
        );
    }

    /// Proves the scheduled upgrade states in the block at `height`.
    pub fn upgrade_proofs(
        &self,
        height: Height,
        plan_height: Height,
    ) -> Result<(CommitmentProofBytes, CommitmentProofBytes), RelayerError> {
        let prove = |path: Path| {
            let proof = self
                .ibc_store
                .upgrade_proof(height, DEFAULT_UPGRADE_PATH, &path)
                .map_err(RelayerError::Store)?;
            CommitmentProofBytes::try_from(proof).map_err(RelayerError::Proof)
        };

        let client_proof = prove(Path::UpgradeClientState(UpgradeClientStatePath {
            upgrade_path: DEFAULT_UPGRADE_PATH.to_string(),
            height: plan_height.revision_height(),
        }))?;
        let consensus_proof = prove(Path::UpgradeConsensusState(UpgradeConsensusStatePath {
            upgrade_path: DEFAULT_UPGRADE_PATH.to_string(),
            height: plan_height.revision_height(),
        }))?;

        Ok((client_proof, consensus_proof))
    }

    /// A header-chain client of this chain trusting its latest block, with
    /// the consensus state of that block.
    pub fn headerchain_client(
        &self,
        config: &ClientStateConfig,
    ) -> (HeaderChainClientState, HeaderChainConsensusState) {
        let latest_block = self.latest_block();
        let client_state = self
            .host
            .generate_client_state(latest_block.height(), config)
            .expect("valid client config");
        (client_state, latest_block.consensus_state())
    }

    /// The header of the block at `target_height` for a header-chain client
    /// trusting the block at `trusted_height`.
    pub fn headerchain_header(&self, target_height: &Height, trusted_height: &Height) -> Option<Header> {
        self.host.header(target_height, trusted_height)
    }

    /// The header a client backed by the mock sandbox program accepts for
    /// the block at `height`.
    pub fn sandbox_header(&self, height: &Height) -> Option<MockHeader> {
        self.host_block(height).map(|block| MockHeader {
            height: block.height(),
            timestamp: block.timestamp(),
            root: block.app_hash().clone(),
        })
    }

    /// Client and consensus states of a sandbox client of this chain run by
    /// the program registered under `checksum`.
    pub fn sandbox_client(&self, checksum: &[u8]) -> (Any, Any) {
        let header = self
            .sandbox_header(&self.latest_height())
            .expect("latest block exists");
        mock_sandbox_client(checksum, &header, DEFAULT_UPGRADE_PATH)
    }

    pub fn events(&self) -> &[IbcEvent] {
        &self.ibc_store.events
    }

    pub fn logs(&self) -> &[String] {
        &self.ibc_store.logs
    }

    /// The latest event `select` picks out.
    pub fn last_event<T>(&self, select: impl Fn(&IbcEvent) -> Option<T>) -> Option<T> {
        self.events().iter().rev().find_map(select)
    }
}

#[cfg(test)]
mod tests {
    use interlink_core::commitment_types::commitment::CommitmentRoot;
    use interlink_core::host::types::identifiers::ChainId;
    use interlink_core::host::types::path::ClientStatePath;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::single_block(1)]
    #[case::default_height(5)]
    #[case::long_history(30)]
    fn test_mock_history_validation(#[case] latest_height: u64) {
        let params = HostParams::builder().latest_height(latest_height).build();
        let mut ctx = MockContext::new(&params);

        ctx.host.validate().unwrap();
        let current_height = ctx.latest_height();
        assert_eq!(current_height.revision_height(), latest_height);

        ctx.advance_block();
        ctx.host.validate().unwrap();
        assert_eq!(ctx.latest_height(), current_height.increment());

        assert_eq!(
            ctx.host_block(&current_height).unwrap().height(),
            current_height
        );
        assert_eq!(
            ctx.ibc_store.host_consensus_state(&current_height).unwrap(),
            ctx.host_block(&current_height).unwrap().consensus_state()
        );
    }

    #[test]
    fn test_block_commits_the_store_root() {
        let mut ctx = MockContext::default();
        let path = ClientStatePath::new(ClientId::new("07-headerchain", 0).unwrap());
        ctx.ibc_store.set_path(&path.into(), b"value".to_vec());
        ctx.advance_block();

        let latest_height = ctx.latest_height();
        let root = ctx
            .ibc_store
            .store
            .root_at(latest_height.revision_height())
            .unwrap()
            .to_vec();
        assert_eq!(ctx.latest_block().app_hash(), &CommitmentRoot::from(root));
    }

    #[test]
    fn test_block_time_is_configurable() {
        let params = HostParams::builder()
            .chain_id(ChainId::new("mockgaia-1").unwrap())
            .block_time(Duration::from_secs(10))
            .build();
        let mut ctx = MockContext::new(&params);
        let before = ctx.latest_timestamp();

        ctx.advance_block_by(Duration::from_secs(60));
        assert_eq!(
            ctx.latest_timestamp().duration_since(&before),
            Some(Duration::from_secs(60))
        );
        assert_eq!(ctx.latest_height().revision_number(), 1);

        ctx.advance_block();
        assert_eq!(
            ctx.latest_timestamp().duration_since(&before),
            Some(Duration::from_secs(70))
        );
    }
}
