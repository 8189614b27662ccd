//! A mock host chain: an ordered history of blocks signed by a fixed set of
//! ed25519 validators, whose headers a header-chain client of the host can
//! verify.

use core::time::Duration;

use ed25519_dalek::SigningKey;
use interlink_clients::headerchain::types::{ClientState, Header, ValidatorSet};
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::{CommitmentPrefix, CommitmentRoot};
use interlink_core::connection::types::version::Version as ConnectionVersion;
use interlink_core::host::types::identifiers::ChainId;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::Timestamp;
use typed_builder::TypedBuilder;

use crate::fixtures::clients::headerchain::ClientStateConfig;
use crate::utils::year_2023;

mod block;

pub use block::{validator_set_of, HostBlock, VALIDATOR_POWER};

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

/// Store prefix under which a mock host commits its state.
pub const DEFAULT_COMMITMENT_PREFIX: &[u8] = b"ibc/";

/// Store prefix under which a mock host commits scheduled upgrades.
pub const DEFAULT_UPGRADE_PATH: &str = "upgrade";

/// Chain-level parameters of a mock host.
#[derive(Debug, TypedBuilder)]
pub struct HostParams {
    #[builder(default = ChainId::new("mockgaia-0").expect("Never fails"))]
    pub chain_id: ChainId,
    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    pub block_time: Duration,
    #[builder(default = Duration::from_secs(30))]
    pub max_expected_time_per_block: Duration,
    /// Each seed derives the ed25519 key of one validator.
    #[builder(default = vec![1, 2, 3])]
    pub validator_seeds: Vec<u8>,
    #[builder(default = CommitmentPrefix::try_from(DEFAULT_COMMITMENT_PREFIX.to_vec()).expect("Never fails"))]
    pub commitment_prefix: CommitmentPrefix,
    #[builder(default = ConnectionVersion::compatibles())]
    pub connection_versions: Vec<ConnectionVersion>,
    #[builder(default = year_2023())]
    pub genesis_timestamp: Timestamp,
    /// Number of blocks produced when the host is built.
    #[builder(default = 5)]
    pub latest_height: u64,
}

impl Default for HostParams {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug)]
pub struct MockHost {
    chain_id: ChainId,
    block_time: Duration,
    genesis_timestamp: Timestamp,
    validators: Vec<SigningKey>,
    history: Vec<HostBlock>,
}

impl MockHost {
    /// A host with no blocks yet.
    pub fn new(params: &HostParams) -> Self {
        Self {
            chain_id: params.chain_id.clone(),
            block_time: params.block_time,
            genesis_timestamp: params.genesis_timestamp,
            validators: params
                .validator_seeds
                .iter()
                .map(|seed| SigningKey::from_bytes(&[*seed; 32]))
                .collect(),
            history: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn block_time(&self) -> Duration {
        self.block_time
    }

    pub fn validators(&self) -> &[SigningKey] {
        &self.validators
    }

    pub fn validator_set(&self) -> ValidatorSet {
        validator_set_of(&self.validators)
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn latest_block(&self) -> Option<&HostBlock> {
        self.history.last()
    }

    pub fn latest_height(&self) -> Option<Height> {
        self.latest_block().map(HostBlock::height)
    }

    pub fn get_block(&self, target_height: &Height) -> Option<&HostBlock> {
        if target_height.revision_number() != self.chain_id.revision_number() {
            return None;
        }
        let index = usize::try_from(target_height.revision_height().checked_sub(1)?).ok()?;
        self.history.get(index)
    }

    /// Height and timestamp of the block the host produces next: height 1
    /// at genesis time, then one block time after the latest block.
    pub fn next_block_coordinates(&self) -> (Height, Timestamp) {
        match self.latest_block() {
            None => (
                Height::new(self.chain_id.revision_number(), 1).expect("Never fails"),
                self.genesis_timestamp,
            ),
            Some(latest) => (
                latest.height().increment(),
                (latest.timestamp() + self.block_time).expect("Never fails"),
            ),
        }
    }

    /// Signs a block without appending it to the history.
    pub fn generate_block(
        &self,
        height: Height,
        timestamp: Timestamp,
        app_hash: CommitmentRoot,
    ) -> HostBlock {
        HostBlock::generate(&self.chain_id, height, timestamp, app_hash, &self.validators)
    }

    /// Appends a block committing to `app_hash` at `timestamp`, which must
    /// not precede the latest block.
    pub fn push_block(&mut self, timestamp: Timestamp, app_hash: CommitmentRoot) -> &HostBlock {
        let (height, _) = self.next_block_coordinates();
        let block = self.generate_block(height, timestamp, app_hash);
        self.history.push(block);
        self.history.last().expect("Never fails")
    }

    /// A header-chain client state of this host, trusting the block at
    /// `latest_height`.
    pub fn generate_client_state(
        &self,
        latest_height: Height,
        config: &ClientStateConfig,
    ) -> Result<ClientState, String> {
        ClientState::new(
            self.chain_id.clone(),
            config.trust_level,
            config.trusting_period,
            config.unbonding_period,
            config.max_clock_drift,
            latest_height,
            config.upgrade_path.clone(),
        )
        .map_err(|e| e.to_string())
    }

    /// The header of the block at `target_height` for a client trusting the
    /// block at `trusted_height`.
    pub fn header(&self, target_height: &Height, trusted_height: &Height) -> Option<Header> {
        let trusted = self.get_block(trusted_height)?;
        Some(self.get_block(target_height)?.clone().into_header(trusted))
    }

    /// Checks that the history holds consecutive heights.
    pub fn validate(&self) -> Result<(), String> {
        for (index, block) in self.history.iter().enumerate() {
            let expected = index as u64 + 1;
            if block.height().revision_height() != expected {
                return Err(format!(
                    "block at position {index} has height {}, expected {expected}",
                    block.height()
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocks_follow_the_block_time() {
        let params = HostParams::builder().latest_height(0).build();
        let mut host = MockHost::new(&params);
        assert!(host.is_empty());

        for _ in 0..3 {
            let (_, timestamp) = host.next_block_coordinates();
            host.push_block(timestamp, CommitmentRoot::from(vec![1]));
        }
        host.validate().unwrap();

        let first = host.get_block(&Height::new(0, 1).unwrap()).unwrap();
        let third = host.get_block(&Height::new(0, 3).unwrap()).unwrap();
        assert_eq!(first.timestamp(), params.genesis_timestamp);
        assert_eq!(
            third.timestamp().duration_since(&first.timestamp()),
            Some(params.block_time * 2)
        );
        assert!(host.get_block(&Height::new(1, 1).unwrap()).is_none());
        assert!(host.get_block(&Height::new(0, 4).unwrap()).is_none());
    }
}
