//! Blocks produced by the mock host.

use ed25519_dalek::{Signer, SigningKey};
use interlink_clients::headerchain::types::{
    BlockHeader, CommitSignature, ConsensusState, Header, SignedHeader, Validator, ValidatorSet,
};
use interlink_core::client::types::Height;
use interlink_core::commitment_types::commitment::CommitmentRoot;
use interlink_core::host::types::identifiers::ChainId;
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::Timestamp;

/// Voting power given to every validator of a mock host.
pub const VALIDATOR_POWER: u64 = 10;

/// Builds the validator set made of the public keys of `keys`.
pub fn validator_set_of(keys: &[SigningKey]) -> ValidatorSet {
    ValidatorSet::new(
        keys.iter()
            .map(|key| Validator::new(key.verifying_key().to_bytes(), VALIDATOR_POWER))
            .collect(),
    )
}

/// A block header signed by every validator of the host, along with the
/// set that signed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostBlock {
    signed_header: SignedHeader,
    validator_set: ValidatorSet,
}

impl HostBlock {
    /// Signs a block committing to `app_hash` with all of `validators`. The
    /// next validator set is the current one.
    pub fn generate(
        chain_id: &ChainId,
        height: Height,
        timestamp: Timestamp,
        app_hash: CommitmentRoot,
        validators: &[SigningKey],
    ) -> Self {
        let validator_set = validator_set_of(validators);
        let validators_hash = validator_set.hash();

        let header = BlockHeader {
            chain_id: chain_id.clone(),
            height,
            timestamp,
            app_hash,
            validators_hash: validators_hash.clone(),
            next_validators_hash: validators_hash,
        };

        let sign_bytes = header.sign_bytes();
        let commit = validators
            .iter()
            .map(|key| CommitSignature {
                pub_key: key.verifying_key().to_bytes(),
                signature: key.sign(&sign_bytes).to_bytes().to_vec(),
            })
            .collect();

        Self {
            signed_header: SignedHeader { header, commit },
            validator_set,
        }
    }

    pub fn height(&self) -> Height {
        self.signed_header.header.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.signed_header.header.timestamp
    }

    pub fn app_hash(&self) -> &CommitmentRoot {
        &self.signed_header.header.app_hash
    }

    pub fn signed_header(&self) -> &SignedHeader {
        &self.signed_header
    }

    pub fn validator_set(&self) -> &ValidatorSet {
        &self.validator_set
    }

    /// The consensus state a header-chain client stores for this block.
    pub fn consensus_state(&self) -> ConsensusState {
        let header = &self.signed_header.header;
        ConsensusState::new(
            header.app_hash.clone(),
            header.timestamp,
            header.next_validators_hash.clone(),
        )
    }

    /// Turns the block into a client message for a client that already
    /// trusts `trusted`.
    pub fn into_header(self, trusted: &HostBlock) -> Header {
        Header {
            signed_header: self.signed_header,
            validator_set: self.validator_set,
            trusted_height: trusted.height(),
            trusted_next_validator_set: trusted.validator_set.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use interlink_clients::headerchain::types::TrustThreshold;

    use super::*;
    use crate::utils::year_2023;

    #[test]
    fn test_generated_block_carries_a_full_commit() {
        let keys: Vec<_> = [1u8, 2, 3]
            .iter()
            .map(|seed| SigningKey::from_bytes(&[*seed; 32]))
            .collect();
        let chain_id = ChainId::new("mockgaia-0").unwrap();
        let block = HostBlock::generate(
            &chain_id,
            Height::new(0, 4).unwrap(),
            year_2023(),
            CommitmentRoot::from(vec![7; 32]),
            &keys,
        );

        let header = &block.signed_header().header;
        block
            .validator_set()
            .verify_commit(
                &header.sign_bytes(),
                &block.signed_header().commit,
                TrustThreshold::TWO_THIRDS,
            )
            .unwrap();
        assert_eq!(header.validators_hash, header.next_validators_hash);
        assert_eq!(block.consensus_state().root, CommitmentRoot::from(vec![7; 32]));
    }
}
