//! Validator sets and their commit signatures.

use ed25519_dalek::{Signature, SignatureError, Verifier, VerifyingKey};
use interlink_primitives::prelude::*;
use interlink_primitives::encode_to_vec;
use sha2::{Digest, Sha256};

use crate::types::error::HeaderChainError;
use crate::types::TrustThreshold;

/// A validator: an ed25519 public key and its voting power.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Validator {
    pub pub_key: [u8; 32],
    pub power: u64,
}

impl Validator {
    pub fn new(pub_key: [u8; 32], power: u64) -> Self {
        Self { pub_key, power }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ValidatorSet {
    pub validators: Vec<Validator>,
}

impl ValidatorSet {
    pub fn new(validators: Vec<Validator>) -> Self {
        Self { validators }
    }

    /// The sha256 digest of the set's canonical encoding. Headers commit to
    /// their signing set and to the next set through this hash.
    pub fn hash(&self) -> Vec<u8> {
        Sha256::digest(encode_to_vec(self)).to_vec()
    }

    pub fn total_power(&self) -> u64 {
        self.validators
            .iter()
            .fold(0u64, |acc, v| acc.saturating_add(v.power))
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    fn position(&self, pub_key: &[u8; 32]) -> Option<usize> {
        self.validators.iter().position(|v| &v.pub_key == pub_key)
    }

    /// Checks that the signatures in `commit` from members of this set
    /// carry more than `threshold` of the set's voting power.
    ///
    /// Signatures from keys outside the set are ignored. A signature from a
    /// member that does not verify over `sign_bytes` fails the whole commit.
    pub fn verify_commit(
        &self,
        sign_bytes: &[u8],
        commit: &[CommitSignature],
        threshold: TrustThreshold,
    ) -> Result<(), HeaderChainError> {
        if self.is_empty() {
            return Err(HeaderChainError::EmptyValidatorSet);
        }

        let mut seen = vec![false; self.validators.len()];
        let mut signed_power = 0u64;

        for commit_sig in commit {
            let Some(index) = self.position(&commit_sig.pub_key) else {
                continue;
            };
            if seen[index] {
                return Err(HeaderChainError::DuplicateSignature { index });
            }
            seen[index] = true;

            commit_sig
                .verify(sign_bytes)
                .map_err(|_| HeaderChainError::InvalidSignature { index })?;

            signed_power = signed_power.saturating_add(self.validators[index].power);
        }

        let total_power = self.total_power();
        if !threshold.is_exceeded_by(signed_power, total_power) {
            return Err(HeaderChainError::InsufficientVotingPower {
                signed: signed_power,
                total: total_power,
                numerator: threshold.numerator(),
                denominator: threshold.denominator(),
            });
        }

        Ok(())
    }
}

/// One validator's signature over a block header.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitSignature {
    pub pub_key: [u8; 32],
    pub signature: Vec<u8>,
}

impl CommitSignature {
    pub fn verify(&self, sign_bytes: &[u8]) -> Result<(), SignatureError> {
        let key = VerifyingKey::from_bytes(&self.pub_key)?;
        let signature = Signature::from_slice(&self.signature)?;
        key.verify(sign_bytes, &signature)
    }
}

#[cfg(test)]
mod tests {
    use ed25519_dalek::{Signer, SigningKey};
    use rstest::rstest;

    use super::*;

    fn signer(seed: u8) -> SigningKey {
        SigningKey::from_bytes(&[seed; 32])
    }

    fn set_of(seeds: &[u8]) -> ValidatorSet {
        ValidatorSet::new(
            seeds
                .iter()
                .map(|s| Validator::new(signer(*s).verifying_key().to_bytes(), 10))
                .collect(),
        )
    }

    fn commit_by(seeds: &[u8], msg: &[u8]) -> Vec<CommitSignature> {
        seeds
            .iter()
            .map(|s| CommitSignature {
                pub_key: signer(*s).verifying_key().to_bytes(),
                signature: signer(*s).sign(msg).to_bytes().to_vec(),
            })
            .collect()
    }

    #[rstest]
    #[case(&[1, 2, 3], true)]
    #[case(&[1, 2], false)]
    #[case(&[1, 2, 9], false)]
    fn test_commit_needs_two_thirds(#[case] signers: &[u8], #[case] accepted: bool) {
        let set = set_of(&[1, 2, 3]);
        let commit = commit_by(signers, b"block");
        assert_eq!(
            set.verify_commit(b"block", &commit, TrustThreshold::TWO_THIRDS)
                .is_ok(),
            accepted
        );
    }

    #[test]
    fn test_commit_rejects_bad_and_duplicate_signatures() {
        let set = set_of(&[1, 2, 3]);

        let mut forged = commit_by(&[1, 2, 3], b"block");
        forged[1].signature = signer(2).sign(b"other").to_bytes().to_vec();
        assert!(matches!(
            set.verify_commit(b"block", &forged, TrustThreshold::TWO_THIRDS),
            Err(HeaderChainError::InvalidSignature { .. })
        ));

        let duplicated = commit_by(&[1, 1, 2], b"block");
        assert!(matches!(
            set.verify_commit(b"block", &duplicated, TrustThreshold::TWO_THIRDS),
            Err(HeaderChainError::DuplicateSignature { index: 0 })
        ));
    }

    #[test]
    fn test_hash_depends_on_membership() {
        assert_eq!(set_of(&[1, 2]).hash(), set_of(&[1, 2]).hash());
        assert_ne!(set_of(&[1, 2]).hash(), set_of(&[1, 3]).hash());
    }
}
