//! Proof verifier: pure functions checking a proof blob against a root.
//!
//! Keys are committed in a single sha256 simple Merkle tree
//! (`ics23::tendermint_spec`). The proven key is `prefix ++ path`.

use ics23::commitment_proof::Proof;
use ics23::{HostFunctionsManager, ProofSpec};
use interlink_core_host_types::path::PathBytes;
use interlink_primitives::prelude::*;

use crate::commitment::{CommitmentPrefix, CommitmentProofBytes, CommitmentRoot};
use crate::error::CommitmentError;

/// The proof format every commitment proof must follow.
pub fn proof_spec() -> ProofSpec {
    ics23::tendermint_spec()
}

/// Succeeds iff `proof` demonstrates that `value` is stored under
/// `prefix ++ path` in the tree committed to by `root`.
pub fn verify_membership(
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    prefix: &CommitmentPrefix,
    path: &PathBytes,
    value: &[u8],
) -> Result<(), CommitmentError> {
    if value.is_empty() {
        return Err(CommitmentError::EmptyVerifiedValue);
    }
    let (commitment_proof, key) = prepare(proof, root, prefix, path)?;

    match &commitment_proof.proof {
        Some(Proof::Exist(existence)) => ensure_key(&key, &existence.key)?,
        _ => {
            return Err(CommitmentError::UnexpectedProofKind {
                expected: "existence".to_string(),
            })
        }
    }

    if ics23::verify_membership::<HostFunctionsManager>(
        &commitment_proof,
        &proof_spec(),
        &root.as_bytes().to_vec(),
        &key,
        value,
    ) {
        Ok(())
    } else {
        Err(CommitmentError::VerificationFailure)
    }
}

/// Succeeds iff `proof` demonstrates that nothing is stored under
/// `prefix ++ path` in the tree committed to by `root`.
pub fn verify_non_membership(
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    prefix: &CommitmentPrefix,
    path: &PathBytes,
) -> Result<(), CommitmentError> {
    let (commitment_proof, key) = prepare(proof, root, prefix, path)?;

    match &commitment_proof.proof {
        Some(Proof::Nonexist(non_existence)) => ensure_key(&key, &non_existence.key)?,
        _ => {
            return Err(CommitmentError::UnexpectedProofKind {
                expected: "non-existence".to_string(),
            })
        }
    }

    if ics23::verify_non_membership::<HostFunctionsManager>(
        &commitment_proof,
        &proof_spec(),
        &root.as_bytes().to_vec(),
        &key,
    ) {
        Ok(())
    } else {
        Err(CommitmentError::VerificationFailure)
    }
}

fn prepare(
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    prefix: &CommitmentPrefix,
    path: &PathBytes,
) -> Result<(ics23::CommitmentProof, Vec<u8>), CommitmentError> {
    if root.is_empty() {
        return Err(CommitmentError::EmptyCommitmentRoot);
    }
    if prefix.is_empty() {
        return Err(CommitmentError::EmptyCommitmentPrefix);
    }
    if path.is_empty() {
        return Err(CommitmentError::EmptyCommitmentPath);
    }

    Ok((proof.to_ics23()?, prefix.apply(path.as_slice())))
}

fn ensure_key(expected: &[u8], actual: &[u8]) -> Result<(), CommitmentError> {
    if expected != actual {
        return Err(CommitmentError::MismatchedKey {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ics23::{ExistenceProof, InnerOp, NonExistenceProof};
    use rstest::rstest;
    use sha2::{Digest, Sha256};

    use super::*;

    fn leaf(key: &[u8], value: &[u8]) -> ExistenceProof {
        ExistenceProof {
            key: key.to_vec(),
            value: value.to_vec(),
            leaf: proof_spec().leaf_spec,
            path: vec![],
        }
    }

    fn leaf_hash(key: &[u8], value: &[u8]) -> Vec<u8> {
        ics23::calculate_existence_root::<HostFunctionsManager>(&leaf(key, value)).unwrap()
    }

    fn inner_hash(left: &[u8], right: &[u8]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update([1u8]);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().to_vec()
    }

    fn left_child(sibling: &[u8]) -> InnerOp {
        InnerOp {
            hash: ics23::HashOp::Sha256.into(),
            prefix: vec![1],
            suffix: sibling.to_vec(),
        }
    }

    fn right_child(sibling: &[u8]) -> InnerOp {
        let mut prefix = vec![1];
        prefix.extend_from_slice(sibling);
        InnerOp {
            hash: ics23::HashOp::Sha256.into(),
            prefix,
            suffix: vec![],
        }
    }

    fn prefix() -> CommitmentPrefix {
        CommitmentPrefix::try_from(b"ibc/".to_vec()).unwrap()
    }

    /// A two-leaf tree over `ibc/a` and `ibc/c`.
    fn two_leaf_tree() -> (CommitmentRoot, ExistenceProof, ExistenceProof) {
        let (ka, va) = (b"ibc/a".to_vec(), b"alpha".to_vec());
        let (kc, vc) = (b"ibc/c".to_vec(), b"gamma".to_vec());
        let ha = leaf_hash(&ka, &va);
        let hc = leaf_hash(&kc, &vc);
        let root = CommitmentRoot::from(inner_hash(&ha, &hc));

        let mut pa = leaf(&ka, &va);
        pa.path.push(left_child(&hc));
        let mut pc = leaf(&kc, &vc);
        pc.path.push(right_child(&ha));
        (root, pa, pc)
    }

    fn exist(proof: ExistenceProof) -> CommitmentProofBytes {
        ics23::CommitmentProof {
            proof: Some(Proof::Exist(proof)),
        }
        .try_into()
        .unwrap()
    }

    #[test]
    fn test_membership_accepts_valid_proof() {
        let (root, pa, pc) = two_leaf_tree();
        let path_a = PathBytes::from(b"a".to_vec());
        let path_c = PathBytes::from(b"c".to_vec());

        verify_membership(&exist(pa), &root, &prefix(), &path_a, b"alpha").unwrap();
        verify_membership(&exist(pc), &root, &prefix(), &path_c, b"gamma").unwrap();
    }

    #[test]
    fn test_membership_rejects_wrong_value_and_root() {
        let (root, pa, _) = two_leaf_tree();
        let path_a = PathBytes::from(b"a".to_vec());

        assert!(matches!(
            verify_membership(&exist(pa.clone()), &root, &prefix(), &path_a, b"beta"),
            Err(CommitmentError::VerificationFailure)
        ));
        let other_root = CommitmentRoot::from(vec![7; 32]);
        assert!(verify_membership(&exist(pa.clone()), &other_root, &prefix(), &path_a, b"alpha").is_err());

        let path_c = PathBytes::from(b"c".to_vec());
        assert!(matches!(
            verify_membership(&exist(pa), &root, &prefix(), &path_c, b"alpha"),
            Err(CommitmentError::MismatchedKey { .. })
        ));
    }

    #[rstest]
    #[case::other_value(b"a", b"beta")]
    #[case::other_path(b"c", b"alpha")]
    #[case::absent_path(b"b", b"alpha")]
    #[case::empty_value(b"a", b"")]
    fn test_leaf_proof_binds_path_and_value(#[case] path: &[u8], #[case] value: &[u8]) {
        let (root, pa, _) = two_leaf_tree();
        let path = PathBytes::from(path.to_vec());
        assert!(verify_membership(&exist(pa), &root, &prefix(), &path, value).is_err());
    }

    #[test]
    fn test_non_membership_between_neighbours() {
        let (root, pa, pc) = two_leaf_tree();
        let proof: CommitmentProofBytes = ics23::CommitmentProof {
            proof: Some(Proof::Nonexist(NonExistenceProof {
                key: b"ibc/b".to_vec(),
                left: Some(pa.clone()),
                right: Some(pc),
            })),
        }
        .try_into()
        .unwrap();

        let path_b = PathBytes::from(b"b".to_vec());
        verify_non_membership(&proof, &root, &prefix(), &path_b).unwrap();

        // a membership proof is not accepted as a non-membership proof
        let path_a = PathBytes::from(b"a".to_vec());
        assert!(verify_non_membership(&exist(pa), &root, &prefix(), &path_a).is_err());
    }

    #[test]
    fn test_empty_inputs_rejected() {
        let (root, pa, _) = two_leaf_tree();
        let empty_path = PathBytes::from(Vec::new());
        assert!(matches!(
            verify_membership(&exist(pa.clone()), &root, &prefix(), &empty_path, b"alpha"),
            Err(CommitmentError::EmptyCommitmentPath)
        ));
        let path_a = PathBytes::from(b"a".to_vec());
        assert!(matches!(
            verify_membership(&exist(pa), &root, &prefix(), &path_a, b""),
            Err(CommitmentError::EmptyVerifiedValue)
        ));
    }
}
