//! A provable, versioned in-memory key/value store.
//!
//! Each committed version is a sha256 simple Merkle tree over the sorted
//! entries, split like the tendermint tree (the left subtree holds the
//! largest power of two strictly below the number of leaves). Proofs are
//! `ics23` commitment proofs following `ics23::tendermint_spec`.

use core::ops::Bound;

use displaydoc::Display;
use ics23::commitment_proof::Proof;
use ics23::{
    CommitmentProof, ExistenceProof, HashOp, HostFunctionsManager, InnerOp, NonExistenceProof,
};
use interlink_core::commitment_types::merkle::proof_spec;
use interlink_core::primitives::prelude::*;
use sha2::{Digest, Sha256};

pub type RawHeight = u64;

#[derive(Debug, Display)]
pub enum StoreError {
    /// no version committed at height `{0}`
    UnknownHeight(RawHeight),
    /// height `{height}` does not follow the last committed height `{latest}`
    NonIncreasingHeight { height: RawHeight, latest: RawHeight },
    /// cannot prove anything against an empty tree
    EmptyTree,
    /// failed to hash leaf: `{description}`
    Hashing { description: String },
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}

#[derive(Clone, Debug)]
struct Version {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
    root: Vec<u8>,
}

/// Working set plus every committed version, keyed by the height it was
/// committed at.
#[derive(Clone, Debug, Default)]
pub struct ProvableStore {
    working: BTreeMap<Vec<u8>, Vec<u8>>,
    versions: BTreeMap<RawHeight, Version>,
}

impl ProvableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.working.get(key).map(Vec::as_slice)
    }

    /// Reads `key` as it was committed at `height`.
    pub fn get_at(&self, height: RawHeight, key: &[u8]) -> Result<Option<&[u8]>, StoreError> {
        Ok(self.version(height)?.entries.get(key).map(Vec::as_slice))
    }

    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) -> Option<Vec<u8>> {
        self.working.insert(key, value)
    }

    pub fn delete(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.working.remove(key)
    }

    /// Iterates over the working entries whose key starts with `prefix`, in
    /// key order.
    pub fn prefix_iter<'a>(
        &'a self,
        prefix: &'a [u8],
    ) -> impl Iterator<Item = (&'a [u8], &'a [u8])> + 'a {
        self.working
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.as_slice(), value.as_slice()))
    }

    pub fn latest_height(&self) -> Option<RawHeight> {
        self.versions.keys().next_back().copied()
    }

    /// Freezes the working set as the version at `height` and returns its
    /// root.
    pub fn commit(&mut self, height: RawHeight) -> Result<Vec<u8>, StoreError> {
        if let Some(latest) = self.latest_height() {
            if height <= latest {
                return Err(StoreError::NonIncreasingHeight { height, latest });
            }
        }

        let leaves = self
            .working
            .iter()
            .map(|(key, value)| leaf_hash(key, value))
            .collect::<Result<Vec<_>, _>>()?;
        let root = merkle_root(&leaves);

        self.versions.insert(
            height,
            Version {
                entries: self.working.clone(),
                root: root.clone(),
            },
        );

        Ok(root)
    }

    pub fn root_at(&self, height: RawHeight) -> Result<&[u8], StoreError> {
        Ok(&self.version(height)?.root)
    }

    /// Proves the presence or the absence of `key` in the version at
    /// `height`.
    ///
    /// An absent key is proven by its committed neighbours; a key past
    /// either end of the tree only has one.
    pub fn get_proof(&self, height: RawHeight, key: &[u8]) -> Result<CommitmentProof, StoreError> {
        let version = self.version(height)?;
        if version.entries.is_empty() {
            return Err(StoreError::EmptyTree);
        }

        let entries: Vec<(&Vec<u8>, &Vec<u8>)> = version.entries.iter().collect();
        let leaves = entries
            .iter()
            .map(|(key, value)| leaf_hash(key, value))
            .collect::<Result<Vec<_>, _>>()?;

        let existence_proof = |index: usize| {
            let (key, value) = entries[index];
            ExistenceProof {
                key: key.clone(),
                value: value.clone(),
                leaf: proof_spec().leaf_spec,
                path: inner_path(&leaves, index),
            }
        };

        let proof = match entries.binary_search_by(|(candidate, _)| candidate.as_slice().cmp(key))
        {
            Ok(index) => Proof::Exist(existence_proof(index)),
            Err(index) => Proof::Nonexist(NonExistenceProof {
                key: key.to_vec(),
                left: index.checked_sub(1).map(&existence_proof),
                right: (index < entries.len()).then(|| existence_proof(index)),
            }),
        };

        Ok(CommitmentProof { proof: Some(proof) })
    }

    fn version(&self, height: RawHeight) -> Result<&Version, StoreError> {
        self.versions
            .get(&height)
            .ok_or(StoreError::UnknownHeight(height))
    }
}

fn leaf_hash(key: &[u8], value: &[u8]) -> Result<Vec<u8>, StoreError> {
    let leaf = ExistenceProof {
        key: key.to_vec(),
        value: value.to_vec(),
        leaf: proof_spec().leaf_spec,
        path: vec![],
    };
    ics23::calculate_existence_root::<HostFunctionsManager>(&leaf).map_err(|e| {
        StoreError::Hashing {
            description: e.to_string(),
        }
    })
}

fn inner_hash(left: &[u8], right: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update([1u8]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().to_vec()
}

/// Number of leaves in the left subtree of a tree with `n > 1` leaves.
fn split_point(n: usize) -> usize {
    let mut k = 1;
    while k * 2 < n {
        k *= 2;
    }
    k
}

fn merkle_root(leaves: &[Vec<u8>]) -> Vec<u8> {
    match leaves.len() {
        0 => Sha256::digest(b"").to_vec(),
        1 => leaves[0].clone(),
        n => {
            let k = split_point(n);
            inner_hash(&merkle_root(&leaves[..k]), &merkle_root(&leaves[k..]))
        }
    }
}

/// The inner nodes from the leaf at `index` up to the root.
fn inner_path(leaves: &[Vec<u8>], index: usize) -> Vec<InnerOp> {
    if leaves.len() <= 1 {
        return vec![];
    }

    let k = split_point(leaves.len());
    if index < k {
        let mut path = inner_path(&leaves[..k], index);
        path.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix: vec![1],
            suffix: merkle_root(&leaves[k..]),
        });
        path
    } else {
        let mut path = inner_path(&leaves[k..], index - k);
        let mut prefix = vec![1];
        prefix.extend(merkle_root(&leaves[..k]));
        path.push(InnerOp {
            hash: HashOp::Sha256.into(),
            prefix,
            suffix: vec![],
        });
        path
    }
}

#[cfg(test)]
mod tests {
    use interlink_core::commitment_types::commitment::{
        CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
    };
    use interlink_core::commitment_types::merkle::{verify_membership, verify_non_membership};
    use interlink_core::host::types::path::PathBytes;
    use rstest::rstest;

    use super::*;

    fn prefix() -> CommitmentPrefix {
        CommitmentPrefix::try_from(b"ibc/".to_vec()).unwrap()
    }

    fn path(name: &str) -> PathBytes {
        PathBytes::from(name.as_bytes().to_vec())
    }

    /// A store with `n` entries at `ibc/k01`, `ibc/k03`, ... committed at
    /// height 1.
    fn store_with(n: usize) -> (ProvableStore, CommitmentRoot) {
        let mut store = ProvableStore::new();
        for i in 0..n {
            let key = prefix().apply(format!("k{:02}", 2 * i + 1).as_bytes());
            store.set(key, format!("value-{i}").into_bytes());
        }
        let root = store.commit(1).unwrap();
        (store, CommitmentRoot::from(root))
    }

    fn proof(store: &ProvableStore, name: &str) -> CommitmentProofBytes {
        store
            .get_proof(1, &prefix().apply(name.as_bytes()))
            .unwrap()
            .try_into()
            .unwrap()
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(5)]
    #[case(8)]
    #[case(11)]
    fn test_every_key_proves_membership(#[case] n: usize) {
        let (store, root) = store_with(n);
        for i in 0..n {
            let name = format!("k{:02}", 2 * i + 1);
            verify_membership(
                &proof(&store, &name),
                &root,
                &prefix(),
                &path(&name),
                format!("value-{i}").as_bytes(),
            )
            .unwrap_or_else(|e| panic!("membership of {name} in {n} leaves: {e}"));
        }
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(6)]
    #[case(9)]
    fn test_every_gap_proves_non_membership(#[case] n: usize) {
        let (store, root) = store_with(n);
        // k00 precedes every key, k{2n} follows every key, the rest fall
        // between neighbours
        for i in 0..=n {
            let name = format!("k{:02}", 2 * i);
            verify_non_membership(&proof(&store, &name), &root, &prefix(), &path(&name))
                .unwrap_or_else(|e| panic!("absence of {name} in {n} leaves: {e}"));
        }
    }

    #[test]
    fn test_wrong_value_is_rejected() {
        let (store, root) = store_with(4);
        assert!(verify_membership(
            &proof(&store, "k03"),
            &root,
            &prefix(),
            &path("k03"),
            b"forged"
        )
        .is_err());
    }

    #[test]
    fn test_present_key_cannot_be_proven_absent() {
        let (store, root) = store_with(4);
        assert!(
            verify_non_membership(&proof(&store, "k03"), &root, &prefix(), &path("k03")).is_err()
        );
    }

    #[test]
    fn test_versions_are_independent() {
        let (mut store, root_1) = store_with(3);
        let key = prefix().apply(b"k01");
        store.set(key.clone(), b"changed".to_vec());
        let root_2 = CommitmentRoot::from(store.commit(2).unwrap());
        assert_ne!(root_1, root_2);

        assert_eq!(store.get_at(1, &key).unwrap(), Some(&b"value-0"[..]));
        assert_eq!(store.get_at(2, &key).unwrap(), Some(&b"changed"[..]));

        verify_membership(&proof(&store, "k01"), &root_1, &prefix(), &path("k01"), b"value-0")
            .unwrap();
    }

    #[test]
    fn test_commit_heights_must_increase() {
        let (mut store, _) = store_with(1);
        assert!(matches!(
            store.commit(1),
            Err(StoreError::NonIncreasingHeight {
                height: 1,
                latest: 1
            })
        ));
        assert!(matches!(
            store.get_proof(7, b"ibc/k01"),
            Err(StoreError::UnknownHeight(7))
        ));
    }

    #[test]
    fn test_prefix_iteration_stops_at_prefix_end() {
        let mut store = ProvableStore::new();
        store.set(b"a/1".to_vec(), vec![1]);
        store.set(b"b/1".to_vec(), vec![2]);
        store.set(b"b/2".to_vec(), vec![3]);
        store.set(b"c/1".to_vec(), vec![4]);

        let keys: Vec<_> = store.prefix_iter(b"b/").map(|(key, _)| key).collect();
        assert_eq!(keys, vec![&b"b/1"[..], &b"b/2"[..]]);
    }
}
