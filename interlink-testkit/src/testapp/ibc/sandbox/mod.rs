//! A sandbox program for tests: a light client of a chain committing its
//! state in an ics23 provable store. It trusts every well-formed header and
//! freezes when two headers disagree on the root at the same height.

use core::sync::atomic::{AtomicBool, Ordering};

use interlink_clients::sandbox::store::{decode_value, encode_value, ClientStore, StoreKey};
use interlink_clients::sandbox::types::error::SandboxError;
use interlink_clients::sandbox::types::msgs::{
    InstantiateMsg, QueryMsg, SudoMsg, VerifyMembershipMsg, VerifyNonMembershipMsg,
    VerifyUpgradeAndUpdateStateMsg,
};
use interlink_clients::sandbox::types::response::{
    CheckForMisbehaviourResponse, StatusResponse, SudoResponse, TimestampAtHeightResponse,
    VerifyClientMessageResponse,
};
use interlink_clients::sandbox::types::{ClientMessage, ClientState, ConsensusState};
use interlink_clients::sandbox::SandboxProgram;
use interlink_core::client::types::error::ClientError;
use interlink_core::client::types::{Height, Status};
use interlink_core::commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use interlink_core::commitment_types::merkle;
use interlink_core::host::types::path::{
    Path, PathBytes, UpgradeClientStatePath, UpgradeConsensusStatePath,
};
use interlink_core::primitives::prelude::*;
use interlink_core::primitives::{encode_to_vec, Any, Timestamp};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Checksum the mock program is registered under by default.
pub const MOCK_PROGRAM_CHECKSUM: &[u8] = b"mock-sandbox-program";

/// The program's view of the client, kept in the client state's `data`.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockClientData {
    pub latest_height: Height,
    pub frozen: bool,
    /// Store prefix under which the tracked chain commits upgraded states.
    pub upgrade_path: String,
}

/// A header of the tracked chain, carried in a client message's `data`.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockHeader {
    pub height: Height,
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
}

/// The program's view of a consensus state, kept in its `data`.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockConsensusData {
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
}

impl MockClientData {
    pub fn new(latest_height: Height, upgrade_path: impl Into<String>) -> Self {
        Self {
            latest_height,
            frozen: false,
            upgrade_path: upgrade_path.into(),
        }
    }

    /// The sandbox client state wrapping this data.
    pub fn into_client_state(self, checksum: &[u8]) -> ClientState {
        let latest_height = self.latest_height;
        ClientState::new(encode_to_vec(&self), checksum.to_vec(), latest_height)
    }
}

impl From<&MockHeader> for MockConsensusData {
    fn from(header: &MockHeader) -> Self {
        Self {
            timestamp: header.timestamp,
            root: header.root.clone(),
        }
    }
}

impl MockConsensusData {
    pub fn into_consensus_state(self) -> ConsensusState {
        ConsensusState::new(encode_to_vec(&self), self.timestamp, self.root)
    }
}

impl MockHeader {
    pub fn into_client_message(self) -> ClientMessage {
        ClientMessage {
            data: encode_to_vec(&self),
        }
    }
}

fn program_error(description: impl ToString) -> ClientError {
    SandboxError::program(description).into()
}

fn from_borsh<T: borsh::BorshDeserialize>(bytes: &[u8]) -> Result<T, ClientError> {
    borsh::from_slice(bytes).map_err(program_error)
}

fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| SandboxError::json(e).into())
}

fn to_json<T: Serialize>(response: &T) -> Result<Vec<u8>, ClientError> {
    serde_json::to_vec(response).map_err(|e| SandboxError::json(e).into())
}

fn load_client(store: &dyn ClientStore) -> Result<(ClientState, MockClientData), ClientError> {
    let bytes = store
        .get(&StoreKey::ClientState.to_vec())?
        .ok_or_else(|| program_error("client state not found"))?;
    let client_state = ClientState::try_from(decode_value(&bytes)?)?;
    let data = from_borsh(&client_state.data)?;
    Ok((client_state, data))
}

fn save_client(
    store: &mut dyn ClientStore,
    checksum: &[u8],
    data: MockClientData,
) -> Result<(), ClientError> {
    store.set(
        &StoreKey::ClientState.to_vec(),
        encode_value(data.into_client_state(checksum)),
    )
}

fn load_consensus(
    store: &dyn ClientStore,
    height: Height,
) -> Result<Option<MockConsensusData>, ClientError> {
    store
        .get(&StoreKey::ConsensusState(height).to_vec())?
        .map(|bytes| {
            let consensus_state = ConsensusState::try_from(decode_value(&bytes)?)?;
            from_borsh(&consensus_state.data)
        })
        .transpose()
}

fn save_consensus(
    store: &mut dyn ClientStore,
    height: Height,
    data: MockConsensusData,
) -> Result<(), ClientError> {
    store.set(
        &StoreKey::ConsensusState(height).to_vec(),
        encode_value(data.into_consensus_state()),
    )
}

fn proof_inputs(
    prefix: Vec<u8>,
    proof: Vec<u8>,
) -> Result<(CommitmentPrefix, CommitmentProofBytes), ClientError> {
    let prefix = CommitmentPrefix::try_from(prefix).map_err(ClientError::InvalidProof)?;
    let proof = CommitmentProofBytes::try_from(proof).map_err(ClientError::InvalidProof)?;
    Ok((prefix, proof))
}

/// The mock program. Records the entry points it served, in order.
#[derive(Debug, Default)]
pub struct MockSandboxProgram {
    calls: Mutex<Vec<String>>,
    omit_updated_heights: AtomicBool,
}

impl MockSandboxProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes later updates store their consensus state but answer without
    /// the updated heights, as a faulty program would.
    pub fn omit_updated_heights(&self) {
        self.omit_updated_heights.store(true, Ordering::Relaxed);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: &str) {
        tracing::trace!(call, "mock sandbox program called");
        self.calls.lock().push(call.to_string());
    }

    fn root_at(store: &dyn ClientStore, height: Height) -> Result<CommitmentRoot, ClientError> {
        load_consensus(store, height)?
            .map(|consensus| consensus.root)
            .ok_or_else(|| program_error(format!("no consensus state at {height}")))
    }

    fn verify_membership(
        store: &dyn ClientStore,
        msg: VerifyMembershipMsg,
    ) -> Result<(), ClientError> {
        let root = Self::root_at(store, msg.height)?;
        let (prefix, proof) = proof_inputs(msg.prefix, msg.proof)?;
        merkle::verify_membership(&proof, &root, &prefix, &PathBytes::from(msg.path), &msg.value)
            .map_err(ClientError::InvalidProof)
    }

    fn verify_non_membership(
        store: &dyn ClientStore,
        msg: VerifyNonMembershipMsg,
    ) -> Result<(), ClientError> {
        let root = Self::root_at(store, msg.height)?;
        let (prefix, proof) = proof_inputs(msg.prefix, msg.proof)?;
        merkle::verify_non_membership(&proof, &root, &prefix, &PathBytes::from(msg.path))
            .map_err(ClientError::InvalidProof)
    }

    /// Checks the upgraded client and consensus states against the root of
    /// the latest consensus state, under the tracked chain's upgrade path.
    /// The chain commits the full envelopes, so they are rebuilt from the
    /// program data before verification.
    fn verify_upgrade(
        store: &dyn ClientStore,
        msg: VerifyUpgradeAndUpdateStateMsg,
    ) -> Result<(), ClientError> {
        let (client_state, data) = load_client(store)?;
        let root = Self::root_at(store, data.latest_height)?;
        let height = data.latest_height.revision_height();
        let prefix = format!("{}/", data.upgrade_path).into_bytes();

        let upgraded_client: MockClientData = from_borsh(&msg.upgrade_client_state)?;
        let upgraded_consensus: MockConsensusData = from_borsh(&msg.upgrade_consensus_state)?;

        let checks = [
            (
                Path::UpgradeClientState(UpgradeClientStatePath {
                    upgrade_path: data.upgrade_path.clone(),
                    height,
                }),
                msg.proof_upgrade_client,
                encode_to_vec(&Any::from(
                    upgraded_client.into_client_state(&client_state.checksum),
                )),
            ),
            (
                Path::UpgradeConsensusState(UpgradeConsensusStatePath {
                    upgrade_path: data.upgrade_path,
                    height,
                }),
                msg.proof_upgrade_consensus_state,
                encode_to_vec(&Any::from(upgraded_consensus.into_consensus_state())),
            ),
        ];

        for (path, proof, value) in checks {
            let (prefix, proof) = proof_inputs(prefix.clone(), proof)?;
            merkle::verify_membership(&proof, &root, &prefix, &path.to_bytes(), &value)
                .map_err(ClientError::InvalidProof)?;
        }

        Ok(())
    }

    /// A header conflicts when a consensus state at its height commits to
    /// another root.
    fn conflicts(store: &dyn ClientStore, header: &MockHeader) -> Result<bool, ClientError> {
        Ok(load_consensus(store, header.height)?
            .is_some_and(|existing| existing.root != header.root))
    }
}

impl SandboxProgram for MockSandboxProgram {
    fn instantiate(&self, store: &mut dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError> {
        self.record("instantiate");

        let msg: InstantiateMsg = from_json(msg)?;
        let data: MockClientData = from_borsh(&msg.client_state)?;
        let consensus: MockConsensusData = from_borsh(&msg.consensus_state)?;

        if data.latest_height != msg.latest_height {
            return Err(program_error("client data disagrees on the latest height"));
        }

        save_client(store, &msg.checksum, data)?;
        save_consensus(store, msg.latest_height, consensus)?;

        to_json(&SudoResponse::success())
    }

    fn sudo(&self, store: &mut dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError> {
        let response = match from_json::<SudoMsg>(msg)? {
            SudoMsg::UpdateState(msg) => {
                self.record("sudo:update_state");

                let header: MockHeader = from_borsh(&msg.client_message)?;
                let (client_state, mut data) = load_client(&*store)?;

                if header.height > data.latest_height {
                    data.latest_height = header.height;
                }
                save_consensus(store, header.height, MockConsensusData::from(&header))?;
                save_client(store, &client_state.checksum, data)?;

                if self.omit_updated_heights.load(Ordering::Relaxed) {
                    SudoResponse::success()
                } else {
                    SudoResponse::success().heights(vec![header.height])
                }
            }
            SudoMsg::UpdateStateOnMisbehaviour(_) => {
                self.record("sudo:update_state_on_misbehaviour");

                let (client_state, mut data) = load_client(&*store)?;
                data.frozen = true;
                save_client(store, &client_state.checksum, data)?;

                SudoResponse::success()
            }
            SudoMsg::VerifyMembership(msg) => {
                self.record("sudo:verify_membership");
                Self::verify_membership(&*store, msg)?;
                SudoResponse::success()
            }
            SudoMsg::VerifyNonMembership(msg) => {
                self.record("sudo:verify_non_membership");
                Self::verify_non_membership(&*store, msg)?;
                SudoResponse::success()
            }
            SudoMsg::VerifyUpgradeAndUpdateState(msg) => {
                self.record("sudo:verify_upgrade_and_update_state");
                Self::verify_upgrade(&*store, msg)?;
                SudoResponse::success()
            }
        };

        to_json(&response)
    }

    fn query(&self, store: &dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError> {
        match from_json::<QueryMsg>(msg)? {
            QueryMsg::Status(_) => {
                self.record("query:status");

                let (_, data) = load_client(store)?;
                let status = if data.frozen {
                    Status::Frozen
                } else {
                    Status::Active
                };
                to_json(&StatusResponse {
                    status: status.to_string(),
                })
            }
            QueryMsg::TimestampAtHeight(msg) => {
                self.record("query:timestamp_at_height");

                let consensus = load_consensus(store, msg.height)?
                    .ok_or_else(|| program_error(format!("no consensus state at {}", msg.height)))?;
                to_json(&TimestampAtHeightResponse {
                    timestamp: consensus.timestamp.nanoseconds(),
                })
            }
            QueryMsg::VerifyClientMessage(msg) => {
                self.record("query:verify_client_message");

                let is_valid = match from_borsh::<MockHeader>(&msg.client_message) {
                    Ok(header) => {
                        let (_, data) = load_client(store)?;
                        !data.frozen && header.height.revision_number() == data.latest_height.revision_number()
                    }
                    Err(_) => false,
                };
                to_json(&VerifyClientMessageResponse { is_valid })
            }
            QueryMsg::CheckForMisbehaviour(msg) => {
                self.record("query:check_for_misbehaviour");

                let header: MockHeader = from_borsh(&msg.client_message)?;
                to_json(&CheckForMisbehaviourResponse {
                    found_misbehaviour: Self::conflicts(store, &header)?,
                })
            }
        }
    }
}

/// Builds the `Any` envelopes creating a sandbox client backed by the mock
/// program.
pub fn mock_sandbox_client(
    checksum: &[u8],
    header: &MockHeader,
    upgrade_path: impl Into<String>,
) -> (Any, Any) {
    let client_state = MockClientData::new(header.height, upgrade_path).into_client_state(checksum);
    let consensus_state = MockConsensusData::from(header).into_consensus_state();
    (client_state.into(), consensus_state.into())
}

#[cfg(test)]
mod tests {
    use interlink_clients::sandbox::types::msgs::{StatusMsg, UpdateStateMsg};

    use super::*;

    #[derive(Default)]
    struct MemoryStore(BTreeMap<Vec<u8>, Vec<u8>>);

    impl ClientStore for MemoryStore {
        fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ClientError> {
            Ok(self.0.get(key).cloned())
        }

        fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), ClientError> {
            self.0.insert(key.to_vec(), value);
            Ok(())
        }

        fn delete(&mut self, key: &[u8]) -> Result<(), ClientError> {
            self.0.remove(key);
            Ok(())
        }
    }

    fn header(height: u64, root: &[u8]) -> MockHeader {
        MockHeader {
            height: Height::new(0, height).unwrap(),
            timestamp: Timestamp::from_nanoseconds(height * 1_000_000_000).unwrap(),
            root: CommitmentRoot::from_bytes(root),
        }
    }

    fn instantiated(program: &MockSandboxProgram) -> MemoryStore {
        let mut store = MemoryStore::default();
        let genesis = header(1, b"root-1");
        let msg = InstantiateMsg {
            client_state: encode_to_vec(&MockClientData::new(genesis.height, "upgrade")),
            consensus_state: encode_to_vec(&MockConsensusData::from(&genesis)),
            checksum: MOCK_PROGRAM_CHECKSUM.to_vec(),
            latest_height: genesis.height,
        };
        program
            .instantiate(&mut store, &serde_json::to_vec(&msg).unwrap())
            .unwrap();
        store
    }

    fn status(program: &MockSandboxProgram, store: &MemoryStore) -> String {
        let msg = serde_json::to_vec(&QueryMsg::from(StatusMsg {})).unwrap();
        let response: StatusResponse =
            serde_json::from_slice(&program.query(store, &msg).unwrap()).unwrap();
        response.status
    }

    #[test]
    fn test_update_advances_latest_height() {
        let program = MockSandboxProgram::new();
        let mut store = instantiated(&program);

        let msg = SudoMsg::from(UpdateStateMsg {
            client_message: encode_to_vec(&header(4, b"root-4")),
        });
        let response: SudoResponse = serde_json::from_slice(
            &program
                .sudo(&mut store, &serde_json::to_vec(&msg).unwrap())
                .unwrap(),
        )
        .unwrap();

        assert_eq!(response.heights, Some(vec![Height::new(0, 4).unwrap()]));
        let (client_state, data) = load_client(&store).unwrap();
        assert_eq!(client_state.latest_height, Height::new(0, 4).unwrap());
        assert!(!data.frozen);
        assert_eq!(status(&program, &store), "Active");
        assert_eq!(
            program.calls(),
            vec!["instantiate", "sudo:update_state", "query:status"]
        );
    }

    #[test]
    fn test_conflicting_root_is_misbehaviour() {
        let program = MockSandboxProgram::new();
        let store = instantiated(&program);

        assert!(MockSandboxProgram::conflicts(&store, &header(1, b"forged")).unwrap());
        assert!(!MockSandboxProgram::conflicts(&store, &header(1, b"root-1")).unwrap());
        assert!(!MockSandboxProgram::conflicts(&store, &header(2, b"anything")).unwrap());
    }

    #[test]
    fn test_status_of_missing_client_is_an_error() {
        let program = MockSandboxProgram::new();
        let msg = serde_json::to_vec(&QueryMsg::from(StatusMsg {})).unwrap();
        assert!(program.query(&MemoryStore::default(), &msg).is_err());
    }
}
