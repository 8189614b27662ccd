//! The key/value view of the host store handed to sandbox programs.
//!
//! A program sees two kinds of keys: [`CLIENT_STATE_KEY`] and
//! `consensusStates/{revision}-{height}`. Values are borsh-encoded [`Any`]
//! envelopes holding the sandbox [`ClientState`] and [`ConsensusState`]
//! wrappers. The adapters below translate these keys into the host's
//! client contexts.

use core::str::FromStr;

use interlink_core_client::context::{ClientExecutionContext, ClientValidationContext, Convertible};
use interlink_core_client::types::error::ClientError;
use interlink_core_client::types::Height;
use interlink_core_handler_types::error::ContextError;
use interlink_core_host::types::identifiers::ClientId;
use interlink_core_host::types::path::{ClientConsensusStatePath, ClientStatePath};
use interlink_primitives::prelude::*;
use interlink_primitives::{encode_to_vec, Any, DecodingError};

use crate::types::error::SandboxError;
use crate::types::{ClientState, ConsensusState};

pub const CLIENT_STATE_KEY: &str = "clientState";
pub const CONSENSUS_STATE_KEY_PREFIX: &str = "consensusStates/";

/// Byte-keyed storage scoped to a single client.
pub trait ClientStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ClientError>;

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), ClientError>;

    fn delete(&mut self, key: &[u8]) -> Result<(), ClientError>;
}

/// A parsed client store key. The client state orders first.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum StoreKey {
    ClientState,
    ConsensusState(Height),
}

impl StoreKey {
    pub fn parse(key: &[u8]) -> Result<Self, SandboxError> {
        let key = core::str::from_utf8(key).map_err(|e| {
            SandboxError::Decoding(DecodingError::InvalidUtf8 {
                description: e.to_string(),
            })
        })?;

        if key == CLIENT_STATE_KEY {
            return Ok(Self::ClientState);
        }

        key.strip_prefix(CONSENSUS_STATE_KEY_PREFIX)
            .and_then(|raw_height| Height::from_str(raw_height).ok())
            .map(Self::ConsensusState)
            .ok_or_else(|| SandboxError::UnknownStoreKey(key.to_string()))
    }

    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Self::ClientState => CLIENT_STATE_KEY.as_bytes().to_vec(),
            Self::ConsensusState(height) => {
                format!("{CONSENSUS_STATE_KEY_PREFIX}{height}").into_bytes()
            }
        }
    }
}

/// Encodes a stored value.
pub fn encode_value(value: impl Into<Any>) -> Vec<u8> {
    encode_to_vec(&value.into())
}

/// Decodes a stored value.
pub fn decode_value(bytes: &[u8]) -> Result<Any, DecodingError> {
    borsh::from_slice(bytes).map_err(DecodingError::invalid_raw_data)
}

/// Reads `key` for `client_id` from the host, treating a missing state as
/// an absent key.
fn read<V>(ctx: &V, client_id: &ClientId, key: &[u8]) -> Result<Option<Vec<u8>>, ClientError>
where
    V: ClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    match StoreKey::parse(key)? {
        StoreKey::ClientState => match ctx.client_state(client_id) {
            Ok(client_state) => Ok(Some(encode_value(client_state))),
            Err(ContextError::ClientError(ClientError::ClientStateNotFound { .. })) => Ok(None),
            Err(e) => Err(e.into()),
        },
        StoreKey::ConsensusState(height) => {
            match ctx.consensus_state(&consensus_state_path(client_id, height)) {
                Ok(consensus_state) => {
                    let consensus_state: ConsensusState =
                        consensus_state.try_into().map_err(Into::into)?;
                    Ok(Some(encode_value(consensus_state)))
                }
                Err(ContextError::ClientError(ClientError::ConsensusStateNotFound { .. })) => {
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}

/// A store for verification and queries: reads go to the host, writes stay
/// in memory and are dropped with the store.
pub struct ScratchStore<'a, V> {
    ctx: &'a V,
    client_id: &'a ClientId,
    writes: BTreeMap<Vec<u8>, Option<Vec<u8>>>,
}

impl<'a, V> ScratchStore<'a, V> {
    pub fn new(ctx: &'a V, client_id: &'a ClientId) -> Self {
        Self {
            ctx,
            client_id,
            writes: BTreeMap::new(),
        }
    }
}

impl<'a, V> ClientStore for ScratchStore<'a, V>
where
    V: ClientValidationContext,
    ConsensusState: Convertible<V::ConsensusStateRef>,
    <ConsensusState as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ClientError> {
        match self.writes.get(key) {
            Some(value) => Ok(value.clone()),
            None => read(self.ctx, self.client_id, key),
        }
    }

    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), ClientError> {
        StoreKey::parse(key)?;
        self.writes.insert(key.to_vec(), Some(value));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), ClientError> {
        StoreKey::parse(key)?;
        self.writes.insert(key.to_vec(), None);
        Ok(())
    }
}

/// A store staging a program's writes for the host's client execution
/// context.
///
/// Reads see the staged writes. Nothing reaches the host until
/// [`HostStore::commit`], so a rejected program call leaves the client
/// untouched. Committing a consensus state also records the host time and
/// height of the write, which the delay period is measured from; deleting
/// one removes that record too.
pub struct HostStore<'a, E> {
    ctx: &'a mut E,
    client_id: &'a ClientId,
    staged: BTreeMap<StoreKey, Option<Any>>,
}

impl<'a, E> HostStore<'a, E> {
    pub fn new(ctx: &'a mut E, client_id: &'a ClientId) -> Self {
        Self {
            ctx,
            client_id,
            staged: BTreeMap::new(),
        }
    }
}

impl<'a, E> HostStore<'a, E>
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientState>,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    /// Writes the staged entries to the host, client state first.
    pub fn commit(self) -> Result<(), ClientError> {
        let Self {
            ctx,
            client_id,
            staged,
        } = self;

        let host_timestamp = ctx.host_timestamp()?;
        let host_height = ctx.host_height()?;

        for (key, value) in staged {
            match (key, value) {
                (StoreKey::ClientState, Some(any)) => {
                    ctx.store_client_state(
                        ClientStatePath::new(client_id.clone()),
                        ClientState::try_from(any)?.into(),
                    )?;
                }
                (StoreKey::ClientState, None) => {
                    return Err(SandboxError::program("the client state cannot be deleted").into());
                }
                (StoreKey::ConsensusState(height), Some(any)) => {
                    ctx.store_consensus_state(
                        consensus_state_path(client_id, height),
                        <ConsensusState as TryFrom<Any>>::try_from(any)?.into(),
                    )?;
                    ctx.store_update_meta(
                        client_id.clone(),
                        height,
                        host_timestamp,
                        host_height,
                    )?;
                }
                (StoreKey::ConsensusState(height), None) => {
                    tracing::debug!(
                        %client_id,
                        %height,
                        "sandbox program deleted consensus state"
                    );

                    ctx.delete_consensus_state(consensus_state_path(client_id, height))?;
                    ctx.delete_update_meta(client_id.clone(), height)?;
                }
            }
        }

        Ok(())
    }
}

impl<'a, E> ClientStore for HostStore<'a, E>
where
    E: ClientExecutionContext,
    ConsensusState: Convertible<E::ConsensusStateRef>,
    <ConsensusState as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, ClientError> {
        match self.staged.get(&StoreKey::parse(key)?) {
            Some(value) => Ok(value.clone().map(encode_value)),
            None => read(&*self.ctx, self.client_id, key),
        }
    }

    /// Values are decoded here, so a malformed write fails the program call
    /// instead of the commit.
    fn set(&mut self, key: &[u8], value: Vec<u8>) -> Result<(), ClientError> {
        let key = StoreKey::parse(key)?;
        let any = decode_value(&value)?;

        match &key {
            StoreKey::ClientState => {
                ClientState::try_from(any.clone())?;
            }
            StoreKey::ConsensusState(_) => {
                <ConsensusState as TryFrom<Any>>::try_from(any.clone())?;
            }
        }

        self.staged.insert(key, Some(any));
        Ok(())
    }

    fn delete(&mut self, key: &[u8]) -> Result<(), ClientError> {
        match StoreKey::parse(key)? {
            StoreKey::ClientState => {
                Err(SandboxError::program("the client state cannot be deleted").into())
            }
            key => {
                self.staged.insert(key, None);
                Ok(())
            }
        }
    }
}

fn consensus_state_path(client_id: &ClientId, height: Height) -> ClientConsensusStatePath {
    ClientConsensusStatePath::new(
        client_id.clone(),
        height.revision_number(),
        height.revision_height(),
    )
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(b"clientState", Some(StoreKey::ClientState))]
    #[case(b"consensusStates/1-5", Some(StoreKey::ConsensusState(Height::new(1, 5).unwrap())))]
    #[case(b"consensusStates/1-0", None)]
    #[case(b"consensusStates/", None)]
    #[case(b"processedTime/1-5", None)]
    fn test_store_key_parsing(#[case] raw: &[u8], #[case] expected: Option<StoreKey>) {
        assert_eq!(StoreKey::parse(raw).ok(), expected);
    }

    #[test]
    fn test_store_key_text_form() {
        let key = StoreKey::ConsensusState(Height::new(3, 9).unwrap());
        assert_eq!(key.to_vec(), b"consensusStates/3-9".to_vec());
        assert_eq!(StoreKey::parse(&key.to_vec()).unwrap(), key);
    }
}
