//! Types for the events emitted by the client handlers.

use interlink_core_host_types::identifiers::{ClientId, ClientType};
use interlink_primitives::prelude::*;

use crate::height::Height;

/// Client event types
pub const CREATE_CLIENT_EVENT: &str = "create_client";
pub const UPDATE_CLIENT_EVENT: &str = "update_client";
pub const CLIENT_MISBEHAVIOUR_EVENT: &str = "client_misbehaviour";
pub const UPGRADE_CLIENT_EVENT: &str = "upgrade_client";

/// CreateClient event signals the creation of a new on-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CreateClient {
    client_id: ClientId,
    client_type: ClientType,
    consensus_height: Height,
}

impl CreateClient {
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_height: Height) -> Self {
        Self {
            client_id,
            client_type,
            consensus_height,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn consensus_height(&self) -> &Height {
        &self.consensus_height
    }

    pub fn event_type(&self) -> &str {
        CREATE_CLIENT_EVENT
    }
}

/// UpdateClient event signals a recent update of an on-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct UpdateClient {
    client_id: ClientId,
    client_type: ClientType,
    // Heights of consensus states made available by the update; the first
    // entry doubles as the single consensus height of older event formats.
    consensus_heights: Vec<Height>,
    header: Vec<u8>,
}

impl UpdateClient {
    pub fn new(
        client_id: ClientId,
        client_type: ClientType,
        consensus_heights: Vec<Height>,
        header: Vec<u8>,
    ) -> Self {
        Self {
            client_id,
            client_type,
            consensus_heights,
            header,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn consensus_heights(&self) -> &[Height] {
        self.consensus_heights.as_ref()
    }

    pub fn header(&self) -> &[u8] {
        &self.header
    }

    pub fn event_type(&self) -> &str {
        UPDATE_CLIENT_EVENT
    }
}

/// ClientMisbehaviour event signals the freezing of an on-chain client
/// following misbehaviour evidence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ClientMisbehaviour {
    client_id: ClientId,
    client_type: ClientType,
}

impl ClientMisbehaviour {
    pub fn new(client_id: ClientId, client_type: ClientType) -> Self {
        Self {
            client_id,
            client_type,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn event_type(&self) -> &str {
        CLIENT_MISBEHAVIOUR_EVENT
    }
}

/// Signals a recent upgrade of an on-chain client.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct UpgradeClient {
    client_id: ClientId,
    client_type: ClientType,
    consensus_height: Height,
}

impl UpgradeClient {
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_height: Height) -> Self {
        Self {
            client_id,
            client_type,
            consensus_height,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn client_type(&self) -> &ClientType {
        &self.client_type
    }

    pub fn consensus_height(&self) -> &Height {
        &self.consensus_height
    }

    pub fn event_type(&self) -> &str {
        UPGRADE_CLIENT_EVENT
    }
}
