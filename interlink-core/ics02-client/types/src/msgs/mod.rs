//! Defines the client message types that are sent to the chain by the relayer.

use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, Signer};

mod create_client;
mod misbehaviour;
mod update_client;
mod upgrade_client;

pub use create_client::*;
pub use misbehaviour::*;
pub use update_client::*;
pub use upgrade_client::*;

/// Encodes all the different client messages
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Debug, PartialEq, Eq, derive_more::From, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub enum ClientMsg {
    CreateClient(MsgCreateClient),
    UpdateClient(MsgUpdateClient),
    Misbehaviour(MsgSubmitMisbehaviour),
    UpgradeClient(MsgUpgradeClient),
}

/// The two messages that feed a client message through
/// `verify_client_message` and `check_for_misbehaviour`.
#[derive(derive_more::From)]
pub enum MsgUpdateOrMisbehaviour {
    UpdateClient(MsgUpdateClient),
    Misbehaviour(MsgSubmitMisbehaviour),
}

impl MsgUpdateOrMisbehaviour {
    pub fn client_id(&self) -> &ClientId {
        match self {
            MsgUpdateOrMisbehaviour::UpdateClient(msg) => &msg.client_id,
            MsgUpdateOrMisbehaviour::Misbehaviour(msg) => &msg.client_id,
        }
    }

    pub fn client_message(self) -> Any {
        match self {
            MsgUpdateOrMisbehaviour::UpdateClient(msg) => msg.client_message,
            MsgUpdateOrMisbehaviour::Misbehaviour(msg) => msg.misbehaviour,
        }
    }

    pub fn signer(&self) -> &Signer {
        match self {
            MsgUpdateOrMisbehaviour::UpdateClient(msg) => &msg.signer,
            MsgUpdateOrMisbehaviour::Misbehaviour(msg) => &msg.signer,
        }
    }
}
