//! Definition of domain type message `MsgSubmitMisbehaviour`.

use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::{Any, AnyCodec, Signer};

pub const SUBMIT_MISBEHAVIOUR_TYPE_URL: &str = "/interlink.core.client.v1.MsgSubmitMisbehaviour";

/// A type of message that submits client misbehaviour evidence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgSubmitMisbehaviour {
    /// client unique identifier
    pub client_id: ClientId,
    /// misbehaviour used for freezing the light client
    pub misbehaviour: Any,
    /// signer address
    pub signer: Signer,
}

impl AnyCodec for MsgSubmitMisbehaviour {
    const TYPE_URL: &'static str = SUBMIT_MISBEHAVIOUR_TYPE_URL;
}
