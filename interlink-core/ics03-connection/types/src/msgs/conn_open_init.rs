use core::time::Duration;

use interlink_core_host_types::identifiers::ClientId;
use interlink_primitives::prelude::*;
use interlink_primitives::utils::borsh_duration;
use interlink_primitives::{AnyCodec, Signer};

use crate::connection::Counterparty;
use crate::version::Version;

pub const CONN_OPEN_INIT_TYPE_URL: &str = "/interlink.core.connection.v1.MsgConnectionOpenInit";

/// Per our convention, this message is sent to chain A.
/// The handler will check proofs of chain B.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MsgConnectionOpenInit {
    /// ClientId on chain A that the connection is being opened for
    pub client_id_on_a: ClientId,
    pub counterparty: Counterparty,
    /// Proposed version; every supported version is proposed when absent
    pub version: Option<Version>,
    #[borsh(
        serialize_with = "borsh_duration::serialize",
        deserialize_with = "borsh_duration::deserialize"
    )]
    pub delay_period: Duration,
    pub signer: Signer,
}

impl AnyCodec for MsgConnectionOpenInit {
    const TYPE_URL: &'static str = CONN_OPEN_INIT_TYPE_URL;
}
