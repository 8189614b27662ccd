use displaydoc::Display;
use interlink_core::client::types::Height;
use interlink_core::commitment_types::error::CommitmentError;
use interlink_core::handler::types::error::ContextError;
use interlink_core::host::types::identifiers::{ChannelId, ClientId, PortId};
use interlink_core::primitives::prelude::*;

use crate::store::StoreError;

#[derive(Debug, Display)]
pub enum RelayerError {
    /// the client on destination chain is at a higher height (client id: `{client_id}`, source height: `{source_height}`, dest height: `{destination_height}`)
    ClientAtHigherHeight {
        client_id: ClientId,
        source_height: Height,
        destination_height: Height,
    },
    /// client `{client_id}` is not updated by relaying headers
    UnsupportedClient { client_id: ClientId },
    /// no block at height `{0}` on the source chain
    MissingBlock(Height),
    /// the mock module holds no capability for port `{port_id}` and channel `{channel_id}`
    MissingCapability {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// the handler emitted no `{0}` event
    MissingEvent(String),
    /// transaction processing by modules failed error: `{0}`
    TransactionFailed(ContextError),
    /// store error: `{0}`
    Store(StoreError),
    /// proof conversion error: `{0}`
    Proof(CommitmentError),
}

#[cfg(feature = "std")]
impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::TransactionFailed(e) => Some(e),
            Self::Store(e) => Some(e),
            Self::Proof(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RelayerError {
    fn from(e: ContextError) -> Self {
        Self::TransactionFailed(e)
    }
}
