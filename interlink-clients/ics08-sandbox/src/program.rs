//! The seam between the host and the sandboxed programs backing sandbox
//! clients.

use alloc::sync::Arc;

use interlink_core_client::context::ClientValidationContext;
use interlink_core_client::types::error::ClientError;
use interlink_core_handler_types::error::ContextError;
use interlink_primitives::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use subtle_encoding::hex;

use crate::store::ClientStore;
use crate::types::error::SandboxError;

/// A sandboxed light client program.
///
/// The host only depends on the message contract: each entry point takes
/// the client's store and a JSON request, and returns a JSON response. How
/// the program executes is up to the host.
pub trait SandboxProgram: Send + Sync {
    /// Handles an [`InstantiateMsg`](crate::types::msgs::InstantiateMsg).
    fn instantiate(&self, store: &mut dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError>;

    /// Handles a [`SudoMsg`](crate::types::msgs::SudoMsg).
    fn sudo(&self, store: &mut dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError>;

    /// Handles a [`QueryMsg`](crate::types::msgs::QueryMsg).
    fn query(&self, store: &dyn ClientStore, msg: &[u8]) -> Result<Vec<u8>, ClientError>;
}

/// Client validation context of hosts supporting sandbox clients.
pub trait SandboxValidationContext: ClientValidationContext {
    /// Returns the program registered under `checksum`.
    fn sandbox_program(&self, checksum: &[u8]) -> Result<Arc<dyn SandboxProgram>, ContextError>;
}

pub(crate) fn to_json<T: Serialize>(msg: &T) -> Result<Vec<u8>, SandboxError> {
    serde_json::to_vec(msg).map_err(SandboxError::json)
}

pub(crate) fn from_json<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SandboxError> {
    serde_json::from_slice(bytes).map_err(SandboxError::json)
}

/// Renders a checksum for logs and errors.
pub fn checksum_hex(checksum: &[u8]) -> String {
    String::from_utf8(hex::encode(checksum)).unwrap_or_default()
}
