//! Implements the light client traits for the sandbox [`ClientState`](crate::types::ClientState)
//! by forwarding every request to the client's program.

mod common;
mod execution;
mod validation;

pub use common::*;
pub use execution::*;
pub use validation::*;
