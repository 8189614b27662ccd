//! Implements the core light client traits for the header-chain
//! [`ClientState`](crate::types::ClientState).
//!
//! Each trait method delegates to a standalone function of the same name so
//! that hosts wrapping the client state in their own type can reuse the
//! verification logic piecemeal.

mod common;
mod execution;
mod misbehaviour;
mod update_client;
mod validation;

pub use common::*;
pub use execution::*;
pub use misbehaviour::*;
pub use update_client::*;
pub use validation::*;
