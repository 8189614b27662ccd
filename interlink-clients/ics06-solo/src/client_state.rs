//! Implements the core light client traits for the solo
//! [`ClientState`](crate::types::ClientState).

mod common;
mod execution;
mod validation;

pub use common::*;
pub use execution::*;
pub use validation::*;
