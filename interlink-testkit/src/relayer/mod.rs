//! Relays messages between two [`MockContext`](crate::context::MockContext)s.

pub mod context;
pub mod error;
pub mod utils;

pub use context::RelayerContext;
pub use error::RelayerError;
