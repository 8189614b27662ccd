//! ICS 08: the sandbox proxy light client.
//!
//! The host keeps a sandbox client's state as opaque bytes and forwards
//! every verification and update to a sandboxed program selected by the
//! client state's checksum. Requests and responses are JSON messages (see
//! [`types::msgs`] and [`types::response`]); the program reads and writes
//! the client's states through a [`store::ClientStore`] scoped to the
//! client.
//!
//! The host enforces the connection delay period itself before handing a
//! proof to the program.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod client_state;
pub mod consensus_state;
pub mod program;
pub mod store;
pub mod types;

pub use program::{SandboxProgram, SandboxValidationContext};
pub use types::{client_type, SANDBOX_CLIENT_TYPE};
