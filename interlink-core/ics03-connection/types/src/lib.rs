//! Connection data structures: the connection end, versions, handshake
//! messages and events.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod error;
pub mod events;
pub mod msgs;
pub mod version;

mod connection;
pub use connection::*;
