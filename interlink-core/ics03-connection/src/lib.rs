//! Connection handshake: negotiates a verified, versioned pairing between a
//! local light client and its counterparty, along with re-exports of the
//! connection data structures.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod delay;
pub mod handler;

/// Re-exports the connection data structures.
pub mod types {
    #[doc(inline)]
    pub use interlink_core_connection_types::*;
}
