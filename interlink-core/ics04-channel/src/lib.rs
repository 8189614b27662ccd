//! Channel semantics: the channel open and close handshakes, and the packet
//! lifecycle carried over open channels, along with re-exports of the
//! channel data structures.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod handler;

/// Re-exports the channel and packet data structures.
pub mod types {
    #[doc(inline)]
    pub use interlink_core_channel_types::*;
}
