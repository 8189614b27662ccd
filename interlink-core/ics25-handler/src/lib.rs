//! Entry points of the protocol engine: decoded relayer datagrams go in,
//! state transitions, events and log lines come out.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod entrypoint;

/// Re-exports the handler data structures.
pub mod types {
    #[doc(inline)]
    pub use interlink_core_handler_types::*;
}
