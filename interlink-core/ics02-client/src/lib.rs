//! Client semantics: the handlers creating, updating, freezing and upgrading
//! the light clients a host keeps of its counterparties, along with
//! re-exports of the client data structures.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod handler;

/// Re-exports the light client traits for custom client implementations.
pub mod context {
    #[doc(inline)]
    pub use interlink_core_client_context::*;
}

/// Re-exports the client data structures.
pub mod types {
    #[doc(inline)]
    pub use interlink_core_client_types::*;
}
