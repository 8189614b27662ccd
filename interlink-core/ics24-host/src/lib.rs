//! Host chain context traits: the storage, consensus and metadata accessors
//! the handlers need from the chain running the protocol engine.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod context;
pub mod utils;

pub use context::*;

pub mod types {
    #[doc(inline)]
    pub use interlink_core_host_types::*;
}
