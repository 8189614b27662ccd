//! Application modules and the router binding them to ports.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod module;
pub mod router;

pub mod types {
    #[doc(inline)]
    pub use interlink_core_router_types::*;
}
