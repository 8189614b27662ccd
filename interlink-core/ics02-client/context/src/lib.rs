//! This crate functions as an intermediary layer between the storage of host
//! chains and a light client implementation, providing the traits every
//! client variant implements. All client state is read and written through
//! the host-provided contexts, never owned by the client itself.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod client_state;
pub mod consensus_state;
pub mod delay;

mod context;
pub use context::*;

/// Trait preludes for the client implementations.
pub mod prelude {
    pub use crate::client_state::*;
    pub use crate::consensus_state::*;
    pub use crate::context::*;
    pub use crate::delay::DelayPeriod;
}

pub mod types {
    #[doc(inline)]
    pub use interlink_core_client_types::*;
}
