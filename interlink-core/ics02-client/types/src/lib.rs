//! Light-client data structures shared by the client handlers and every
//! client implementation.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod height;
mod status;

pub mod error;
pub mod events;
pub mod msgs;

pub use height::*;
pub use status::*;
