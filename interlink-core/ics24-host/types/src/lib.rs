//! Defines identifier and path types used by every host chain to lay out the
//! state of the protocol engine.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod error;
pub mod identifiers;
pub mod path;
pub mod validate;
