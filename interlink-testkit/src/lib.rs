#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces, rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod context;
pub mod fixtures;
pub mod hosts;
pub mod relayer;
pub mod store;
pub mod testapp;
pub mod utils;
