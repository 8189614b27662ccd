//! A minimal application module bound to the `mock` port. It echoes the
//! data of every received packet back in its acknowledgement, and records
//! what the packet lifecycle delivered to it.

mod module;
mod types;

pub use types::*;
