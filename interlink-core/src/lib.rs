//! Re-exports data structures and implementations of all the core modules of
//! the protocol engine.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

/// Re-exports the datagram entrypoints from the `interlink-core-handler`
/// crate for added convenience.
pub mod entrypoint {
    #[doc(inline)]
    pub use interlink_core_handler::entrypoint::*;
}

/// Re-exports primitive types from the `interlink-primitives` crate
pub mod primitives {
    #[doc(inline)]
    pub use interlink_primitives::*;
}

/// Re-exports the client semantics from the `interlink-core-client` crate
pub mod client {
    #[doc(inline)]
    pub use interlink_core_client::*;
}

/// Re-exports the connection handshake from the `interlink-core-connection`
/// crate
pub mod connection {
    #[doc(inline)]
    pub use interlink_core_connection::*;
}

/// Re-exports the channel handshake and packet lifecycle from the
/// `interlink-core-channel` crate
pub mod channel {
    #[doc(inline)]
    pub use interlink_core_channel::*;
}

/// Re-exports the proof verifier from the `interlink-core-commitment-types`
/// crate
pub mod commitment_types {
    #[doc(inline)]
    pub use interlink_core_commitment_types::*;
}

/// Re-exports the host contexts from the `interlink-core-host` crate
pub mod host {
    #[doc(inline)]
    pub use interlink_core_host::*;
}

/// Re-exports the entrypoints and shared handler types from the
/// `interlink-core-handler` crate
pub mod handler {
    #[doc(inline)]
    pub use interlink_core_handler::*;
}

/// Re-exports modules and routing from the `interlink-core-router` crate
pub mod router {
    #[doc(inline)]
    pub use interlink_core_router::*;
}
