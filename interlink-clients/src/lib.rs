//! Re-exports the light clients shipped with interlink and closes them into
//! a single tagged set of variants.
//!
//! Hosts store [`AnyClientState`] and [`AnyConsensusState`]; every client
//! operation dispatches on the variant, which is selected from the type URL
//! of the stored state.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod client_state;
mod consensus_state;

pub use client_state::AnyClientState;
pub use consensus_state::AnyConsensusState;

/// Re-exports the header-chain light client.
pub mod headerchain {
    #[doc(inline)]
    pub use interlink_client_headerchain::*;
}

/// Re-exports the solo light client.
pub mod solo {
    #[doc(inline)]
    pub use interlink_client_solo::*;
}

/// Re-exports the sandbox proxy light client.
pub mod sandbox {
    #[doc(inline)]
    pub use interlink_client_sandbox::*;
}
