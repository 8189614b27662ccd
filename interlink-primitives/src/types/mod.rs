mod any;
mod error;
mod signer;
mod timestamp;

pub use any::*;
pub use error::*;
pub use signer::*;
pub use timestamp::*;
