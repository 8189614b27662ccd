//! Packet timeouts, expressed in the receiving chain's height and time.

mod height;
mod timestamp;

pub use height::*;
pub use timestamp::*;
