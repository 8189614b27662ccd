mod duration;
mod pretty;

pub use duration::*;
pub use pretty::*;
