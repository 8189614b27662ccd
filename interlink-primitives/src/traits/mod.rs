mod any;

pub use any::*;
