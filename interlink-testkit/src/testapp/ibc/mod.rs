pub mod applications;
pub mod core;
pub mod sandbox;
