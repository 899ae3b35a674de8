//! Conversions from third-party errors into the domain taxonomy

pub mod conversions;

pub use conversions::*;
