//! Database implementations

pub mod manager;
pub mod user_store;

pub use manager::*;
pub use user_store::*;
