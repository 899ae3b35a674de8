//! Observability bootstrap
//!
//! Services log through `tracing` with structured fields; this module only
//! installs the global subscriber once at process start.

pub mod logging;

pub use logging::{build_filter, init_tracing};
