//! # Daybook API
//!
//! HTTP application layer - routes, request extraction and the binary entry
//! point.
//!
//! This crate contains:
//! - axum routes (HTTP → core services bridge)
//! - Application context (dependency injection)
//! - Error-to-response mapping
//!
//! ## Architecture
//! - Depends on `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod errors;
pub mod extract;
pub mod routes;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
pub use errors::ApiError;
pub use routes::router;
