//! # Daybook Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - SQLite document store for schedules, forecasts and chat logs
//! - Retrying HTTP client shared by outbound integrations
//! - Google Calendar client and per-request connector
//! - OpenAI-compatible text generator for forecasts
//! - Configuration loading and logging bootstrap
//!
//! ## Architecture
//! - Implements traits defined in `daybook-core`
//! - Contains all "impure" code (I/O, network, filesystem)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod observability;

// Re-export commonly used items
pub use database::*;
pub use errors::{InfraError, status_error};
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::*;
