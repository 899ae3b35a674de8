//! Forecast domain - fingerprinting, caching and generation

pub mod fingerprint;
pub mod ports;
pub mod prompt;
pub mod service;

pub use fingerprint::{canonicalize, content_hash, hash_prefix};
pub use ports::*;
pub use prompt::{build_prompt, parse_scenarios};
pub use service::ForecastService;
