//! Configuration management

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_CALENDAR_API_BASE, DEFAULT_CALENDAR_ID, DEFAULT_DB_PATH,
    DEFAULT_DB_POOL_SIZE, DEFAULT_GENERATION_API_URL, DEFAULT_GENERATION_MODEL,
    DEFAULT_HISTORY_LIMIT, DEFAULT_TIME_ZONE,
};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub calendar: CalendarConfig,
    pub forecast: ForecastConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// External calendar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Base URL of the Calendar v3 REST API.
    pub api_base: String,
    /// Calendar used when the caller does not name one.
    pub default_calendar_id: String,
    /// IANA zone applied when the caller sends no `X-Time-Zone`.
    pub default_time_zone: String,
}

/// Forecast generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    /// Number of most recent chat messages included in the prompt.
    pub history_limit: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: DEFAULT_BIND_ADDR.to_string() }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: DEFAULT_DB_PATH.to_string(), pool_size: DEFAULT_DB_POOL_SIZE }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_CALENDAR_API_BASE.to_string(),
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            default_time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GENERATION_API_URL.to_string(),
            api_key: None,
            model: DEFAULT_GENERATION_MODEL.to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
