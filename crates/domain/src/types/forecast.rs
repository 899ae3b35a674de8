//! Forecast (AI-generated scenario) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One projected future for the user's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub title: String,
    pub time_horizon: String,
    pub summary: Vec<String>,
    pub details: String,
}

/// Cached generation output. `data` and `hash` are only ever written
/// together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub data: Vec<Scenario>,
    pub hash: String,
    pub timestamp: DateTime<Utc>,
}

/// Result of a forecast request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub futures: Vec<Scenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether the futures came from the cache rather than a fresh generation.
    #[serde(default)]
    pub cached: bool,
}

/// Read-only staleness probe result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastStatus {
    pub is_stale: bool,
    pub has_futures: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_hash_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_hash_prefix: Option<String>,
}
