//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Configuration defaults
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DB_PATH: &str = "daybook.db";
pub const DEFAULT_DB_POOL_SIZE: u32 = 8;
pub const DEFAULT_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const DEFAULT_CALENDAR_ID: &str = "primary";
pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_GENERATION_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

// Activity defaults
pub const DEFAULT_ACTIVITY_DURATION_MINUTES: u32 = 60;
pub const ACTIVITY_COLORS: &[&str] = &[
    "#F87171", "#FB923C", "#FBBF24", "#34D399", "#22D3EE", "#60A5FA", "#A78BFA", "#F472B6",
];

// Forecast
pub const FORECAST_SCENARIO_COUNT: usize = 3;
pub const HASH_PREFIX_LEN: usize = 8;
pub const INSUFFICIENT_DATA_MESSAGE: &str =
    "Add some activities or chat messages before asking for a forecast.";

// Store paths (per-user document keys)
pub const SCHEDULE_PATH: &str = "schedule";
pub const FORECAST_PATH: &str = "forecast";
pub const MESSAGES_PATH: &str = "messages";
