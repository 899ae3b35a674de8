//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If `DAYBOOK_DB_PATH` is absent, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//! 5. Without any config file the built-in defaults apply
//!
//! The generation API key is always taken from `DAYBOOK_GENERATION_API_KEY`
//! when set, whichever source supplied the rest.
//!
//! ## Environment Variables
//! - `DAYBOOK_DB_PATH`: Database file path (required for env loading)
//! - `DAYBOOK_DB_POOL_SIZE`: Connection pool size
//! - `DAYBOOK_BIND_ADDR`: HTTP listen address
//! - `DAYBOOK_CALENDAR_API_BASE`: Calendar API base URL
//! - `DAYBOOK_CALENDAR_ID`: Calendar used when a request names none
//! - `DAYBOOK_DEFAULT_TIME_ZONE`: IANA zone used when a request names none
//! - `DAYBOOK_GENERATION_API_URL`: Chat completions endpoint
//! - `DAYBOOK_GENERATION_API_KEY`: Bearer key for the completions endpoint
//! - `DAYBOOK_GENERATION_MODEL`: Model name
//! - `DAYBOOK_FORECAST_HISTORY_LIMIT`: Chat messages included in prompts
//! - `DAYBOOK_LOG_LEVEL`: Default log filter
//! - `DAYBOOK_LOG_JSON`: Emit JSON logs (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./daybook.json` or `./daybook.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use daybook_domain::{Config, DaybookError, Result};

const API_KEY_VAR: &str = "DAYBOOK_GENERATION_API_KEY";

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables, then from a config
/// file, and finally falls back to defaults when no file exists.
///
/// # Errors
/// Returns `DaybookError::Config` if an environment value or a config file
/// that does exist is invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        Err(e) => tracing::debug!(error = ?e, "Failed to load from environment, trying file"),
    }

    let mut config = match probe_config_paths() {
        Some(path) => load_from_file(Some(path))?,
        None => {
            tracing::info!("No config file found, using defaults");
            Config::default()
        }
    };
    apply_secret_overrides(&mut config);
    Ok(config)
}

/// Load configuration from environment variables
///
/// `DAYBOOK_DB_PATH` must be present; every other variable is optional and
/// falls back to its default.
///
/// # Errors
/// Returns `DaybookError::Config` if `DAYBOOK_DB_PATH` is missing or a
/// numeric variable cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.database.path = env_var("DAYBOOK_DB_PATH")?;
    if let Some(pool_size) = env_parse::<u32>("DAYBOOK_DB_POOL_SIZE", "pool size")? {
        config.database.pool_size = pool_size;
    }

    if let Some(bind_addr) = env_opt("DAYBOOK_BIND_ADDR") {
        config.server.bind_addr = bind_addr;
    }

    if let Some(api_base) = env_opt("DAYBOOK_CALENDAR_API_BASE") {
        config.calendar.api_base = api_base;
    }
    if let Some(calendar_id) = env_opt("DAYBOOK_CALENDAR_ID") {
        config.calendar.default_calendar_id = calendar_id;
    }
    if let Some(time_zone) = env_opt("DAYBOOK_DEFAULT_TIME_ZONE") {
        config.calendar.default_time_zone = time_zone;
    }

    if let Some(api_url) = env_opt("DAYBOOK_GENERATION_API_URL") {
        config.forecast.api_url = api_url;
    }
    if let Some(model) = env_opt("DAYBOOK_GENERATION_MODEL") {
        config.forecast.model = model;
    }
    if let Some(limit) = env_parse::<usize>("DAYBOOK_FORECAST_HISTORY_LIMIT", "history limit")? {
        config.forecast.history_limit = limit;
    }

    if let Some(level) = env_opt("DAYBOOK_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("DAYBOOK_LOG_JSON", config.logging.json);

    apply_secret_overrides(&mut config);
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `DaybookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(DaybookError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            DaybookError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| DaybookError::Config(format!("Failed to read config file: {}", e)))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| DaybookError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| DaybookError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(DaybookError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Probe multiple paths for configuration files
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(base: &Path) -> Vec<PathBuf> {
    vec![
        base.join("config.json"),
        base.join("config.toml"),
        base.join("daybook.json"),
        base.join("daybook.toml"),
        base.join("../config.json"),
        base.join("../config.toml"),
        base.join("../../config.json"),
        base.join("../../config.toml"),
    ]
}

fn apply_secret_overrides(config: &mut Config) {
    if let Some(key) = env_opt(API_KEY_VAR) {
        config.forecast.api_key = Some(key);
    }
}

/// Get required environment variable
///
/// # Errors
/// Returns `DaybookError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        DaybookError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional environment variable; empty values count as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

fn env_parse<T>(key: &str, what: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| DaybookError::Config(format!("Invalid {what} in {key}: {e}")))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
