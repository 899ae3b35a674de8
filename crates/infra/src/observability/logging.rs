//! `tracing-subscriber` initialisation from [`LoggingConfig`]

use daybook_domain::{DaybookError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

/// Filter for the process: `RUST_LOG` when set and valid, otherwise the
/// configured level.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(config.level.trim()).map_err(|err| {
        DaybookError::Config(format!("invalid log level '{}': {err}", config.level))
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().flatten_event(true).try_init()
    } else {
        builder.compact().try_init()
    };

    installed.map_err(|err| DaybookError::Internal(format!("failed to install tracing subscriber: {err}")))
}
