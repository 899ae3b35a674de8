//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Daybook
///
/// Repository-layer variants (`Validation`, `NotFound`, `Conflict`) abort the
/// request. `Sync` is only ever produced by the calendar adapter and is
/// downgraded to an advisory field by the schedule service.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum DaybookError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Calendar sync error: {0}")]
    Sync(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Quota exceeded: {0}")]
    Quota(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DaybookError {
    /// Stable label suitable for log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Sync(_) => "sync",
            Self::Generation(_) => "generation",
            Self::Quota(_) => "quota",
            Self::Database(_) => "database",
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Internal(_) => "internal",
        }
    }

    /// The message carried by the variant, without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg)
            | Self::Sync(msg)
            | Self::Generation(msg)
            | Self::Quota(msg)
            | Self::Database(msg)
            | Self::Config(msg)
            | Self::Network(msg)
            | Self::Auth(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for Daybook operations
pub type Result<T> = std::result::Result<T, DaybookError>;
