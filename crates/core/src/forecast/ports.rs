//! Port interfaces for the forecast cache and the generative collaborator

use async_trait::async_trait;
use daybook_domain::{ForecastRecord, Result};

/// Persistence for the single cached forecast of each user
#[async_trait]
pub trait ForecastStore: Send + Sync {
    async fn load_forecast(&self, user_id: &str) -> Result<Option<ForecastRecord>>;

    /// Replace the stored record as a unit.
    async fn save_forecast(&self, user_id: &str, record: &ForecastRecord) -> Result<()>;

    async fn delete_forecast(&self, user_id: &str) -> Result<()>;
}

/// Generative text service
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Return the raw completion for `prompt`.
    ///
    /// Rate limiting is reported as `DaybookError::Quota`; every other
    /// failure as `DaybookError::Generation`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
