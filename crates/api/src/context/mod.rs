//! Application context - dependency injection container

use std::sync::Arc;
use std::time::Duration;

use daybook_core::conversation::ConversationService;
use daybook_core::forecast::{ForecastService, TextGenerator};
use daybook_core::schedule::{
    ActivityRepository, CalendarConnector, CalendarSyncAdapter, ScheduleService,
};
use daybook_domain::{Config, DaybookError, Result};
use daybook_infra::{DbManager, GoogleCalendarConnector, HttpClient, OpenAIClient, SqliteUserStore};
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

const CALENDAR_TIMEOUT: Duration = Duration::from_secs(15);
const GENERATION_TIMEOUT: Duration = Duration::from_secs(90);

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub schedule: ScheduleService,
    pub forecasts: ForecastService,
    pub conversation: ConversationService,
    generator_configured: bool,
}

impl AppContext {
    /// Open the database and build the production collaborators.
    ///
    /// The generator client is built once; calendar clients are built per
    /// request from caller credentials by the connector.
    pub fn new(config: Config) -> Result<Self> {
        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        db.run_migrations()?;

        let calendar_http = HttpClient::builder().timeout(CALENDAR_TIMEOUT).build()?;
        let connector = Arc::new(GoogleCalendarConnector::new(calendar_http, &config.calendar));

        let api_key = config.forecast.api_key.clone().unwrap_or_default();
        if api_key.trim().is_empty() {
            warn!("no generation API key configured; forecast requests will fail");
        }
        let generation_http = HttpClient::builder().timeout(GENERATION_TIMEOUT).build()?;
        let generator = OpenAIClient::new(api_key, generation_http)
            .with_model(config.forecast.model.clone())
            .with_api_url(config.forecast.api_url.clone());

        Ok(Self::with_collaborators(config, db, connector, Arc::new(generator)))
    }

    /// Wire the services over an already-migrated database.
    pub fn with_collaborators(
        config: Config,
        db: Arc<DbManager>,
        connector: Arc<dyn CalendarConnector>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let store = Arc::new(SqliteUserStore::new(Arc::clone(&db)));

        let schedule = ScheduleService::new(
            ActivityRepository::new(store.clone()),
            CalendarSyncAdapter::new(Some(config.calendar.default_time_zone.clone())),
            connector,
        );
        let forecasts = ForecastService::new(store.clone(), store.clone(), store.clone(), generator)
            .with_history_limit(config.forecast.history_limit);
        let conversation = ConversationService::new(store.clone(), store);

        let generator_configured =
            config.forecast.api_key.as_deref().is_some_and(|key| !key.trim().is_empty());

        info!(
            db_path = %db.path().display(),
            calendar_api = %config.calendar.api_base,
            generation_model = %config.forecast.model,
            "application context initialised"
        );

        Self { config, db, schedule, forecasts, conversation, generator_configured }
    }

    /// Perform health check on all components
    pub async fn health_check(&self) -> HealthStatus {
        let generator = if self.generator_configured {
            ComponentHealth::healthy("generator")
        } else {
            ComponentHealth::unhealthy("generator", "API key not configured")
        };

        let mut status = HealthStatus::new()
            .add_component(self.check_database_health().await)
            .add_component(generator);
        status.calculate_score();
        status
    }

    /// Runs the probe query on the blocking pool.
    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => ComponentHealth::unhealthy("database", err.to_string()),
            Err(err) => ComponentHealth::unhealthy(
                "database",
                DaybookError::Internal(format!("health check task failed: {err}")).to_string(),
            ),
        }
    }
}
