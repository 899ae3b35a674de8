//! Forecast service - content-addressed cache in front of the generator

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use daybook_domain::constants::{DEFAULT_HISTORY_LIMIT, INSUFFICIENT_DATA_MESSAGE};
use daybook_domain::{Activity, ChatMessage, Forecast, ForecastRecord, ForecastStatus, Result};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, instrument};

use super::fingerprint::{content_hash, hash_prefix};
use super::ports::{ForecastStore, TextGenerator};
use super::prompt::{build_prompt, parse_scenarios};
use crate::conversation::MessageLog;
use crate::schedule::ScheduleStore;

type InFlight = DashMap<String, Arc<Mutex<()>>>;

/// A request's share of a user's generation lock. Dropping the last share
/// removes the user's entry, also when the owning future is cancelled.
struct InFlightSlot<'a> {
    map: &'a InFlight,
    user_id: &'a str,
    lock: Arc<Mutex<()>>,
}

impl<'a> InFlightSlot<'a> {
    fn acquire(map: &'a InFlight, user_id: &'a str) -> Self {
        let lock = Arc::clone(&map.entry(user_id.to_string()).or_default());
        Self { map, user_id, lock }
    }

    async fn lock(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().await
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        // Two references left: the map's and this slot's.
        self.map.remove_if(self.user_id, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}

/// Serves cached forecasts while their fingerprint still matches and
/// regenerates them otherwise
#[derive(Clone)]
pub struct ForecastService {
    schedule: Arc<dyn ScheduleStore>,
    messages: Arc<dyn MessageLog>,
    store: Arc<dyn ForecastStore>,
    generator: Arc<dyn TextGenerator>,
    history_limit: usize,
    in_flight: Arc<InFlight>,
}

impl ForecastService {
    pub fn new(
        schedule: Arc<dyn ScheduleStore>,
        messages: Arc<dyn MessageLog>,
        store: Arc<dyn ForecastStore>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            schedule,
            messages,
            store,
            generator,
            history_limit: DEFAULT_HISTORY_LIMIT,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    /// Number of trailing chat messages included in the prompt.
    pub fn with_history_limit(mut self, history_limit: usize) -> Self {
        self.history_limit = history_limit;
        self
    }

    /// Return the cached forecast when its hash matches the current inputs,
    /// otherwise generate, store and return a new one.
    ///
    /// Refused without touching the forecast store when both the schedule
    /// and the chat are empty.
    #[instrument(skip(self))]
    pub async fn predict(&self, user_id: &str) -> Result<Forecast> {
        let (activities, messages) = self.inputs(user_id).await?;
        if activities.is_empty() && messages.is_empty() {
            info!(user_id, "forecast refused: no schedule or chat history");
            return Ok(Forecast {
                futures: Vec::new(),
                message: Some(INSUFFICIENT_DATA_MESSAGE.to_string()),
                cached: false,
            });
        }

        let hash = content_hash(&activities, &messages)?;
        if let Some(hit) = self.cached(user_id, &hash).await? {
            return Ok(hit);
        }

        let slot = InFlightSlot::acquire(&self.in_flight, user_id);
        let _guard = slot.lock().await;
        // Another request may have regenerated while this one waited.
        let forecast = match self.cached(user_id, &hash).await? {
            Some(hit) => hit,
            None => self.regenerate(user_id, &hash, &activities, &messages).await?,
        };
        Ok(forecast)
    }

    /// Read-only staleness probe. Never generates.
    #[instrument(skip(self))]
    pub async fn status(&self, user_id: &str) -> Result<ForecastStatus> {
        let (activities, messages) = self.inputs(user_id).await?;
        let hash = content_hash(&activities, &messages)?;
        let record = self.store.load_forecast(user_id).await?;

        let has_futures = record.as_ref().is_some_and(|record| !record.data.is_empty());
        let is_stale = has_futures && record.as_ref().is_some_and(|record| record.hash != hash);

        Ok(ForecastStatus {
            is_stale,
            has_futures,
            current_hash_prefix: Some(hash_prefix(&hash)),
            stored_hash_prefix: record.map(|record| hash_prefix(&record.hash)),
        })
    }

    async fn inputs(&self, user_id: &str) -> Result<(Vec<Activity>, Vec<ChatMessage>)> {
        let activities = self.schedule.load_schedule(user_id).await?.activities;
        let messages = self.messages.load_messages(user_id).await?;
        Ok((activities, messages))
    }

    async fn cached(&self, user_id: &str, hash: &str) -> Result<Option<Forecast>> {
        let hit = self
            .store
            .load_forecast(user_id)
            .await?
            .filter(|record| record.hash == hash && !record.data.is_empty());

        Ok(hit.map(|record| {
            debug!(user_id, hash = %hash_prefix(hash), "forecast cache hit");
            Forecast { futures: record.data, message: None, cached: true }
        }))
    }

    async fn regenerate(
        &self,
        user_id: &str,
        hash: &str,
        activities: &[Activity],
        messages: &[ChatMessage],
    ) -> Result<Forecast> {
        info!(user_id, hash = %hash_prefix(hash), "forecast cache miss, generating");

        let prompt = build_prompt(activities, messages, self.history_limit);
        let completion = self.generator.generate(&prompt).await?;
        let futures = parse_scenarios(&completion)?;

        let record = ForecastRecord { data: futures, hash: hash.to_string(), timestamp: Utc::now() };
        self.store.save_forecast(user_id, &record).await?;

        Ok(Forecast { futures: record.data, message: None, cached: false })
    }
}
