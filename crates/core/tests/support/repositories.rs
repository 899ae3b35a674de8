//! In-memory user store implementing every persistence port

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daybook_core::conversation::MessageLog;
use daybook_core::forecast::ForecastStore;
use daybook_core::schedule::{ScheduleSnapshot, ScheduleStore};
use daybook_domain::{Activity, ChatMessage, DaybookError, ForecastRecord, Result as DomainResult};

#[derive(Default)]
struct State {
    schedules: HashMap<String, ScheduleSnapshot>,
    forecasts: HashMap<String, ForecastRecord>,
    messages: HashMap<String, Vec<ChatMessage>>,
    forecast_reads: usize,
    forecast_writes: usize,
}

/// In-memory store with the same versioning rules as the SQLite store.
#[derive(Default, Clone)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a user's schedule at version 1.
    pub fn with_schedule(self, user_id: &str, activities: Vec<Activity>) -> Self {
        self.state
            .lock()
            .unwrap()
            .schedules
            .insert(user_id.to_string(), ScheduleSnapshot { activities, version: 1 });
        self
    }

    pub fn with_messages(self, user_id: &str, messages: Vec<ChatMessage>) -> Self {
        self.state.lock().unwrap().messages.insert(user_id.to_string(), messages);
        self
    }

    pub fn with_forecast(self, user_id: &str, record: ForecastRecord) -> Self {
        self.state.lock().unwrap().forecasts.insert(user_id.to_string(), record);
        self
    }

    pub fn schedule(&self, user_id: &str) -> ScheduleSnapshot {
        self.state.lock().unwrap().schedules.get(user_id).cloned().unwrap_or_default()
    }

    pub fn forecast(&self, user_id: &str) -> Option<ForecastRecord> {
        self.state.lock().unwrap().forecasts.get(user_id).cloned()
    }

    pub fn forecast_reads(&self) -> usize {
        self.state.lock().unwrap().forecast_reads
    }

    pub fn forecast_writes(&self) -> usize {
        self.state.lock().unwrap().forecast_writes
    }

    /// Bump the stored version behind the caller's back.
    pub fn simulate_concurrent_write(&self, user_id: &str) {
        let mut state = self.state.lock().unwrap();
        state.schedules.entry(user_id.to_string()).or_default().version += 1;
    }
}

#[async_trait]
impl ScheduleStore for InMemoryStore {
    async fn load_schedule(&self, user_id: &str) -> DomainResult<ScheduleSnapshot> {
        Ok(self.schedule(user_id))
    }

    async fn save_schedule(
        &self,
        user_id: &str,
        activities: &[Activity],
        expected_version: u64,
    ) -> DomainResult<u64> {
        let mut state = self.state.lock().unwrap();
        let current = state.schedules.get(user_id).map_or(0, |snapshot| snapshot.version);
        if current != expected_version {
            return Err(DaybookError::Conflict(format!(
                "schedule changed (expected version {expected_version}, found {current})"
            )));
        }
        let version = current + 1;
        state
            .schedules
            .insert(user_id.to_string(), ScheduleSnapshot { activities: activities.to_vec(), version });
        Ok(version)
    }
}

#[async_trait]
impl ForecastStore for InMemoryStore {
    async fn load_forecast(&self, user_id: &str) -> DomainResult<Option<ForecastRecord>> {
        let mut state = self.state.lock().unwrap();
        state.forecast_reads += 1;
        Ok(state.forecasts.get(user_id).cloned())
    }

    async fn save_forecast(&self, user_id: &str, record: &ForecastRecord) -> DomainResult<()> {
        let mut state = self.state.lock().unwrap();
        state.forecast_writes += 1;
        state.forecasts.insert(user_id.to_string(), record.clone());
        Ok(())
    }

    async fn delete_forecast(&self, user_id: &str) -> DomainResult<()> {
        self.state.lock().unwrap().forecasts.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl MessageLog for InMemoryStore {
    async fn load_messages(&self, user_id: &str) -> DomainResult<Vec<ChatMessage>> {
        Ok(self.state.lock().unwrap().messages.get(user_id).cloned().unwrap_or_default())
    }

    async fn append_message(&self, user_id: &str, message: &ChatMessage) -> DomainResult<()> {
        self.state
            .lock()
            .unwrap()
            .messages
            .entry(user_id.to_string())
            .or_default()
            .push(message.clone());
        Ok(())
    }

    async fn clear_messages(&self, user_id: &str) -> DomainResult<()> {
        self.state.lock().unwrap().messages.remove(user_id);
        Ok(())
    }
}
