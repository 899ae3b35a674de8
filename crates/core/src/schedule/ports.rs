//! Port interfaces for the schedule and its calendar mirror
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::sync::Arc;

use async_trait::async_trait;
use daybook_domain::{Activity, CalendarCredentials, CreatedEvent, EventPayload, Result};

/// A user's full activity list together with its optimistic-concurrency
/// version. A user without a stored list has version `0`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleSnapshot {
    pub activities: Vec<Activity>,
    pub version: u64,
}

/// Whole-list persistence for a user's schedule
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Read the entire list.
    async fn load_schedule(&self, user_id: &str) -> Result<ScheduleSnapshot>;

    /// Replace the entire list.
    ///
    /// Fails with `DaybookError::Conflict` and writes nothing when the stored
    /// version no longer equals `expected_version`. Returns the new version.
    async fn save_schedule(
        &self,
        user_id: &str,
        activities: &[Activity],
        expected_version: u64,
    ) -> Result<u64>;
}

/// External calendar operations used by the sync adapter
#[async_trait]
pub trait CalendarService: Send + Sync {
    /// Create an event and return its identity.
    async fn insert_event(&self, event: &EventPayload) -> Result<CreatedEvent>;

    /// Overwrite the given fields of an existing event.
    ///
    /// Returns `DaybookError::NotFound` when the event no longer exists.
    async fn patch_event(&self, event_id: &str, event: &EventPayload) -> Result<()>;

    /// Delete an event (a series id removes every occurrence).
    async fn delete_event(&self, event_id: &str) -> Result<()>;
}

/// Builds a calendar client from caller-supplied credentials, once per
/// request.
pub trait CalendarConnector: Send + Sync {
    fn connect(&self, credentials: &CalendarCredentials) -> Result<Arc<dyn CalendarService>>;
}
