//! Calendar sync adapter - best-effort mirroring of activities
//!
//! Failures never propagate: every method returns a [`SyncOutcome`] and the
//! caller folds `Failed` into an advisory `calendarError` field.

use chrono::{DateTime, Utc};
use daybook_domain::{
    Activity, CreatedEvent, DaybookError, EventAttendee, EventDateTime, EventPayload, Result,
};
use serde::Serialize;
use tracing::{debug, warn};

use super::ports::CalendarService;
use super::recurrence::{weekly_rule_for, CalendarEventRef};
use super::timezone::to_offset_timestamp;

/// Outcome of one mirroring attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No calendar credentials, or nothing to mirror.
    Skipped,
    /// A new event was inserted; its identity must be written back.
    Linked { event: CreatedEvent },
    /// The existing event was patched in place.
    Patched { event_id: String },
    /// The event (or its whole series) was deleted.
    Deleted { event_id: String },
    Failed { error: String },
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Advisory message for the API response.
    pub fn calendar_error(&self) -> Option<String> {
        match self {
            Self::Failed { error } => Some(error.clone()),
            _ => None,
        }
    }

    /// Event identity to write back onto the activity, if any.
    pub fn created_event(&self) -> Option<&CreatedEvent> {
        match self {
            Self::Linked { event } => Some(event),
            _ => None,
        }
    }

    fn failed(err: &DaybookError) -> Self {
        Self::Failed { error: err.message().to_string() }
    }
}

/// Mirrors activities into an external calendar
#[derive(Debug, Clone)]
pub struct CalendarSyncAdapter {
    default_time_zone: Option<String>,
}

impl Default for CalendarSyncAdapter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl CalendarSyncAdapter {
    /// `default_time_zone` applies when a request carries none; without
    /// either, timestamps are emitted in UTC.
    pub fn new(default_time_zone: Option<String>) -> Self {
        Self { default_time_zone }
    }

    /// Build the event body for `activity` as of `now`.
    pub fn build_payload(
        &self,
        activity: &Activity,
        time_zone: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<EventPayload> {
        let zone = time_zone.or(self.default_time_zone.as_deref());
        let zone_label = zone.unwrap_or("UTC").to_string();

        Ok(EventPayload {
            summary: activity.title.clone(),
            location: activity.location.clone(),
            description: activity.description.clone(),
            start: EventDateTime {
                date_time: to_offset_timestamp(activity.start_time, zone, now)?,
                time_zone: zone_label.clone(),
            },
            end: EventDateTime {
                date_time: to_offset_timestamp(activity.end_time, zone, now)?,
                time_zone: zone_label,
            },
            recurrence: weekly_rule_for(&activity.days).map(|rule| vec![rule]),
            attendees: activity
                .attendees
                .iter()
                .map(|email| EventAttendee { email: email.clone() })
                .collect(),
        })
    }

    /// Insert a new event for a freshly created activity.
    pub async fn mirror_create(
        &self,
        activity: &Activity,
        calendar: &dyn CalendarService,
        time_zone: Option<&str>,
    ) -> SyncOutcome {
        let payload = match self.build_payload(activity, time_zone, Utc::now()) {
            Ok(payload) => payload,
            Err(err) => return self.report(activity, "create", &err),
        };
        self.insert(activity, calendar, &payload).await
    }

    /// Patch the linked event, or insert one when no usable link exists.
    ///
    /// A link whose event has since been deleted on the calendar side is
    /// healed by inserting a replacement.
    pub async fn mirror_update(
        &self,
        activity: &Activity,
        calendar: &dyn CalendarService,
        time_zone: Option<&str>,
    ) -> SyncOutcome {
        let payload = match self.build_payload(activity, time_zone, Utc::now()) {
            Ok(payload) => payload,
            Err(err) => return self.report(activity, "update", &err),
        };

        let Some(event_id) = activity.external_event_id.as_deref() else {
            return self.insert(activity, calendar, &payload).await;
        };

        match calendar.patch_event(event_id, &payload).await {
            Ok(()) => {
                debug!(activity_id = activity.id, event_id, "calendar event patched");
                SyncOutcome::Patched { event_id: event_id.to_string() }
            }
            Err(DaybookError::NotFound(_)) => {
                warn!(activity_id = activity.id, event_id, "linked calendar event missing, re-creating");
                self.insert(activity, calendar, &payload).await
            }
            Err(err) => self.report(activity, "update", &err),
        }
    }

    /// Delete the linked event. Links to a single occurrence of a recurring
    /// series delete the whole series.
    pub async fn mirror_delete(
        &self,
        activity: &Activity,
        calendar: &dyn CalendarService,
    ) -> SyncOutcome {
        let Some(event_id) = activity.external_event_id.as_deref() else {
            return SyncOutcome::Skipped;
        };

        let target = deletion_target(event_id);
        match calendar.delete_event(&target).await {
            Ok(()) => {
                debug!(activity_id = activity.id, event_id = %target, "calendar event deleted");
                SyncOutcome::Deleted { event_id: target }
            }
            Err(err) => self.report(activity, "delete", &err),
        }
    }

    async fn insert(
        &self,
        activity: &Activity,
        calendar: &dyn CalendarService,
        payload: &EventPayload,
    ) -> SyncOutcome {
        match calendar.insert_event(payload).await {
            Ok(event) => {
                debug!(activity_id = activity.id, event_id = %event.id, "calendar event inserted");
                SyncOutcome::Linked { event }
            }
            Err(err) => self.report(activity, "insert", &err),
        }
    }

    fn report(&self, activity: &Activity, operation: &str, err: &DaybookError) -> SyncOutcome {
        warn!(
            activity_id = activity.id,
            operation,
            error_type = err.label(),
            error = %err,
            "calendar sync failed"
        );
        SyncOutcome::failed(err)
    }
}

/// Event id to delete: the series id for recurring-instance links.
pub fn deletion_target(event_id: &str) -> String {
    CalendarEventRef::parse(event_id).series_id().to_string()
}
