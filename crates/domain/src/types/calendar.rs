//! External calendar payload types
//!
//! Shapes follow the Calendar v3 `Event` resource so the infra client can
//! serialize them directly.

use serde::{Deserialize, Serialize};

/// Caller-supplied calendar credentials, used to build a client per request.
#[derive(Clone, PartialEq, Eq)]
pub struct CalendarCredentials {
    pub access_token: String,
    pub calendar_id: Option<String>,
}

impl std::fmt::Debug for CalendarCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarCredentials")
            .field("access_token", &"<redacted>")
            .field("calendar_id", &self.calendar_id)
            .finish()
    }
}

/// Start or end of an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// Offset-qualified timestamp, e.g. `2026-02-08T10:00:00+01:00`.
    pub date_time: String,
    pub time_zone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttendee {
    pub email: String,
}

/// Event body sent on insert and patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Vec<String>>,
    #[serde(default)]
    pub attendees: Vec<EventAttendee>,
}

/// Identity of a calendar event after a successful insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
}
