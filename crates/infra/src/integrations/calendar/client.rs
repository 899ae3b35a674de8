//! Google Calendar v3 event client

use async_trait::async_trait;
use daybook_core::schedule::CalendarService;
use daybook_domain::{CreatedEvent, DaybookError, EventPayload, Result};
use reqwest::Method;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::http::HttpClient;

/// Events client bound to one access token and one calendar.
pub struct GoogleCalendarClient {
    http: HttpClient,
    api_base: String,
    calendar_id: String,
    access_token: String,
}

/// Subset of the `Event` resource returned by insert.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    id: String,
    #[serde(default)]
    html_link: Option<String>,
}

impl GoogleCalendarClient {
    pub fn new(
        http: HttpClient,
        api_base: impl Into<String>,
        calendar_id: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            calendar_id: calendar_id.into(),
            access_token: access_token.into(),
        }
    }

    pub fn calendar_id(&self) -> &str {
        &self.calendar_id
    }

    fn events_url(&self) -> String {
        format!("{}/calendars/{}/events", self.api_base, urlencoding::encode(&self.calendar_id))
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/{}", self.events_url(), urlencoding::encode(event_id))
    }
}

#[async_trait]
impl CalendarService for GoogleCalendarClient {
    #[instrument(skip(self, event), fields(calendar_id = %self.calendar_id))]
    async fn insert_event(&self, event: &EventPayload) -> Result<CreatedEvent> {
        let request = self
            .http
            .request(Method::POST, self.events_url())
            .bearer_auth(&self.access_token)
            .json(event);

        let created: GoogleEvent = self.http.send_json(request).await.map_err(as_sync_error)?;
        debug!(event_id = %created.id, "calendar event inserted");
        Ok(CreatedEvent { id: created.id, html_link: created.html_link })
    }

    #[instrument(skip(self, event), fields(calendar_id = %self.calendar_id))]
    async fn patch_event(&self, event_id: &str, event: &EventPayload) -> Result<()> {
        let request = self
            .http
            .request(Method::PATCH, self.event_url(event_id))
            .bearer_auth(&self.access_token)
            .json(event);

        self.http.send_empty(request).await.map_err(|err| match err {
            DaybookError::NotFound(_) => {
                DaybookError::NotFound(format!("calendar event {event_id} no longer exists"))
            }
            other => as_sync_error(other),
        })
    }

    #[instrument(skip(self), fields(calendar_id = %self.calendar_id))]
    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let request = self
            .http
            .request(Method::DELETE, self.event_url(event_id))
            .bearer_auth(&self.access_token);

        match self.http.send_empty(request).await {
            Ok(()) => Ok(()),
            // Already gone is the state we wanted.
            Err(DaybookError::NotFound(_)) => {
                debug!(event_id, "calendar event already removed");
                Ok(())
            }
            Err(err) => Err(as_sync_error(err)),
        }
    }
}

fn as_sync_error(err: DaybookError) -> DaybookError {
    match err {
        DaybookError::Sync(_) => err,
        other => DaybookError::Sync(other.message().to_string()),
    }
}
