//! Per-request construction of calendar clients

use std::sync::Arc;

use daybook_core::schedule::{CalendarConnector, CalendarService};
use daybook_domain::{CalendarConfig, CalendarCredentials, DaybookError, Result};

use super::client::GoogleCalendarClient;
use crate::http::HttpClient;

/// Builds a [`GoogleCalendarClient`] from caller credentials. The HTTP
/// connection pool is shared; the token and calendar are not.
#[derive(Clone)]
pub struct GoogleCalendarConnector {
    http: HttpClient,
    api_base: String,
    default_calendar_id: String,
}

impl GoogleCalendarConnector {
    pub fn new(http: HttpClient, config: &CalendarConfig) -> Self {
        Self {
            http,
            api_base: config.api_base.clone(),
            default_calendar_id: config.default_calendar_id.clone(),
        }
    }
}

impl CalendarConnector for GoogleCalendarConnector {
    fn connect(&self, credentials: &CalendarCredentials) -> Result<Arc<dyn CalendarService>> {
        let token = credentials.access_token.trim();
        if token.is_empty() {
            return Err(DaybookError::Auth("calendar access token is missing".into()));
        }

        let calendar_id = credentials
            .calendar_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.default_calendar_id);

        Ok(Arc::new(GoogleCalendarClient::new(
            self.http.clone(),
            self.api_base.clone(),
            calendar_id,
            token,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector() -> GoogleCalendarConnector {
        let config = CalendarConfig {
            api_base: "http://localhost:1".into(),
            default_calendar_id: "primary".into(),
            default_time_zone: "UTC".into(),
        };
        GoogleCalendarConnector::new(HttpClient::builder().build().expect("http client"), &config)
    }

    #[test]
    fn blank_token_is_rejected() {
        let creds = CalendarCredentials { access_token: "   ".into(), calendar_id: None };
        let err = connector().connect(&creds).err().expect("should fail");
        assert!(matches!(err, DaybookError::Auth(_)));
    }

    #[test]
    fn token_builds_a_client() {
        let creds = CalendarCredentials { access_token: "tok".into(), calendar_id: Some(" ".into()) };
        assert!(connector().connect(&creds).is_ok());
    }
}
