//! Recording calendar fake and its connector

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daybook_core::schedule::{CalendarConnector, CalendarService};
use daybook_domain::{
    CalendarCredentials, CreatedEvent, DaybookError, EventPayload, Result as DomainResult,
};

/// One call made against the fake calendar.
#[derive(Debug, Clone, PartialEq)]
pub enum CalendarCall {
    Insert(EventPayload),
    Patch(String, EventPayload),
    Delete(String),
}

#[derive(Default)]
struct Inner {
    calls: Vec<CalendarCall>,
    next_id: usize,
    missing: HashSet<String>,
    failing_titles: HashSet<String>,
    fail_everything: bool,
}

/// Calendar fake that records every call and can be told to fail.
#[derive(Default, Clone)]
pub struct RecordingCalendar {
    inner: Arc<Mutex<Inner>>,
}

impl RecordingCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Patches against `event_id` report the event as gone.
    pub fn with_missing_event(self, event_id: &str) -> Self {
        self.inner.lock().unwrap().missing.insert(event_id.to_string());
        self
    }

    /// Inserts whose summary equals `title` fail.
    pub fn failing_for(self, title: &str) -> Self {
        self.inner.lock().unwrap().failing_titles.insert(title.to_string());
        self
    }

    pub fn unavailable(self) -> Self {
        self.inner.lock().unwrap().fail_everything = true;
        self
    }

    pub fn calls(&self) -> Vec<CalendarCall> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl CalendarService for RecordingCalendar {
    async fn insert_event(&self, event: &EventPayload) -> DomainResult<CreatedEvent> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(CalendarCall::Insert(event.clone()));
        if inner.fail_everything || inner.failing_titles.contains(&event.summary) {
            return Err(DaybookError::Sync(format!("insert rejected for '{}'", event.summary)));
        }
        inner.next_id += 1;
        let id = format!("evt{}", inner.next_id);
        Ok(CreatedEvent { html_link: Some(format!("https://calendar.test/{id}")), id })
    }

    async fn patch_event(&self, event_id: &str, event: &EventPayload) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(CalendarCall::Patch(event_id.to_string(), event.clone()));
        if inner.missing.contains(event_id) {
            return Err(DaybookError::NotFound(format!("event {event_id} not found")));
        }
        if inner.fail_everything {
            return Err(DaybookError::Sync("calendar unavailable".into()));
        }
        Ok(())
    }

    async fn delete_event(&self, event_id: &str) -> DomainResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(CalendarCall::Delete(event_id.to_string()));
        if inner.fail_everything {
            return Err(DaybookError::Sync("calendar unavailable".into()));
        }
        Ok(())
    }
}

/// Hands out the same recording calendar for every set of credentials.
#[derive(Clone)]
pub struct FakeConnector {
    calendar: RecordingCalendar,
    reject: bool,
}

impl FakeConnector {
    pub fn new(calendar: RecordingCalendar) -> Self {
        Self { calendar, reject: false }
    }

    /// Every connection attempt fails.
    pub fn rejecting() -> Self {
        Self { calendar: RecordingCalendar::new(), reject: true }
    }
}

impl CalendarConnector for FakeConnector {
    fn connect(&self, credentials: &CalendarCredentials) -> DomainResult<Arc<dyn CalendarService>> {
        if self.reject || credentials.access_token.is_empty() {
            return Err(DaybookError::Auth("calendar access token is missing".into()));
        }
        Ok(Arc::new(self.calendar.clone()))
    }
}
