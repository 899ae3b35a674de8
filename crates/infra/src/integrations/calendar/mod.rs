//! Google Calendar integration
//!
//! Mirrors activities as calendar events through the Calendar v3 REST API.
//! Credentials arrive with each request, so a client is built per request
//! by [`GoogleCalendarConnector`] and shares the underlying HTTP pool.

pub mod client;
pub mod connector;

pub use client::GoogleCalendarClient;
pub use connector::GoogleCalendarConnector;
