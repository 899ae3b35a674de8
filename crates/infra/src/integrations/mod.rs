//! External service integrations

pub mod calendar;
pub mod openai;

pub use calendar::{GoogleCalendarClient, GoogleCalendarConnector};
pub use openai::{GenerationClientError, OpenAIClient};
