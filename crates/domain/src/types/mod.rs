//! Domain types and models

pub mod activity;
pub mod calendar;
pub mod conversation;
pub mod forecast;

pub use activity::{
    Activity, ActivityInput, ActivityPatch, ActivityStatus, ClockTime, CreateRequest, DayOfWeek,
};
pub use calendar::{CalendarCredentials, CreatedEvent, EventAttendee, EventDateTime, EventPayload};
pub use conversation::{ChatMessage, ChatRole};
pub use forecast::{Forecast, ForecastRecord, ForecastStatus, Scenario};
