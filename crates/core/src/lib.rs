//! # Daybook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The activity repository and its best-effort calendar mirror
//! - Time zone and recurrence translation for calendar payloads
//! - The content-addressed forecast cache
//! - Port interfaces (traits) for every external collaborator
//!
//! ## Architecture Principles
//! - Only depends on `daybook-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod conversation;
pub mod forecast;
pub mod schedule;

pub use conversation::{ConversationService, MessageLog};
pub use forecast::{ForecastService, ForecastStore, TextGenerator};
pub use schedule::{
    ActivityRepository, BatchResult, CalendarConnector, CalendarService, CalendarSyncAdapter,
    CreateResult, ItemOutcome, MutationResult, ScheduleService, ScheduleSnapshot, ScheduleStore,
    SyncContext, SyncOutcome,
};
