//! Activity schedule domain and its calendar mirror

pub mod ports;
pub mod recurrence;
pub mod repository;
pub mod service;
pub mod sync;
pub mod timezone;

pub use ports::*;
pub use recurrence::{is_instance_id, to_weekly_rule, weekly_rule_for, CalendarEventRef};
pub use repository::ActivityRepository;
pub use service::*;
pub use sync::{deletion_target, CalendarSyncAdapter, SyncOutcome};
pub use timezone::{resolve_zone, to_offset_timestamp, to_offset_timestamp_now};
