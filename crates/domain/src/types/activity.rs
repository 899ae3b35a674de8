//! Activity (schedule entry) types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::impl_label_conversions;

/// Day of the week, stored and rendered in Title-case (`"Monday"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl_label_conversions!(DayOfWeek {
    Monday => "Monday",
    Tuesday => "Tuesday",
    Wednesday => "Wednesday",
    Thursday => "Thursday",
    Friday => "Friday",
    Saturday => "Saturday",
    Sunday => "Sunday",
});

impl DayOfWeek {
    /// Two-letter iCalendar `BYDAY` code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Monday => "MO",
            Self::Tuesday => "TU",
            Self::Wednesday => "WE",
            Self::Thursday => "TH",
            Self::Friday => "FR",
            Self::Saturday => "SA",
            Self::Sunday => "SU",
        }
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(value: chrono::Weekday) -> Self {
        match value {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

/// Progress of an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Missed,
}

impl_label_conversions!(ActivityStatus {
    Pending => "Pending",
    InProgress => "In Progress",
    Completed => "Completed",
    Missed => "Missed",
});

/// Serde support for enums that round-trip through their label.
macro_rules! label_serde {
    ($ty:ident) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

label_serde!(DayOfWeek);
label_serde!(ActivityStatus);

/// Wall-clock time of day in 24-hour `HH:MM` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Shift forward by `minutes`, wrapping past midnight.
    pub fn add_minutes(&self, minutes: u32) -> Self {
        let total = (u32::from(self.hour) * 60 + u32::from(self.minute) + minutes) % (24 * 60);
        // total < 1440, so both components fit in u8
        Self { hour: (total / 60) as u8, minute: (total % 60) as u8 }
    }
}

impl FromStr for ClockTime {
    type Err = String;

    /// Accepts `HH:MM` and `H:MM`. Anything else, including seconds or
    /// out-of-range components, is rejected rather than truncated.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("invalid time '{s}', expected HH:MM");
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;

        let digits = |part: &str, max_len: usize| {
            !part.is_empty() && part.len() <= max_len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(h, 2) || !digits(m, 2) || m.len() != 2 {
            return Err(invalid());
        }

        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One scheduled item in a user's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: u64,
    pub title: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub days: Vec<DayOfWeek>,
    #[serde(default)]
    pub status: ActivityStatus,
    #[serde(default)]
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_event_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_event_link: Option<String>,
}

/// Caller-supplied activity fields, still unvalidated.
///
/// Used both for creation and as a shallow-merge patch. Any `id` sent by the
/// caller is ignored; ids are allocated by the repository.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Partial update applied by `update`; same shape as creation input.
pub type ActivityPatch = ActivityInput;

/// Creation request: a single activity or a batch, resolved once at the
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreateRequest {
    Batch(Vec<ActivityInput>),
    Single(ActivityInput),
}

impl CreateRequest {
    pub fn into_items(self) -> Vec<ActivityInput> {
        match self {
            Self::Single(input) => vec![input],
            Self::Batch(items) => items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_time_parses_and_pads() {
        assert_eq!("06:30".parse::<ClockTime>().unwrap().to_string(), "06:30");
        assert_eq!("6:05".parse::<ClockTime>().unwrap().to_string(), "06:05");
        assert_eq!("23:59".parse::<ClockTime>().unwrap(), ClockTime::new(23, 59).unwrap());
    }

    #[test]
    fn clock_time_rejects_malformed_input() {
        for raw in ["24:00", "12:60", "1200", "12:5", "12:00:00", "ab:cd", "", "-1:00", "123:00"] {
            assert!(raw.parse::<ClockTime>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn clock_time_wraps_past_midnight() {
        let late = ClockTime::new(23, 30).unwrap();
        assert_eq!(late.add_minutes(60).to_string(), "00:30");
        assert_eq!(ClockTime::new(8, 0).unwrap().add_minutes(30).to_string(), "08:30");
    }

    #[test]
    fn days_serialize_title_case() {
        let json = serde_json::to_string(&vec![DayOfWeek::Monday, DayOfWeek::Sunday]).unwrap();
        assert_eq!(json, r#"["Monday","Sunday"]"#);
        let back: Vec<DayOfWeek> = serde_json::from_str(r#"["wednesday"," FRIDAY "]"#).unwrap();
        assert_eq!(back, vec![DayOfWeek::Wednesday, DayOfWeek::Friday]);
    }

    #[test]
    fn status_round_trips_label() {
        let status: ActivityStatus = serde_json::from_str(r#""in progress""#).unwrap();
        assert_eq!(status, ActivityStatus::InProgress);
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""In Progress""#);
    }

    #[test]
    fn create_request_distinguishes_single_and_batch() {
        let single: CreateRequest =
            serde_json::from_str(r#"{"title": "Gym", "startTime": "06:00"}"#).unwrap();
        assert!(matches!(single, CreateRequest::Single(_)));

        let batch: CreateRequest =
            serde_json::from_str(r#"[{"title": "A"}, {"title": "B"}]"#).unwrap();
        assert_eq!(batch.into_items().len(), 2);
    }

    #[test]
    fn activity_uses_camel_case_and_defaults() {
        let activity: Activity = serde_json::from_str(
            r#"{"id": 1, "title": "Gym", "startTime": "06:00", "endTime": "07:00"}"#,
        )
        .unwrap();
        assert_eq!(activity.status, ActivityStatus::Pending);
        assert!(activity.days.is_empty());
        let json = serde_json::to_value(&activity).unwrap();
        assert!(json.get("externalEventId").is_none());
        assert_eq!(json["startTime"], "06:00");
    }
}
