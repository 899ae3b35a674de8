//! Weekly recurrence rules and recurring-instance id parsing

use chrono::NaiveDateTime;
use daybook_domain::DayOfWeek;

/// Suffix length of `_YYYYMMDDTHHMMSSZ` without the underscore.
const INSTANCE_SUFFIX_LEN: usize = 16;

/// Translate weekday names into a weekly RRULE.
///
/// Names are matched case-insensitively after trimming; unknown names are
/// dropped. Codes keep the order given. Returns `None` when nothing maps.
pub fn to_weekly_rule<S: AsRef<str>>(days: &[S]) -> Option<String> {
    let codes: Vec<&'static str> = days
        .iter()
        .filter_map(|day| day.as_ref().parse::<DayOfWeek>().ok())
        .map(|day| day.code())
        .collect();

    if codes.is_empty() {
        return None;
    }

    Some(format!("RRULE:FREQ=WEEKLY;INTERVAL=1;WKST=MO;BYDAY={}", codes.join(",")))
}

/// [`to_weekly_rule`] for already-canonical days.
pub fn weekly_rule_for(days: &[DayOfWeek]) -> Option<String> {
    let labels: Vec<&str> = days.iter().map(DayOfWeek::label).collect();
    to_weekly_rule(labels.as_slice())
}

/// A calendar event id, split into its series id and (for a single
/// occurrence of a recurring series) the occurrence start.
///
/// Instance ids look like `<seriesId>_<YYYYMMDD>T<HHMMSS>Z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEventRef {
    series_id: String,
    occurrence: Option<NaiveDateTime>,
}

impl CalendarEventRef {
    pub fn parse(event_id: &str) -> Self {
        match split_instance(event_id) {
            Some((series, occurrence)) => {
                Self { series_id: series.to_string(), occurrence: Some(occurrence) }
            }
            None => Self { series_id: event_id.to_string(), occurrence: None },
        }
    }

    pub fn is_instance(&self) -> bool {
        self.occurrence.is_some()
    }

    pub fn series_id(&self) -> &str {
        &self.series_id
    }

    pub fn occurrence(&self) -> Option<NaiveDateTime> {
        self.occurrence
    }
}

/// Predicate form of [`CalendarEventRef::parse`].
pub fn is_instance_id(event_id: &str) -> bool {
    split_instance(event_id).is_some()
}

fn split_instance(event_id: &str) -> Option<(&str, NaiveDateTime)> {
    let (series, suffix) = event_id.rsplit_once('_')?;
    if series.is_empty() || suffix.len() != INSTANCE_SUFFIX_LEN {
        return None;
    }

    let bytes = suffix.as_bytes();
    let shape_ok = bytes[..8].iter().all(u8::is_ascii_digit)
        && bytes[8] == b'T'
        && bytes[9..15].iter().all(u8::is_ascii_digit)
        && bytes[15] == b'Z';
    if !shape_ok {
        return None;
    }

    let occurrence = NaiveDateTime::parse_from_str(&suffix[..15], "%Y%m%dT%H%M%S").ok()?;
    Some((series, occurrence))
}
