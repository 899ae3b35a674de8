//! Local `HH:MM` + IANA zone → offset-qualified timestamp for "today"

use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use daybook_domain::{ClockTime, DaybookError, Result};

/// Resolve an IANA zone name such as `Europe/Berlin`.
pub fn resolve_zone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| DaybookError::Validation(format!("unknown time zone '{name}'")))
}

/// Build `YYYY-MM-DDTHH:MM:00±HH:MM` for `time` on today's date in `zone`.
///
/// The date and the UTC offset are both taken as observed in `zone` at `now`,
/// so the offset reflects whatever daylight-saving rule is in effect today.
/// Without a zone the UTC date and `+00:00` are used.
pub fn to_offset_timestamp(time: ClockTime, zone: Option<&str>, now: DateTime<Utc>) -> Result<String> {
    let (date, offset_secs) = match zone {
        Some(name) => {
            let tz = resolve_zone(name)?;
            let local = now.with_timezone(&tz);
            (local.date_naive(), local.offset().fix().local_minus_utc())
        }
        None => (now.date_naive(), 0),
    };

    Ok(format!("{}T{}:00{}", date.format("%Y-%m-%d"), time, format_offset(offset_secs)))
}

/// Same as [`to_offset_timestamp`] using the current instant.
pub fn to_offset_timestamp_now(time: ClockTime, zone: Option<&str>) -> Result<String> {
    to_offset_timestamp(time, zone, Utc::now())
}

fn format_offset(offset_secs: i32) -> String {
    let sign = if offset_secs < 0 { '-' } else { '+' };
    let abs = offset_secs.unsigned_abs();
    format!("{sign}{:02}:{:02}", abs / 3600, (abs % 3600) / 60)
}
