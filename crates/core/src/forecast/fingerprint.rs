//! Content fingerprint over {schedule, chat}
//!
//! Only `(id, title, days, startTime, endTime)` of each activity and
//! `(role, content)` of each message take part. The schedule is ordered by
//! id, the chat keeps its chronological order.

use daybook_domain::constants::HASH_PREFIX_LEN;
use daybook_domain::{Activity, ChatMessage, ChatRole, ClockTime, DaybookError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalActivity<'a> {
    id: u64,
    title: &'a str,
    days: Vec<&'static str>,
    start_time: ClockTime,
    end_time: ClockTime,
}

#[derive(Serialize)]
struct CanonicalMessage<'a> {
    role: ChatRole,
    content: &'a str,
}

#[derive(Serialize)]
struct Canonical<'a> {
    schedule: Vec<CanonicalActivity<'a>>,
    chat: Vec<CanonicalMessage<'a>>,
}

/// Deterministic serialization of the fingerprint inputs.
pub fn canonicalize(activities: &[Activity], messages: &[ChatMessage]) -> Result<Vec<u8>> {
    let mut schedule: Vec<CanonicalActivity<'_>> = activities
        .iter()
        .map(|activity| CanonicalActivity {
            id: activity.id,
            title: &activity.title,
            days: activity.days.iter().map(|day| day.label()).collect(),
            start_time: activity.start_time,
            end_time: activity.end_time,
        })
        .collect();
    schedule.sort_by_key(|entry| entry.id);

    let chat = messages
        .iter()
        .map(|message| CanonicalMessage { role: message.role, content: &message.content })
        .collect();

    serde_json::to_vec(&Canonical { schedule, chat })
        .map_err(|err| DaybookError::Internal(format!("failed to canonicalize forecast inputs: {err}")))
}

/// Hex-encoded SHA-256 of [`canonicalize`].
pub fn content_hash(activities: &[Activity], messages: &[ChatMessage]) -> Result<String> {
    let canonical = canonicalize(activities, messages)?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// Short form reported by the status probe.
pub fn hash_prefix(hash: &str) -> String {
    hash.chars().take(HASH_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use daybook_domain::{ActivityStatus, DayOfWeek};

    use super::*;

    fn activity(id: u64, title: &str, start: &str, end: &str) -> Activity {
        Activity {
            id,
            title: title.into(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            description: String::new(),
            location: String::new(),
            attendees: vec![],
            tags: vec![],
            days: vec![DayOfWeek::Monday],
            status: ActivityStatus::Pending,
            color: "#60A5FA".into(),
            external_event_id: None,
            external_event_link: None,
        }
    }

    #[test]
    fn canonical_form_is_fixed() {
        let bytes = canonicalize(
            &[activity(1, "Gym", "06:00", "07:00")],
            &[ChatMessage::new(ChatRole::User, "hi")],
        )
        .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"schedule":[{"id":1,"title":"Gym","days":["Monday"],"startTime":"06:00","endTime":"07:00"}],"chat":[{"role":"user","content":"hi"}]}"#
        );
    }

    #[test]
    fn insertion_order_does_not_matter() {
        let a = activity(1, "Gym", "06:00", "07:00");
        let b = activity(2, "Read", "08:00", "08:30");
        assert_eq!(
            content_hash(&[a.clone(), b.clone()], &[]).unwrap(),
            content_hash(&[b, a], &[]).unwrap()
        );
    }

    #[test]
    fn projected_fields_change_the_hash() {
        let base = activity(1, "Gym", "10:00", "11:00");
        let h = content_hash(&[base.clone()], &[]).unwrap();

        let mut moved = base.clone();
        moved.start_time = "11:00".parse().unwrap();
        assert_ne!(content_hash(&[moved], &[]).unwrap(), h);

        let mut renamed = base.clone();
        renamed.title = "Swim".into();
        assert_ne!(content_hash(&[renamed], &[]).unwrap(), h);

        let mut other_day = base.clone();
        other_day.days = vec![DayOfWeek::Tuesday];
        assert_ne!(content_hash(&[other_day], &[]).unwrap(), h);
    }

    #[test]
    fn unprojected_fields_do_not_change_the_hash() {
        let base = activity(1, "Gym", "10:00", "11:00");
        let mut decorated = base.clone();
        decorated.location = "Downtown".into();
        decorated.color = "#F87171".into();
        decorated.status = ActivityStatus::Completed;
        decorated.external_event_id = Some("evt".into());

        assert_eq!(content_hash(&[base], &[]).unwrap(), content_hash(&[decorated], &[]).unwrap());
    }

    #[test]
    fn chat_order_matters() {
        let first = ChatMessage::new(ChatRole::User, "one");
        let second = ChatMessage::new(ChatRole::Assistant, "two");
        assert_ne!(
            content_hash(&[], &[first.clone(), second.clone()]).unwrap(),
            content_hash(&[], &[second, first]).unwrap()
        );
    }

    #[test]
    fn hash_is_hex_sha256() {
        let hash = content_hash(&[], &[]).unwrap();
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hash_prefix(&hash).len(), 8);
    }
}
