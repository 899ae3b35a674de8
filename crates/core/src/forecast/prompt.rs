//! Forecast prompt construction and completion parsing

use daybook_domain::constants::FORECAST_SCENARIO_COUNT;
use daybook_domain::{Activity, ChatMessage, DaybookError, Result, Scenario};
use serde::Deserialize;

/// Build the generation prompt from the schedule and the most recent
/// `history_limit` chat messages.
pub fn build_prompt(activities: &[Activity], messages: &[ChatMessage], history_limit: usize) -> String {
    let mut prompt = String::from(
        "You are a planning assistant. Based on the user's weekly schedule and recent \
         conversation, describe three plausible futures for the user if they keep \
         following this routine.\n\n",
    );

    prompt.push_str("Schedule:\n");
    if activities.is_empty() {
        prompt.push_str("- (no activities)\n");
    }
    for activity in activities {
        let days: Vec<&str> = activity.days.iter().map(|day| day.label()).collect();
        prompt.push_str(&format!(
            "- {} | {} | {}-{} | {}\n",
            activity.title,
            days.join(", "),
            activity.start_time,
            activity.end_time,
            activity.status
        ));
    }

    let skip = messages.len().saturating_sub(history_limit);
    let recent = &messages[skip..];
    if !recent.is_empty() {
        prompt.push_str("\nRecent conversation:\n");
        for message in recent {
            prompt.push_str(&format!("{}: {}\n", message.role, message.content));
        }
    }

    prompt.push_str(&format!(
        "\nRespond with a JSON array of exactly {FORECAST_SCENARIO_COUNT} objects, each with the keys \
         \"title\" (string), \"timeHorizon\" (string), \"summary\" (array of short strings) and \
         \"details\" (string). Respond with JSON only."
    ));
    prompt
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioEnvelope {
    Bare(Vec<Scenario>),
    Wrapped {
        #[serde(alias = "futures")]
        scenarios: Vec<Scenario>,
    },
}

/// Parse a completion into exactly three scenarios.
///
/// Surrounding whitespace and Markdown code fences are tolerated. The
/// scenarios may be a bare array or sit under a `scenarios`/`futures` key.
pub fn parse_scenarios(raw: &str) -> Result<Vec<Scenario>> {
    let body = strip_fences(raw);
    if body.is_empty() {
        return Err(DaybookError::Generation("empty completion".into()));
    }

    let envelope: ScenarioEnvelope = serde_json::from_str(body)
        .map_err(|err| DaybookError::Generation(format!("completion is not valid scenario JSON: {err}")))?;
    let scenarios = match envelope {
        ScenarioEnvelope::Bare(scenarios) | ScenarioEnvelope::Wrapped { scenarios } => scenarios,
    };

    if scenarios.len() != FORECAST_SCENARIO_COUNT {
        return Err(DaybookError::Generation(format!(
            "expected {FORECAST_SCENARIO_COUNT} scenarios, got {}",
            scenarios.len()
        )));
    }
    Ok(scenarios)
}

fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use daybook_domain::{ActivityStatus, ChatRole, DayOfWeek};

    use super::*;

    const THREE: &str = r#"[
        {"title":"A","timeHorizon":"1 month","summary":["x"],"details":"a"},
        {"title":"B","timeHorizon":"6 months","summary":["y","z"],"details":"b"},
        {"title":"C","timeHorizon":"1 year","summary":[],"details":"c"}
    ]"#;

    #[test]
    fn parses_bare_array() {
        let scenarios = parse_scenarios(THREE).unwrap();
        assert_eq!(scenarios.len(), 3);
        assert_eq!(scenarios[1].time_horizon, "6 months");
        assert_eq!(scenarios[1].summary, vec!["y", "z"]);
    }

    #[test]
    fn strips_code_fences() {
        let fenced = format!("```json\n{THREE}\n```\n");
        assert_eq!(parse_scenarios(&fenced).unwrap().len(), 3);

        let plain = format!("  ```\n{THREE}```");
        assert_eq!(parse_scenarios(&plain).unwrap().len(), 3);
    }

    #[test]
    fn accepts_wrapped_arrays() {
        let wrapped = format!(r#"{{"scenarios": {THREE}}}"#);
        assert_eq!(parse_scenarios(&wrapped).unwrap().len(), 3);

        let futures = format!(r#"{{"futures": {THREE}}}"#);
        assert_eq!(parse_scenarios(&futures).unwrap()[2].title, "C");
    }

    #[test]
    fn rejects_malformed_output() {
        for raw in [
            "",
            "   ",
            "Sure! Here are your futures.",
            "[{\"title\":\"A\"}]",
            r#"[{"title":"A","timeHorizon":"1m","summary":[],"details":"a"}]"#,
        ] {
            assert!(
                matches!(parse_scenarios(raw), Err(DaybookError::Generation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn prompt_lists_schedule_and_recent_history() {
        let activity = Activity {
            id: 1,
            title: "Gym".into(),
            start_time: "06:00".parse().unwrap(),
            end_time: "07:00".parse().unwrap(),
            description: String::new(),
            location: String::new(),
            attendees: vec![],
            tags: vec![],
            days: vec![DayOfWeek::Monday, DayOfWeek::Thursday],
            status: ActivityStatus::InProgress,
            color: "#60A5FA".into(),
            external_event_id: None,
            external_event_link: None,
        };
        let messages: Vec<ChatMessage> =
            (0..5).map(|i| ChatMessage::new(ChatRole::User, format!("message {i}"))).collect();

        let prompt = build_prompt(&[activity], &messages, 2);
        assert!(prompt.contains("Schedule:\n- Gym | Monday, Thursday | 06:00-07:00 | In Progress\n"));
        assert!(prompt.contains("user: message 3\nuser: message 4\n"));
        assert!(prompt.contains("user: message 3"));
        assert!(!prompt.contains("message 2"));
        assert!(prompt.contains("exactly 3 objects"));
    }
}
