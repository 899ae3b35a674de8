//! Shared test helpers for `daybook-core` integration tests.
//!
//! In-memory fakes for every core port so that service tests can focus on
//! behaviour instead of storage or network plumbing.

#![allow(dead_code)]

pub mod calendar;
pub mod generator;
pub mod repositories;

use daybook_domain::{ActivityInput, Scenario};

pub fn input(title: &str, start: &str, end: Option<&str>, days: &[&str]) -> ActivityInput {
    ActivityInput {
        title: Some(title.to_string()),
        start_time: Some(start.to_string()),
        end_time: end.map(str::to_string),
        days: (!days.is_empty()).then(|| days.iter().map(|day| day.to_string()).collect()),
        ..ActivityInput::default()
    }
}

pub fn scenarios(tag: &str) -> Vec<Scenario> {
    ["1 month", "6 months", "1 year"]
        .iter()
        .map(|horizon| Scenario {
            title: format!("{tag} {horizon}"),
            time_horizon: horizon.to_string(),
            summary: vec![format!("{tag} summary")],
            details: format!("{tag} details"),
        })
        .collect()
}

pub fn scenarios_json(tag: &str) -> String {
    serde_json::to_string(&scenarios(tag)).unwrap_or_default()
}
