//! Activity repository - owns the per-user activity list
//!
//! Every operation reads the whole list, changes it in memory and writes the
//! whole list back. Writes carry the snapshot version they were based on, so
//! a concurrent writer surfaces as `DaybookError::Conflict` instead of a
//! silent lost update.

use std::sync::Arc;

use chrono::{Datelike, Local};
use daybook_domain::constants::{ACTIVITY_COLORS, DEFAULT_ACTIVITY_DURATION_MINUTES};
use daybook_domain::{
    Activity, ActivityInput, ActivityPatch, ActivityStatus, ClockTime, CreatedEvent, DayOfWeek,
    DaybookError, Result,
};
use rand::seq::SliceRandom;
use tracing::debug;

use super::ports::{ScheduleSnapshot, ScheduleStore};

/// Source of "today's" weekday for activities created without `days`.
pub type WeekdaySource = Arc<dyn Fn() -> DayOfWeek + Send + Sync>;

/// Authoritative store of activities for each user
#[derive(Clone)]
pub struct ActivityRepository {
    store: Arc<dyn ScheduleStore>,
    today: WeekdaySource,
}

impl ActivityRepository {
    pub fn new(store: Arc<dyn ScheduleStore>) -> Self {
        Self { store, today: Arc::new(|| DayOfWeek::from(Local::now().weekday())) }
    }

    /// Override the weekday used as the default for `days`.
    pub fn with_weekday_source(mut self, today: WeekdaySource) -> Self {
        self.today = today;
        self
    }

    /// All activities in insertion order.
    pub async fn list(&self, user_id: &str) -> Result<Vec<Activity>> {
        Ok(self.store.load_schedule(user_id).await?.activities)
    }

    pub async fn get(&self, user_id: &str, id: u64) -> Result<Activity> {
        let snapshot = self.store.load_schedule(user_id).await?;
        snapshot
            .activities
            .into_iter()
            .find(|activity| activity.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// Validate `input`, allocate `max(id) + 1` and append.
    pub async fn add(&self, user_id: &str, input: ActivityInput) -> Result<Activity> {
        let draft = new_activity(input, (self.today)())?;

        let ScheduleSnapshot { mut activities, version } = self.store.load_schedule(user_id).await?;
        let activity = Activity { id: next_id(&activities), ..draft };
        activities.push(activity.clone());

        self.store.save_schedule(user_id, &activities, version).await?;
        debug!(user_id, activity_id = activity.id, "activity added");
        Ok(activity)
    }

    /// Shallow-merge `patch` into the activity with `id`.
    pub async fn update(&self, user_id: &str, id: u64, patch: ActivityPatch) -> Result<Activity> {
        self.modify(user_id, id, |activity| apply_patch(activity, patch)).await
    }

    /// Remove the activity with `id` and return it.
    pub async fn delete(&self, user_id: &str, id: u64) -> Result<Activity> {
        let ScheduleSnapshot { mut activities, version } = self.store.load_schedule(user_id).await?;
        let index =
            activities.iter().position(|activity| activity.id == id).ok_or_else(|| not_found(id))?;
        let removed = activities.remove(index);

        self.store.save_schedule(user_id, &activities, version).await?;
        debug!(user_id, activity_id = id, "activity deleted");
        Ok(removed)
    }

    /// Record the calendar mirror of an activity. This is the only path that
    /// touches `external_event_id` / `external_event_link`.
    pub async fn link_external(
        &self,
        user_id: &str,
        id: u64,
        event: &CreatedEvent,
    ) -> Result<Activity> {
        self.modify(user_id, id, |activity| {
            activity.external_event_id = Some(event.id.clone());
            activity.external_event_link = event.html_link.clone();
            Ok(())
        })
        .await
    }

    async fn modify<F>(&self, user_id: &str, id: u64, change: F) -> Result<Activity>
    where
        F: FnOnce(&mut Activity) -> Result<()>,
    {
        let ScheduleSnapshot { mut activities, version } = self.store.load_schedule(user_id).await?;
        let activity =
            activities.iter_mut().find(|activity| activity.id == id).ok_or_else(|| not_found(id))?;

        change(activity)?;
        let updated = activity.clone();

        self.store.save_schedule(user_id, &activities, version).await?;
        debug!(user_id, activity_id = id, "activity updated");
        Ok(updated)
    }
}

fn not_found(id: u64) -> DaybookError {
    DaybookError::NotFound(format!("activity {id} does not exist"))
}

/// `max(existing ids) + 1`, or `1` for an empty list.
pub fn next_id(activities: &[Activity]) -> u64 {
    activities.iter().map(|activity| activity.id).max().map_or(1, |max| max + 1)
}

/// Build a validated activity (id `0`, assigned by the caller).
pub fn new_activity(input: ActivityInput, today: DayOfWeek) -> Result<Activity> {
    let title = required_title(input.title.as_deref())?;
    let start_time = match input.start_time.as_deref() {
        Some(raw) => parse_time("startTime", raw)?,
        None => return Err(DaybookError::Validation("startTime is required".into())),
    };
    let end_time = match input.end_time.as_deref() {
        Some(raw) => parse_time("endTime", raw)?,
        None => start_time.add_minutes(DEFAULT_ACTIVITY_DURATION_MINUTES),
    };

    let mut days = parse_days(input.days.as_deref().unwrap_or_default())?;
    if days.is_empty() {
        days.push(today);
    }

    let status = match input.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => ActivityStatus::default(),
    };

    let color = match input.color {
        Some(color) if !color.trim().is_empty() => color.trim().to_string(),
        _ => random_color(),
    };

    Ok(Activity {
        id: 0,
        title,
        start_time,
        end_time,
        description: input.description.unwrap_or_default(),
        location: input.location.unwrap_or_default(),
        attendees: clean_list(input.attendees.unwrap_or_default()),
        tags: clean_list(input.tags.unwrap_or_default()),
        days,
        status,
        color,
        external_event_id: None,
        external_event_link: None,
    })
}

/// Shallow merge. Fields absent from the patch are left untouched; the
/// activity is only modified once every present field has validated.
pub fn apply_patch(activity: &mut Activity, patch: ActivityPatch) -> Result<()> {
    let title = patch.title.as_deref().map(|raw| required_title(Some(raw))).transpose()?;
    let start_time = patch.start_time.as_deref().map(|raw| parse_time("startTime", raw)).transpose()?;
    let end_time = patch.end_time.as_deref().map(|raw| parse_time("endTime", raw)).transpose()?;
    let days = patch.days.as_deref().map(parse_days).transpose()?;
    let status = patch.status.as_deref().map(parse_status).transpose()?;

    if let Some(title) = title {
        activity.title = title;
    }
    if let Some(start_time) = start_time {
        activity.start_time = start_time;
    }
    if let Some(end_time) = end_time {
        activity.end_time = end_time;
    }
    if let Some(days) = days {
        activity.days = days;
    }
    if let Some(status) = status {
        activity.status = status;
    }
    if let Some(description) = patch.description {
        activity.description = description;
    }
    if let Some(location) = patch.location {
        activity.location = location;
    }
    if let Some(attendees) = patch.attendees {
        activity.attendees = clean_list(attendees);
    }
    if let Some(tags) = patch.tags {
        activity.tags = clean_list(tags);
    }
    if let Some(color) = patch.color.filter(|color| !color.trim().is_empty()) {
        activity.color = color.trim().to_string();
    }
    Ok(())
}

fn required_title(raw: Option<&str>) -> Result<String> {
    match raw.map(str::trim) {
        Some(title) if !title.is_empty() => Ok(title.to_string()),
        _ => Err(DaybookError::Validation("title is required".into())),
    }
}

fn parse_time(field: &str, raw: &str) -> Result<ClockTime> {
    raw.parse().map_err(|err| DaybookError::Validation(format!("{field}: {err}")))
}

fn parse_days(raw: &[String]) -> Result<Vec<DayOfWeek>> {
    raw.iter()
        .map(|day| day.parse().map_err(|_| DaybookError::Validation(format!("unknown day '{day}'"))))
        .collect()
}

fn parse_status(raw: &str) -> Result<ActivityStatus> {
    raw.parse().map_err(|_| DaybookError::Validation(format!("unknown status '{raw}'")))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn random_color() -> String {
    ACTIVITY_COLORS.choose(&mut rand::thread_rng()).copied().unwrap_or("#60A5FA").to_string()
}
