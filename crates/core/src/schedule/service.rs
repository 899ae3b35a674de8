//! Schedule service - repository mutation followed by best-effort mirroring

use std::sync::Arc;

use daybook_domain::{
    Activity, ActivityInput, ActivityPatch, CalendarCredentials, CreateRequest, Result,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::ports::{CalendarConnector, CalendarService};
use super::repository::ActivityRepository;
use super::sync::{CalendarSyncAdapter, SyncOutcome};

/// Per-request calendar context supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct SyncContext {
    pub credentials: Option<CalendarCredentials>,
    pub time_zone: Option<String>,
}

/// Result of a single mutation. The repository outcome is authoritative;
/// `calendar_error` is advisory.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub success: bool,
    pub activity: Activity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_error: Option<String>,
}

/// Per-item outcome inside a batch creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemOutcome {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub success: bool,
    pub created: usize,
    pub failed: usize,
    pub results: Vec<ItemOutcome>,
}

/// Creation result, mirroring the shape of the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CreateResult {
    Single(MutationResult),
    Batch(BatchResult),
}

/// Orchestrates the activity repository and the calendar sync adapter
#[derive(Clone)]
pub struct ScheduleService {
    repository: ActivityRepository,
    adapter: CalendarSyncAdapter,
    connector: Arc<dyn CalendarConnector>,
}

impl ScheduleService {
    pub fn new(
        repository: ActivityRepository,
        adapter: CalendarSyncAdapter,
        connector: Arc<dyn CalendarConnector>,
    ) -> Self {
        Self { repository, adapter, connector }
    }

    pub fn repository(&self) -> &ActivityRepository {
        &self.repository
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<Activity>> {
        self.repository.list(user_id).await
    }

    /// Add one activity or a batch.
    ///
    /// A single add fails the request on repository errors. A batch is
    /// processed strictly in order and isolates every item's failure.
    #[instrument(skip(self, request, ctx))]
    pub async fn create(
        &self,
        user_id: &str,
        request: CreateRequest,
        ctx: &SyncContext,
    ) -> Result<CreateResult> {
        let calendar = self.calendar_for(ctx);

        match request {
            CreateRequest::Single(input) => {
                let result = self.add_one(user_id, input, &calendar, ctx).await?;
                Ok(CreateResult::Single(result))
            }
            CreateRequest::Batch(items) => {
                let mut results = Vec::with_capacity(items.len());
                for (index, input) in items.into_iter().enumerate() {
                    let outcome = match self.add_one(user_id, input, &calendar, ctx).await {
                        Ok(result) => ItemOutcome {
                            index,
                            activity: Some(result.activity),
                            error: None,
                            calendar_error: result.calendar_error,
                        },
                        Err(err) => {
                            warn!(user_id, index, error_type = err.label(), error = %err, "batch item rejected");
                            ItemOutcome {
                                index,
                                activity: None,
                                error: Some(err.to_string()),
                                calendar_error: None,
                            }
                        }
                    };
                    results.push(outcome);
                }

                let created = results.iter().filter(|item| item.activity.is_some()).count();
                let failed = results.len() - created;
                info!(user_id, created, failed, "batch creation finished");
                Ok(CreateResult::Batch(BatchResult { success: failed == 0, created, failed, results }))
            }
        }
    }

    #[instrument(skip(self, patch, ctx))]
    pub async fn update(
        &self,
        user_id: &str,
        id: u64,
        patch: ActivityPatch,
        ctx: &SyncContext,
    ) -> Result<MutationResult> {
        let activity = self.repository.update(user_id, id, patch).await?;

        let outcome = match self.calendar_for(ctx) {
            None => SyncOutcome::Skipped,
            Some(Err(error)) => SyncOutcome::Failed { error },
            Some(Ok(calendar)) => {
                self.adapter.mirror_update(&activity, calendar.as_ref(), ctx.time_zone.as_deref()).await
            }
        };

        Ok(self.finish(user_id, activity, outcome).await)
    }

    /// Remove the activity, then its calendar mirror if one was linked.
    #[instrument(skip(self, ctx))]
    pub async fn delete(&self, user_id: &str, id: u64, ctx: &SyncContext) -> Result<MutationResult> {
        let removed = self.repository.delete(user_id, id).await?;

        let outcome = match (removed.external_event_id.is_some(), self.calendar_for(ctx)) {
            (false, _) | (true, None) => SyncOutcome::Skipped,
            (true, Some(Err(error))) => SyncOutcome::Failed { error },
            (true, Some(Ok(calendar))) => self.adapter.mirror_delete(&removed, calendar.as_ref()).await,
        };

        Ok(MutationResult { success: true, calendar_error: outcome.calendar_error(), activity: removed })
    }

    async fn add_one(
        &self,
        user_id: &str,
        input: ActivityInput,
        calendar: &Option<std::result::Result<Arc<dyn CalendarService>, String>>,
        ctx: &SyncContext,
    ) -> Result<MutationResult> {
        let activity = self.repository.add(user_id, input).await?;

        let outcome = match calendar {
            None => SyncOutcome::Skipped,
            Some(Err(error)) => SyncOutcome::Failed { error: error.clone() },
            Some(Ok(calendar)) => {
                self.adapter.mirror_create(&activity, calendar.as_ref(), ctx.time_zone.as_deref()).await
            }
        };

        Ok(self.finish(user_id, activity, outcome).await)
    }

    /// Write back a newly created event link and fold the outcome into the
    /// response.
    async fn finish(&self, user_id: &str, activity: Activity, outcome: SyncOutcome) -> MutationResult {
        let Some(event) = outcome.created_event() else {
            return MutationResult { success: true, calendar_error: outcome.calendar_error(), activity };
        };

        match self.repository.link_external(user_id, activity.id, event).await {
            Ok(linked) => MutationResult { success: true, activity: linked, calendar_error: None },
            Err(err) => {
                warn!(user_id, activity_id = activity.id, error = %err, "failed to store calendar link");
                MutationResult {
                    success: true,
                    activity,
                    calendar_error: Some(format!("calendar event created but link not saved: {err}")),
                }
            }
        }
    }

    /// `None` when the caller sent no credentials.
    fn calendar_for(
        &self,
        ctx: &SyncContext,
    ) -> Option<std::result::Result<Arc<dyn CalendarService>, String>> {
        let credentials = ctx.credentials.as_ref()?;
        Some(self.connector.connect(credentials).map_err(|err| err.message().to_string()))
    }
}
