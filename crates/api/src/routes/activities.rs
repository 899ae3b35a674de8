//! Activity endpoints

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_core::schedule::{CreateResult, MutationResult};
use daybook_domain::{Activity, ActivityPatch, CreateRequest};
use serde::Serialize;

use super::AppState;
use crate::errors::ApiError;
use crate::extract::CalendarContext;

#[derive(Debug, Serialize)]
pub struct ActivityList {
    pub success: bool,
    pub activities: Vec<Activity>,
}

pub async fn list_activities(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
) -> Result<Json<ActivityList>, ApiError> {
    let Path(user_id) = user?;
    let activities = context.schedule.list(&user_id).await?;
    Ok(Json(ActivityList { success: true, activities }))
}

/// Accepts one activity object or an array of them.
pub async fn create_activities(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
    CalendarContext(sync): CalendarContext,
    body: Result<Json<CreateRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateResult>), ApiError> {
    let Path(user_id) = user?;
    let Json(request) = body?;
    let result = context.schedule.create(&user_id, request, &sync).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

pub async fn update_activity(
    State(context): State<AppState>,
    target: Result<Path<(String, u64)>, PathRejection>,
    CalendarContext(sync): CalendarContext,
    body: Result<Json<ActivityPatch>, JsonRejection>,
) -> Result<Json<MutationResult>, ApiError> {
    let Path((user_id, id)) = target?;
    let Json(patch) = body?;
    Ok(Json(context.schedule.update(&user_id, id, patch, &sync).await?))
}

pub async fn delete_activity(
    State(context): State<AppState>,
    target: Result<Path<(String, u64)>, PathRejection>,
    CalendarContext(sync): CalendarContext,
) -> Result<Json<MutationResult>, ApiError> {
    let Path((user_id, id)) = target?;
    Ok(Json(context.schedule.delete(&user_id, id, &sync).await?))
}
