//! Forecast endpoints

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;
use daybook_domain::{Forecast, ForecastStatus};

use super::AppState;
use crate::errors::ApiError;

/// Cached forecast when still valid, otherwise a fresh one.
pub async fn predict_forecast(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
) -> Result<Json<Forecast>, ApiError> {
    let Path(user_id) = user?;
    Ok(Json(context.forecasts.predict(&user_id).await?))
}

/// Read-only staleness probe.
pub async fn forecast_status(
    State(context): State<AppState>,
    user: Result<Path<String>, PathRejection>,
) -> Result<Json<ForecastStatus>, ApiError> {
    let Path(user_id) = user?;
    Ok(Json(context.forecasts.status(&user_id).await?))
}
