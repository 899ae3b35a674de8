//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::AppState;
use crate::utils::health::HealthStatus;

/// Get service health status
///
/// Responds `503` only when the database is unreachable; a missing
/// generator key degrades the score but keeps the service live.
///
/// # Example Response
/// ```json
/// {
///   "is_healthy": true,
///   "score": 1.0,
///   "message": null,
///   "components": [
///     { "name": "database", "is_healthy": true, "message": null },
///     { "name": "generator", "is_healthy": true, "message": null }
///   ],
///   "timestamp": 1698765432
/// }
/// ```
pub async fn health(State(context): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = context.health_check().await;
    let code = if status.component_healthy("database") {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}
