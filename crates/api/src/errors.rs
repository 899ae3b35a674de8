//! Mapping of domain errors onto HTTP responses

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use daybook_domain::DaybookError;
use serde_json::json;
use tracing::{error, warn};

/// Error returned by every handler.
///
/// Serialised as `{"success": false, "error": {"type": ..., "message": ...}}`.
#[derive(Debug)]
pub struct ApiError(pub DaybookError);

impl ApiError {
    /// HTTP status for the wrapped error.
    pub fn status(&self) -> StatusCode {
        match self.0 {
            DaybookError::Validation(_) => StatusCode::BAD_REQUEST,
            DaybookError::NotFound(_) => StatusCode::NOT_FOUND,
            DaybookError::Conflict(_) => StatusCode::CONFLICT,
            DaybookError::Quota(_) => StatusCode::TOO_MANY_REQUESTS,
            DaybookError::Generation(_) => StatusCode::BAD_GATEWAY,
            DaybookError::Auth(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<DaybookError> for ApiError {
    fn from(err: DaybookError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(DaybookError::Validation(format!("invalid request body: {}", rejection.body_text())))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(DaybookError::Validation(format!("invalid path: {}", rejection.body_text())))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error_type = self.0.label(), error = %self.0, "request failed");
        } else {
            warn!(error_type = self.0.label(), error = %self.0, "request rejected");
        }

        (status, Json(json!({ "success": false, "error": self.0 }))).into_response()
    }
}
