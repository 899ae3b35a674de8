//! Request logging

use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info, warn};

/// Log the outcome of a request with structured fields.
///
/// `route` is the matched route template (e.g. `/users/{user_id}/forecast`),
/// never the concrete path, so user ids stay out of the route field.
#[inline]
pub fn log_request(method: &str, route: &str, status: u16, elapsed: Duration) {
    let duration_ms = elapsed.as_millis() as u64;

    if status < 500 {
        info!(method, route, status, duration_ms, "request_completed");
    } else {
        warn!(method, route, status, duration_ms, "request_failed");
    }
}

/// Middleware timing every request and logging it through [`log_request`].
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    log_request(&method, &route, response.status().as_u16(), started.elapsed());
    response
}
