//! Shared harness for driving the router in-process.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use daybook_api::{router, AppContext};
use daybook_domain::Config;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::MockServer;

pub const GENERATION_PATH: &str = "/v1/chat/completions";

/// Router over a temporary database with both outbound integrations
/// pointed at one mock server.
pub struct TestApp {
    pub router: Router,
    pub upstream: MockServer,
    _temp_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let temp_dir = TempDir::new().expect("temporary directory should be created");

        let mut config = Config::default();
        config.database.path = temp_dir.path().join("api.db").display().to_string();
        config.database.pool_size = 4;
        config.calendar.api_base = upstream.uri();
        config.forecast.api_url = format!("{}{GENERATION_PATH}", upstream.uri());
        config.forecast.api_key = Some("test-key".into());

        let context = AppContext::new(config).expect("context should initialise");
        Self { router: router(Arc::new(context)), upstream, _temp_dir: temp_dir }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body should be readable");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response should be JSON")
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(request(Method::GET, uri, None, &[])).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(request(Method::POST, uri, Some(body), &[])).await
    }

    /// Number of requests the mock upstream saw for `path`.
    pub async fn upstream_calls(&self, path: &str) -> usize {
        self.upstream
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == path)
            .count()
    }
}

pub fn request(
    method: Method,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    }
}

/// Chat-completion body whose content is three well-formed scenarios.
pub fn completion(tag: &str) -> Value {
    let scenarios: Vec<Value> = (1..=3)
        .map(|n| {
            serde_json::json!({
                "title": format!("{tag} {n}"),
                "timeHorizon": "1 year",
                "summary": ["steady progress"],
                "details": "more detail"
            })
        })
        .collect();
    serde_json::json!({
        "choices": [{ "message": { "content": format!("```json\n{}\n```", Value::Array(scenarios)) } }]
    })
}
