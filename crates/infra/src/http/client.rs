//! Shared HTTP client for the calendar and generation integrations
//!
//! Transient failures (timeouts, connection errors, 5xx statuses) are retried
//! with exponential backoff, but only for methods whose repetition cannot
//! create anything upstream. A `POST` (event insert, chat completion) is sent
//! exactly once: a timed-out attempt may already have been applied.

use std::time::Duration;

use daybook_domain::DaybookError;
use reqwest::{Client as ReqwestClient, Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::{status_error, InfraError};

const USER_AGENT: &str = concat!("daybook/", env!("CARGO_PKG_VERSION"));

/// When and how often a failed request is sent again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts for a repeatable request, including the first.
    pub max_attempts: usize,
    /// Delay before the first retry; doubled for every further retry.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 3, base_backoff: Duration::from_millis(200) }
    }
}

impl RetryPolicy {
    /// Attempts allowed for `method`. Non-repeatable methods get one.
    pub fn attempts_for(&self, method: &Method) -> usize {
        if is_repeatable(method) {
            self.max_attempts.max(1)
        } else {
            1
        }
    }

    fn delay_before(&self, retry: usize) -> Duration {
        let shift = retry.saturating_sub(1).min(8) as u32;
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

/// PATCH bodies sent to the calendar carry the full field set, so replaying
/// one converges on the same event.
fn is_repeatable(method: &Method) -> bool {
    method.is_idempotent() || *method == Method::PATCH
}

/// reqwest client plus the retry policy applied by [`HttpClient::send`].
#[derive(Clone)]
pub struct HttpClient {
    client: ReqwestClient,
    retry: RetryPolicy,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.client.request(method, url)
    }

    /// Send the request, retrying transient failures when the method allows.
    ///
    /// Non-2xx responses are returned as `Ok`; see [`ensure_success`].
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, DaybookError> {
        let request = builder.build().map_err(transport_error)?;
        let method = request.method().clone();
        let url = request.url().clone();
        let attempts = self.retry.attempts_for(&method);

        let mut pending = Some(request);
        let mut attempt = 0;
        while let Some(request) = pending.take() {
            attempt += 1;
            // Streaming bodies cannot be replayed; such requests get one attempt.
            let replay = if attempt < attempts { request.try_clone() } else { None };

            let outcome = self.execute(request, attempt).await;
            let transient = match &outcome {
                Ok(response) => response.status().is_server_error(),
                Err(err) => is_transient(err),
            };

            if let (true, Some(next)) = (transient, replay) {
                warn!(attempt, %method, %url, "transient HTTP failure, retrying");
                let delay = self.retry.delay_before(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                pending = Some(next);
                continue;
            }

            return outcome.map_err(transport_error);
        }

        Err(DaybookError::Internal(format!("no HTTP request was sent to {url}")))
    }

    /// Send the request and decode a JSON body from a successful response.
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, DaybookError> {
        let response = ensure_success(self.send(builder).await?).await?;
        response.json::<T>().await.map_err(|err| {
            DaybookError::Network(format!("failed to decode response body: {err}"))
        })
    }

    /// Send the request and discard the body of a successful response.
    pub async fn send_empty(&self, builder: RequestBuilder) -> Result<(), DaybookError> {
        ensure_success(self.send(builder).await?).await.map(|_| ())
    }

    async fn execute(&self, request: Request, attempt: usize) -> reqwest::Result<Response> {
        debug!(attempt, method = %request.method(), url = %request.url(), "sending HTTP request");
        let outcome = self.client.execute(request).await;
        match &outcome {
            Ok(response) => debug!(attempt, status = %response.status(), "received HTTP response"),
            Err(err) => debug!(attempt, error = %err, "HTTP request failed"),
        }
        outcome
    }
}

/// Builder for [`HttpClient`].
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), retry: RetryPolicy::default() }
    }
}

impl HttpClientBuilder {
    /// Per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Total attempts for repeatable methods (initial try + retries).
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.retry.max_attempts = attempts.max(1);
        self
    }

    pub fn base_backoff(mut self, backoff: Duration) -> Self {
        self.retry.base_backoff = backoff;
        self
    }

    pub fn build(self) -> Result<HttpClient, DaybookError> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .map_err(transport_error)?;

        Ok(HttpClient { client, retry: self.retry })
    }
}

/// Turn a non-2xx response into a domain error carrying the upstream body.
pub async fn ensure_success(response: Response) -> Result<Response, DaybookError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(%status, body = %truncate(&body, 256), "upstream returned an error status");
    let detail = if body.trim().is_empty() {
        status.canonical_reason().unwrap_or("unknown status").to_string()
    } else {
        truncate(body.trim(), 256).to_string()
    };
    Err(status_error(status.as_u16(), &detail))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}

fn transport_error(err: reqwest::Error) -> DaybookError {
    DaybookError::from(InfraError::from(err))
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use reqwest::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client() -> HttpClient {
        HttpClient::builder()
            .base_backoff(Duration::from_millis(10))
            .max_attempts(3)
            .build()
            .expect("http client")
    }

    /// 500 twice, then 200.
    fn flaky() -> impl Fn(&wiremock::Request) -> ResponseTemplate + Send + Sync + 'static {
        let calls = Arc::new(AtomicUsize::new(0));
        move |_req: &wiremock::Request| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                ResponseTemplate::new(500)
            } else {
                ResponseTemplate::new(200)
            }
        }
    }

    #[test]
    fn only_repeatable_methods_get_retries() {
        let policy = RetryPolicy { max_attempts: 4, base_backoff: Duration::ZERO };
        assert_eq!(policy.attempts_for(&Method::GET), 4);
        assert_eq!(policy.attempts_for(&Method::PATCH), 4);
        assert_eq!(policy.attempts_for(&Method::DELETE), 4);
        assert_eq!(policy.attempts_for(&Method::POST), 1);
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let policy = RetryPolicy { max_attempts: 3, base_backoff: Duration::from_millis(100) };
        assert_eq!(policy.delay_before(1), Duration::from_millis(100));
        assert_eq!(policy.delay_before(2), Duration::from_millis(200));
        assert_eq!(policy.delay_before(3), Duration::from_millis(400));
    }

    #[tokio::test]
    async fn delete_is_retried_through_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE")).respond_with(flaky()).expect(3).mount(&server).await;

        let client = client();
        let response =
            client.send(client.request(Method::DELETE, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn post_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(flaky()).expect(1).mount(&server).await;

        let client = client();
        let response = client
            .send(client.request(Method::POST, server.uri()).body("{}"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn timed_out_post_is_sent_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(600)))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::builder()
            .timeout(Duration::from_millis(300))
            .base_backoff(Duration::from_millis(5))
            .build()
            .expect("http client");
        let err = client
            .send(client.request(Method::POST, server.uri()).body("{}"))
            .await
            .expect_err("should time out");

        assert!(matches!(err, DaybookError::Network(_)));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn client_errors_are_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(404)).expect(1).mount(&server).await;

        let client = client();
        let response =
            client.send(client.request(Method::GET, server.uri())).await.expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn send_json_maps_gone_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(410).set_body_string("resource deleted"))
            .mount(&server)
            .await;

        let client = client();
        let result: Result<serde_json::Value, _> =
            client.send_json(client.request(Method::GET, server.uri())).await;

        match result {
            Err(DaybookError::NotFound(msg)) => assert!(msg.contains("resource deleted")),
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_json_decodes_success_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "evt1"})))
            .mount(&server)
            .await;

        let client = client();
        let body: serde_json::Value =
            client.send_json(client.request(Method::GET, server.uri())).await.expect("json body");
        assert_eq!(body["id"], "evt1");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("héllo", 2), "hé");
        assert_eq!(truncate("hi", 10), "hi");
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpClient::builder()
            .base_backoff(Duration::from_millis(5))
            .max_attempts(2)
            .build()
            .expect("http client");

        let err = client
            .send(client.request(Method::GET, format!("http://{addr}")))
            .await
            .expect_err("connection refused");
        assert!(matches!(err, DaybookError::Network(_)));
    }
}
