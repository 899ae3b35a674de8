/// OpenAI-compatible client implementing the forecast text generator
use async_trait::async_trait;
use daybook_core::forecast::TextGenerator;
use daybook_domain::constants::{DEFAULT_GENERATION_API_URL, DEFAULT_GENERATION_MODEL};
use daybook_domain::{DaybookError, Result as DomainResult};
use reqwest::header::RETRY_AFTER;
use reqwest::Method;
use tracing::{debug, info};

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, GenerationClientError};
use crate::http::HttpClient;

const DEFAULT_MAX_TOKENS: u32 = 2_000;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;
const SYSTEM_PROMPT: &str = "You are a thoughtful life-planning assistant. You answer with JSON only.";

/// Chat Completions client used to generate forecasts
pub struct OpenAIClient {
    http_client: HttpClient,
    api_key: String,
    model: String,
    api_url: String,
}

impl OpenAIClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `api_key` - Bearer key for the API; an empty key fails every call
    /// * `http_client` - HTTP client with retry logic
    pub fn new(api_key: String, http_client: HttpClient) -> Self {
        Self {
            http_client,
            api_key,
            model: DEFAULT_GENERATION_MODEL.to_string(),
            api_url: DEFAULT_GENERATION_API_URL.to_string(),
        }
    }

    /// Use a different model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different OpenAI-compatible endpoint
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Send `prompt` and return the raw completion text
    ///
    /// # Errors
    /// Returns `GenerationClientError` for network failures, API errors, or
    /// responses without content
    pub async fn complete(&self, prompt: &str) -> Result<String, GenerationClientError> {
        if self.api_key.trim().is_empty() {
            return Err(GenerationClientError::Authentication("API key not configured".into()));
        }

        let request_payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system".to_string(), content: SYSTEM_PROMPT.to_string() },
                ChatMessage { role: "user".to_string(), content: prompt.to_string() },
            ],
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        };

        let request_builder = self
            .http_client
            .request(Method::POST, &self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request_payload);

        let response = self
            .http_client
            .send(request_builder)
            .await
            .map_err(|err| GenerationClientError::Network(err.message().to_string()))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Received generation API response");

        if !status.is_success() {
            return Err(handle_error_status(status.as_u16(), response).await);
        }

        let chat_response: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationClientError::InvalidSchema(format!("Failed to parse response: {}", e))
        })?;

        if let Some(usage) = &chat_response.usage {
            info!(
                model = %self.model,
                tokens = usage.total_tokens,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Forecast completion received"
            );
        }

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                GenerationClientError::InvalidSchema("Response contained no content".to_string())
            })
    }
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    async fn generate(&self, prompt: &str) -> DomainResult<String> {
        self.complete(prompt).await.map_err(DaybookError::from)
    }
}

/// Handle HTTP error status codes
async fn handle_error_status(status: u16, response: reqwest::Response) -> GenerationClientError {
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());
    let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

    match status {
        401 | 403 => GenerationClientError::Authentication(format!("Invalid API key ({})", status)),
        429 => GenerationClientError::RateLimit(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
        _ => GenerationClientError::Api { status, message },
    }
}
