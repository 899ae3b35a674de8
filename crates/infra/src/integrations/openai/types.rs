/// OpenAI-compatible chat completion types for forecast generation
use daybook_domain::DaybookError;
use serde::{Deserialize, Serialize};

/// Generation client error types
#[derive(Debug, thiserror::Error)]
pub enum GenerationClientError {
    /// Network-level error (connection failed, timeout, etc.)
    #[error("Network error: {0}")]
    Network(String),

    /// The API returned an error response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded - should retry after delay
    #[error("Rate limit exceeded (retry after {0}s)")]
    RateLimit(u64),

    /// Authentication failed (missing or invalid API key)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Response body doesn't match expected schema
    #[error("Invalid response schema: {0}")]
    InvalidSchema(String),
}

impl From<GenerationClientError> for DaybookError {
    fn from(err: GenerationClientError) -> Self {
        match err {
            GenerationClientError::RateLimit(_) => DaybookError::Quota(err.to_string()),
            other => DaybookError::Generation(other.to_string()),
        }
    }
}

/// Internal types for the Chat Completions API
#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Response from the Chat Completions API
#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Message,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Usage {
    pub total_tokens: i32,
    pub prompt_tokens: i32,
    pub completion_tokens: i32,
}
