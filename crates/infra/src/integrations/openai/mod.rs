/// OpenAI-compatible integration for forecast generation
///
/// # Architecture
///
/// - **Client**: `OpenAIClient` - HTTP client wrapper for the Chat Completions API,
///   implementing the core `TextGenerator` port
/// - **Types**: Request/response types and `GenerationClientError`
///
/// # Error Handling
///
/// - **Network errors**: Automatically retried by `HttpClient`
/// - **Server errors (5xx)**: Retried with exponential backoff
/// - **Rate limits (429)**: Surfaced as `DaybookError::Quota` with the
///   upstream `Retry-After` hint
/// - **Everything else**: Surfaced as `DaybookError::Generation`
pub mod client;
pub mod types;

pub use client::OpenAIClient;
pub use types::GenerationClientError;
