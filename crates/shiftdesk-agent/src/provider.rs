use std::time::Duration;

use async_trait::async_trait;

/// Single-turn completion request. Every call the scheduler makes is one
/// system prompt plus one user prompt, so there is no message history.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
    pub model: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
}

/// Common interface for the LLM backends (OpenAI, Anthropic, the router).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Send a request and wait for the full response.
    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, ProviderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("AI request timed out after {ms}ms")]
    Timeout { ms: u64 },
}

/// Run `provider.complete` bounded by `limit`. An elapsed call is reported
/// as [`ProviderError::Timeout`] so callers handle it like any other failure.
pub async fn complete_within(
    provider: &dyn LlmProvider,
    req: &CompletionRequest,
    limit: Duration,
) -> Result<Completion, ProviderError> {
    match tokio::time::timeout(limit, provider.complete(req)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::Timeout {
            ms: limit.as_millis() as u64,
        }),
    }
}

/// Parse a `retry-after` header given in seconds. Defaults to 5s.
pub(crate) fn retry_after_ms(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .map(|s| s * 1000)
        .unwrap_or(5000)
}
