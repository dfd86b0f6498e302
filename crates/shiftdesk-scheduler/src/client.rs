use std::sync::Arc;
use std::time::Duration;

use shiftdesk_agent::{complete_within, Completion, CompletionRequest, LlmProvider};
use shiftdesk_core::config::AiConfig;
use tracing::{debug, warn};

/// Reported as `ai_error` when no provider is configured.
pub const NO_PROVIDER: &str = "no AI provider configured";

/// Per-call parameters taken from the `[ai]` config section.
#[derive(Debug, Clone)]
pub struct AiSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl From<&AiConfig> for AiSettings {
    fn from(cfg: &AiConfig) -> Self {
        Self {
            model: cfg.model.clone(),
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
            timeout: Duration::from_secs(cfg.timeout_secs),
        }
    }
}

/// An optional provider plus the settings every call uses.
///
/// Failures come back as display strings: callers only ever surface them as
/// metadata, never as request errors.
#[derive(Clone)]
pub struct AiClient {
    provider: Option<Arc<dyn LlmProvider>>,
    settings: AiSettings,
}

impl AiClient {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, settings: AiSettings) -> Self {
        Self { provider, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn ask(&self, system: &str, prompt: String) -> Result<Completion, String> {
        let Some(provider) = self.provider.as_deref() else {
            return Err(NO_PROVIDER.to_string());
        };
        let req = CompletionRequest {
            model: self.settings.model.clone(),
            system: system.to_string(),
            prompt,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };
        match complete_within(provider, &req, self.settings.timeout).await {
            Ok(completion) => {
                debug!(
                    provider = provider.name(),
                    tokens_in = completion.tokens_in,
                    tokens_out = completion.tokens_out,
                    "AI call completed"
                );
                Ok(completion)
            }
            Err(e) => {
                warn!(provider = provider.name(), err = %e, "AI call failed");
                Err(e.to_string())
            }
        }
    }
}
