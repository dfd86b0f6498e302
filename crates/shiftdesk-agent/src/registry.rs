//! Builds the provider chain from the `[providers]` config section.
//!
//! Providers are tried in declaration order: OpenAI first, then Anthropic.
//! A section with an empty `api_key` is skipped, and when no section is
//! configured at all the `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` environment
//! variables are consulted instead.

use std::sync::Arc;

use shiftdesk_core::config::ProvidersConfig;
use tracing::info;

use crate::anthropic::AnthropicProvider;
use crate::openai::OpenAiProvider;
use crate::provider::LlmProvider;
use crate::router::{ProviderRouter, ProviderSlot};

/// Attempts per provider before the router moves on.
const SLOT_RETRIES: u32 = 1;

/// Resolve the configured providers into one `LlmProvider`.
///
/// Returns `None` when nothing is configured; a single provider is returned
/// as-is, several are wrapped in a [`ProviderRouter`].
pub fn build_provider(config: &ProvidersConfig) -> Option<Arc<dyn LlmProvider>> {
    build_provider_with_env(config, |key| std::env::var(key).ok())
}

fn build_provider_with_env(
    config: &ProvidersConfig,
    env: impl Fn(&str) -> Option<String>,
) -> Option<Arc<dyn LlmProvider>> {
    let mut chain: Vec<Box<dyn LlmProvider>> = Vec::new();

    if let Some(ref oa) = config.openai {
        if !oa.api_key.is_empty() {
            chain.push(Box::new(
                OpenAiProvider::new(oa.api_key.clone(), Some(oa.base_url.clone()))
                    .with_model(oa.model.clone()),
            ));
        }
    }
    if let Some(ref an) = config.anthropic {
        if !an.api_key.is_empty() {
            chain.push(Box::new(
                AnthropicProvider::new(an.api_key.clone(), Some(an.base_url.clone()))
                    .with_model(an.model.clone()),
            ));
        }
    }

    if chain.is_empty() {
        if let Some(key) = env("OPENAI_API_KEY").filter(|k| !k.is_empty()) {
            chain.push(Box::new(OpenAiProvider::new(key, None)));
        }
        if let Some(key) = env("ANTHROPIC_API_KEY").filter(|k| !k.is_empty()) {
            chain.push(Box::new(AnthropicProvider::new(key, None)));
        }
    }

    let names: Vec<String> = chain.iter().map(|p| p.name().to_string()).collect();
    match chain.len() {
        0 => None,
        1 => {
            let provider = chain.pop()?;
            info!(provider = %names[0], "AI provider configured");
            Some(Arc::from(provider))
        }
        _ => {
            let router = ProviderRouter::new(
                chain
                    .into_iter()
                    .map(|p| ProviderSlot::new(p, SLOT_RETRIES))
                    .collect(),
            );
            info!(providers = ?names, slots = router.len(), "AI provider chain configured");
            Some(Arc::new(router))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiftdesk_core::config::{AnthropicConfig, OpenAiProviderConfig};

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn nothing_configured_yields_none() {
        assert!(build_provider_with_env(&ProvidersConfig::default(), no_env).is_none());
    }

    #[test]
    fn single_section_is_used_directly() {
        let cfg = ProvidersConfig {
            openai: Some(OpenAiProviderConfig {
                api_key: "sk-test".into(),
                base_url: "http://localhost:1".into(),
                model: None,
            }),
            anthropic: None,
        };
        let provider = build_provider_with_env(&cfg, no_env).unwrap();
        assert_eq!(provider.name(), "openai");
    }

    #[test]
    fn two_sections_are_routed() {
        let cfg = ProvidersConfig {
            openai: Some(OpenAiProviderConfig {
                api_key: "sk-test".into(),
                base_url: "http://localhost:1".into(),
                model: None,
            }),
            anthropic: Some(AnthropicConfig {
                api_key: "sk-ant".into(),
                base_url: "http://localhost:2".into(),
                model: Some("claude-x".into()),
            }),
        };
        let provider = build_provider_with_env(&cfg, no_env).unwrap();
        assert_eq!(provider.name(), "router");
    }

    #[test]
    fn env_keys_are_a_fallback() {
        let provider = build_provider_with_env(&ProvidersConfig::default(), |k| {
            (k == "ANTHROPIC_API_KEY").then(|| "sk-ant".to_string())
        })
        .unwrap();
        assert_eq!(provider.name(), "anthropic");
    }

    #[tokio::test]
    async fn unpinned_anthropic_sends_a_claude_model() {
        use serde_json::json;
        use wiremock::matchers::{body_partial_json, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(body_partial_json(json!({ "model": crate::anthropic::DEFAULT_MODEL })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": crate::anthropic::DEFAULT_MODEL,
                "content": [{ "type": "text", "text": "ok" }],
                "usage": { "input_tokens": 1, "output_tokens": 1 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = ProvidersConfig {
            openai: None,
            anthropic: Some(AnthropicConfig {
                api_key: "sk-ant".into(),
                base_url: server.uri(),
                model: None,
            }),
        };
        let provider = build_provider_with_env(&cfg, no_env).unwrap();
        let req = crate::CompletionRequest {
            model: "gpt-4o-mini".into(),
            system: "s".into(),
            prompt: "p".into(),
            max_tokens: 16,
            temperature: 0.0,
        };
        let out = provider.complete(&req).await.unwrap();
        assert_eq!(out.content, "ok");
    }

    #[test]
    fn empty_key_is_ignored() {
        let cfg = ProvidersConfig {
            openai: Some(OpenAiProviderConfig {
                api_key: String::new(),
                base_url: "http://localhost:1".into(),
                model: None,
            }),
            anthropic: None,
        };
        assert!(build_provider_with_env(&cfg, no_env).is_none());
    }
}
