use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::provider::{Completion, CompletionRequest, LlmProvider, ProviderError};

/// Pause before retry `n` on the same provider is `n * RETRY_STEP`.
const RETRY_STEP: Duration = Duration::from_millis(200);

/// One provider in the failover chain.
pub struct ProviderSlot {
    pub provider: Box<dyn LlmProvider>,
    /// Extra attempts on transient failures before moving on.
    pub max_retries: u32,
}

impl ProviderSlot {
    pub fn new(provider: Box<dyn LlmProvider>, max_retries: u32) -> Self {
        Self {
            provider,
            max_retries,
        }
    }

    async fn attempt(&self, req: &CompletionRequest) -> Result<Completion, ProviderError> {
        let name = self.provider.name();
        let mut attempt = 0;
        loop {
            let err = match self.provider.complete(req).await {
                Ok(out) => return Ok(out),
                Err(e) => e,
            };
            warn!(provider = %name, attempt, err = %err, "provider request failed");
            if attempt >= self.max_retries || !is_transient(&err) {
                return Err(err);
            }
            attempt += 1;
            tokio::time::sleep(RETRY_STEP * attempt).await;
        }
    }
}

/// Network failures and 5xx answers may succeed on a second try. Rate
/// limits, rejected requests and unparseable replies go straight to the
/// next provider.
fn is_transient(err: &ProviderError) -> bool {
    match err {
        ProviderError::Http(_) => true,
        ProviderError::Api { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Tries each slot in declaration order and returns the first success.
pub struct ProviderRouter {
    slots: Vec<ProviderSlot>,
}

impl ProviderRouter {
    /// An empty router answers every request with `Unavailable`.
    pub fn new(slots: Vec<ProviderSlot>) -> Self {
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[async_trait]
impl LlmProvider for ProviderRouter {
    fn name(&self) -> &str {
        "router"
    }

    async fn complete(&self, req: &CompletionRequest) -> Result<Completion, ProviderError> {
        if self.is_empty() {
            return Err(ProviderError::Unavailable("no providers in chain".to_string()));
        }

        let mut last_err = None;
        for (i, slot) in self.slots.iter().enumerate() {
            match slot.attempt(req).await {
                Ok(out) => {
                    if i > 0 {
                        info!(provider = %slot.provider.name(), slot = i, "served by fallback provider");
                    }
                    return Ok(out);
                }
                Err(e) => {
                    let remaining = self.len() - i - 1;
                    if remaining > 0 {
                        info!(provider = %slot.provider.name(), remaining, "moving to next provider");
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ProviderError::Unavailable("all providers failed".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct AlwaysFail;

    #[async_trait]
    impl LlmProvider for AlwaysFail {
        fn name(&self) -> &str {
            "always-fail"
        }
        async fn complete(&self, _req: &CompletionRequest) -> Result<Completion, ProviderError> {
            Err(ProviderError::Unavailable("intentional failure".to_string()))
        }
    }

    struct AlwaysOk;

    #[async_trait]
    impl LlmProvider for AlwaysOk {
        fn name(&self) -> &str {
            "always-ok"
        }
        async fn complete(&self, req: &CompletionRequest) -> Result<Completion, ProviderError> {
            Ok(Completion {
                content: "ok".to_string(),
                model: req.model.clone(),
                tokens_in: 1,
                tokens_out: 1,
            })
        }
    }

    struct RateLimited(Arc<AtomicU32>);

    #[async_trait]
    impl LlmProvider for RateLimited {
        fn name(&self) -> &str {
            "rate-limited"
        }
        async fn complete(&self, _req: &CompletionRequest) -> Result<Completion, ProviderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::RateLimited {
                retry_after_ms: 1000,
            })
        }
    }

    fn dummy_request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            system: "You are a test.".to_string(),
            prompt: "hello".to_string(),
            max_tokens: 64,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn router_falls_back_to_second_provider() {
        let router = ProviderRouter::new(vec![
            ProviderSlot::new(Box::new(AlwaysFail), 0),
            ProviderSlot::new(Box::new(AlwaysOk), 0),
        ]);

        let result = router.complete(&dummy_request()).await;
        assert!(result.is_ok());
        assert_eq!(result.unwrap().content, "ok");
    }

    #[tokio::test]
    async fn router_errors_when_all_fail() {
        let router = ProviderRouter::new(vec![
            ProviderSlot::new(Box::new(AlwaysFail), 0),
            ProviderSlot::new(Box::new(AlwaysFail), 0),
        ]);

        let result = router.complete(&dummy_request()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn rate_limit_skips_remaining_retries() {
        let calls = Arc::new(AtomicU32::new(0));
        let router = ProviderRouter::new(vec![
            ProviderSlot::new(Box::new(RateLimited(calls.clone())), 3),
            ProviderSlot::new(Box::new(AlwaysOk), 0),
        ]);

        let result = router.complete(&dummy_request()).await;
        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    struct Status(u16, Arc<AtomicU32>);

    #[async_trait]
    impl LlmProvider for Status {
        fn name(&self) -> &str {
            "status"
        }
        async fn complete(&self, _req: &CompletionRequest) -> Result<Completion, ProviderError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Api {
                status: self.0,
                message: "nope".into(),
            })
        }
    }

    #[tokio::test]
    async fn only_server_errors_are_retried() {
        let rejected = Arc::new(AtomicU32::new(0));
        let router = ProviderRouter::new(vec![ProviderSlot::new(
            Box::new(Status(401, rejected.clone())),
            2,
        )]);
        assert!(router.complete(&dummy_request()).await.is_err());
        assert_eq!(rejected.load(Ordering::SeqCst), 1);

        let flaky = Arc::new(AtomicU32::new(0));
        let router = ProviderRouter::new(vec![ProviderSlot::new(
            Box::new(Status(503, flaky.clone())),
            1,
        )]);
        let err = router.complete(&dummy_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { status: 503, .. }));
        assert_eq!(flaky.load(Ordering::SeqCst), 2);
        assert_eq!(router.len(), 1);
    }

    #[tokio::test]
    async fn empty_router_is_unavailable() {
        let router = ProviderRouter::new(Vec::new());
        assert!(router.is_empty());
        let err = router.complete(&dummy_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable(_)));
    }
}
