//! LLM provider abstraction used by the scheduler's AI paths.

pub mod anthropic;
pub mod openai;
pub mod provider;
pub mod registry;
pub mod router;

pub use provider::{complete_within, Completion, CompletionRequest, LlmProvider, ProviderError};
pub use registry::build_provider;
pub use router::{ProviderRouter, ProviderSlot};
