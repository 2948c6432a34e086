//! LlmProvider trait definition.
//!
//! This is the core abstraction that upstream providers implement.
//! Uses RPITIT for `complete`; [`super::box_provider::BoxLlmProvider`]
//! erases the concrete type for runtime selection.

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError, ProviderCapabilities};

/// Trait for upstream chat-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in parley-infra (e.g., `OpenAiCompatibleProvider`)
/// and in tests as scripted mocks.
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "groq", "openai").
    fn name(&self) -> &str;

    /// Model identifier used when the request does not override it.
    fn model(&self) -> &str;

    /// Context and output limits of the configured model.
    fn capabilities(&self) -> &ProviderCapabilities;

    /// Send a completion request and receive the full response.
    ///
    /// Single attempt: implementations must not retry internally.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
