//! Configuration types and per-provider defaults for OpenAI-compatible
//! upstreams.
//!
//! Each upstream that speaks the OpenAI chat completions protocol gets a
//! factory function returning an [`OpenAiCompatConfig`] with the correct base
//! URL and limits.

use std::time::Duration;

use secrecy::SecretString;

use parley_types::llm::ProviderCapabilities;

/// Groq's OpenAI-compatible endpoint.
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default Groq model.
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Default per-request HTTP timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for an OpenAI-compatible upstream provider.
///
/// Used to construct an [`super::OpenAiCompatibleProvider`].
pub struct OpenAiCompatConfig {
    /// Human-readable provider name (e.g., "groq", "openai").
    pub provider_name: String,
    /// Base URL for the API (e.g., "https://api.groq.com/openai/v1").
    pub base_url: String,
    /// API key for authentication.
    pub api_key: SecretString,
    /// Model identifier (e.g., "llama-3.1-8b-instant").
    pub model: String,
    /// Per-request deadline enforced by the HTTP client.
    pub timeout: Duration,
    pub capabilities: ProviderCapabilities,
}

/// Groq default configuration.
///
/// Base URL: `https://api.groq.com/openai/v1`
/// Limits: 128K context, 8K output.
pub fn groq_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "groq".into(),
        base_url: GROQ_BASE_URL.into(),
        api_key,
        model: model.into(),
        timeout: DEFAULT_TIMEOUT,
        capabilities: ProviderCapabilities {
            max_context_tokens: 131_072,
            max_output_tokens: 8_192,
        },
    }
}

/// OpenAI default configuration.
///
/// Base URL: `https://api.openai.com/v1`
/// Limits: 128K context, 16K output.
pub fn openai_defaults(api_key: SecretString, model: &str) -> OpenAiCompatConfig {
    OpenAiCompatConfig {
        provider_name: "openai".into(),
        base_url: "https://api.openai.com/v1".into(),
        api_key,
        model: model.into(),
        timeout: DEFAULT_TIMEOUT,
        capabilities: ProviderCapabilities {
            max_context_tokens: 128_000,
            max_output_tokens: 16_384,
        },
    }
}

/// Infer a provider name from a base URL, for log and health output.
pub fn provider_name_for_url(base_url: &str) -> &'static str {
    if base_url.contains("groq.com") {
        "groq"
    } else if base_url.contains("openai.com") {
        "openai"
    } else {
        "openai_compatible"
    }
}
