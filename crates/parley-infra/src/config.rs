//! Upstream configuration and adapter construction.
//!
//! [`UpstreamConfig`] is the resolved view of the `GROQ_*` and
//! `PARLEY_REQUEST_TIMEOUT_SECS` settings. [`build_upstream_client`] turns it
//! into an [`UpstreamClient`]: configured when a key is present and the
//! provider builds, unconfigured (fallback mode) otherwise.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use parley_core::chat::upstream::UpstreamClient;
use parley_types::llm::ProviderCapabilities;

use crate::llm::openai_compat::OpenAiCompatibleProvider;
use crate::llm::openai_compat::config::{
    self as compat, DEFAULT_TIMEOUT, GROQ_BASE_URL, GROQ_DEFAULT_MODEL, OpenAiCompatConfig,
};

/// Prefix every well-formed Groq key carries.
pub const GROQ_KEY_PREFIX: &str = "gsk_";

/// Resolved upstream settings.
///
/// Does NOT derive Debug; the key is only reachable through
/// [`ExposeSecret`].
pub struct UpstreamConfig {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GROQ_DEFAULT_MODEL.to_string(),
            base_url: GROQ_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl UpstreamConfig {
    /// Build a config; a missing or whitespace-only key means "no key".
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let api_key = api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::from);
        Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Whether the key looks like a Groq key. `false` when there is no key.
    pub fn key_format_valid(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| k.expose_secret().starts_with(GROQ_KEY_PREFIX))
    }

    /// Provider name inferred from the base URL.
    pub fn provider_name(&self) -> &'static str {
        compat::provider_name_for_url(&self.base_url)
    }

    fn compat_config(&self, api_key: SecretString) -> OpenAiCompatConfig {
        let mut config = match self.provider_name() {
            "groq" => compat::groq_defaults(api_key, &self.model),
            "openai" => compat::openai_defaults(api_key, &self.model),
            name => OpenAiCompatConfig {
                provider_name: name.to_string(),
                base_url: String::new(),
                api_key,
                model: self.model.clone(),
                timeout: DEFAULT_TIMEOUT,
                capabilities: ProviderCapabilities {
                    max_context_tokens: 8_192,
                    max_output_tokens: 4_096,
                },
            },
        };
        config.base_url = self.base_url.clone();
        config.timeout = self.timeout;
        config
    }
}

/// Construct the upstream adapter for `config`.
///
/// Never fails: a missing key or a provider that cannot be built yields an
/// unconfigured adapter, and the service runs in fallback mode.
pub fn build_upstream_client(config: &UpstreamConfig) -> UpstreamClient {
    let Some(api_key) = config.api_key.as_ref() else {
        tracing::info!("GROQ_API_KEY not set, running in fallback mode");
        return UpstreamClient::unconfigured();
    };

    if config.provider_name() == "groq" && !config.key_format_valid() {
        tracing::warn!(
            "GROQ_API_KEY does not start with '{GROQ_KEY_PREFIX}'; requests will likely be rejected"
        );
    }

    let api_key = SecretString::from(api_key.expose_secret());
    match OpenAiCompatibleProvider::new(config.compat_config(api_key)) {
        Ok(provider) => {
            tracing::info!(
                provider = config.provider_name(),
                model = %config.model,
                base_url = %config.base_url,
                timeout_secs = config.timeout.as_secs(),
                "upstream client configured"
            );
            UpstreamClient::from_provider(provider)
        }
        Err(e) => {
            tracing::warn!("failed to initialise upstream client, using fallback: {e}");
            UpstreamClient::unconfigured()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(key: Option<&str>) -> UpstreamConfig {
        UpstreamConfig::new(
            key.map(str::to_string),
            GROQ_DEFAULT_MODEL,
            GROQ_BASE_URL,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_blank_key_is_absent() {
        assert!(!config(None).has_api_key());
        assert!(!config(Some("")).has_api_key());
        assert!(!config(Some("   ")).has_api_key());
        assert!(config(Some("gsk_abc")).has_api_key());
    }

    #[test]
    fn test_key_format() {
        assert!(config(Some("gsk_abc")).key_format_valid());
        assert!(config(Some("  gsk_abc  ")).key_format_valid());
        assert!(!config(Some("sk-abc")).key_format_valid());
        assert!(!config(None).key_format_valid());
    }

    #[test]
    fn test_default_points_at_groq() {
        let config = UpstreamConfig::default();
        assert_eq!(config.provider_name(), "groq");
        assert_eq!(config.model, "llama-3.1-8b-instant");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_compat_config_keeps_overrides() {
        let config = UpstreamConfig::new(
            Some("key".into()),
            "local-model",
            "http://localhost:8080/v1",
            Duration::from_secs(7),
        );
        let compat = config.compat_config(SecretString::from("key"));
        assert_eq!(compat.provider_name, "openai_compatible");
        assert_eq!(compat.base_url, "http://localhost:8080/v1");
        assert_eq!(compat.model, "local-model");
        assert_eq!(compat.timeout, Duration::from_secs(7));
    }

    #[test]
    fn test_build_without_key_is_unconfigured() {
        let client = build_upstream_client(&config(None));
        assert!(!client.is_configured());
    }

    #[test]
    fn test_build_failure_falls_back_to_unconfigured() {
        let config = UpstreamConfig::new(
            Some("gsk_abc".into()),
            GROQ_DEFAULT_MODEL,
            "not a url",
            Duration::from_secs(5),
        );
        assert!(config.has_api_key());
        assert!(!build_upstream_client(&config).is_configured());
    }

    #[test]
    fn test_build_with_key_is_configured() {
        // A malformed key still configures the client; only a warning is logged.
        let client = build_upstream_client(&config(Some("not-a-groq-key")));
        assert!(client.is_configured());
        assert_eq!(client.provider_name(), Some("groq"));
        assert_eq!(client.model(), Some("llama-3.1-8b-instant"));
    }
}
