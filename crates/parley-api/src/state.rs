//! Application state shared by the CLI commands and HTTP handlers.
//!
//! Owns the one process-wide [`ResponseOrchestrator`] (and through it the
//! shared conversation memory and upstream adapter) plus the resolved
//! upstream configuration used for status reporting.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use parley_core::chat::memory::ConversationMemory;
use parley_core::chat::orchestrator::ResponseOrchestrator;
use parley_infra::config::{UpstreamConfig, build_upstream_client};
use parley_types::llm::Message;

/// Token budget for the upstream probe call.
pub const PROBE_MAX_TOKENS: u32 = 5;

/// Deterministic sampling for the probe.
pub const PROBE_TEMPERATURE: f64 = 0.0;

/// Characters of the probe reply echoed back in the status.
pub const PROBE_SAMPLE_CHARS: usize = 50;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ResponseOrchestrator>,
    pub upstream_config: Arc<UpstreamConfig>,
    pub web_dir: PathBuf,
}

/// Upstream configuration status, with the probe outcome when configured.
#[derive(Debug, Clone, Serialize)]
pub struct UpstreamStatus {
    pub provider: String,
    pub model: String,
    pub api_key_present: bool,
    pub api_key_format_valid: bool,
    pub client_initialized: bool,
    pub using_fallback: bool,
    pub conversation_memory_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_ok: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_sample: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probe_error: Option<String>,
}

impl AppState {
    /// Wire the memory, upstream adapter and orchestrator from configuration.
    pub fn init(config: UpstreamConfig, max_turns: usize, web_dir: PathBuf) -> Self {
        let memory = ConversationMemory::with_max_turns(max_turns).into_shared();
        let upstream = build_upstream_client(&config);
        Self::new(ResponseOrchestrator::new(memory, upstream), config, web_dir)
    }

    pub fn new(
        orchestrator: ResponseOrchestrator,
        upstream_config: UpstreamConfig,
        web_dir: PathBuf,
    ) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            upstream_config: Arc::new(upstream_config),
            web_dir,
        }
    }

    /// Report upstream status. When the adapter is configured a short probe
    /// completion is sent; it does not touch conversation memory.
    pub async fn upstream_status(&self) -> UpstreamStatus {
        let upstream = self.orchestrator.upstream();
        let client_initialized = upstream.is_configured();
        let conversation_memory_size = self.orchestrator.memory().lock().await.len();

        let mut status = UpstreamStatus {
            provider: upstream
                .provider_name()
                .unwrap_or(self.upstream_config.provider_name())
                .to_string(),
            model: self.upstream_config.model.clone(),
            api_key_present: self.upstream_config.has_api_key(),
            api_key_format_valid: self.upstream_config.key_format_valid(),
            client_initialized,
            using_fallback: !client_initialized,
            conversation_memory_size,
            probe_ok: None,
            probe_sample: None,
            probe_error: None,
        };

        if client_initialized {
            let messages = [
                Message::system("You are a helpful assistant."),
                Message::user("Reply with OK."),
            ];
            match upstream
                .try_complete(&messages, PROBE_MAX_TOKENS, PROBE_TEMPERATURE)
                .await
            {
                Ok(reply) => {
                    status.probe_ok = Some(true);
                    status.probe_sample = Some(reply.chars().take(PROBE_SAMPLE_CHARS).collect());
                }
                Err(e) => {
                    tracing::warn!(kind = e.kind(), "upstream probe failed: {e}");
                    status.probe_ok = Some(false);
                    status.probe_error = Some(e.to_string());
                }
            }
        }

        status
    }
}
