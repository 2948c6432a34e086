//! Upstream client adapter.
//!
//! Validates a completion call, invokes the configured provider once, and
//! verifies the response. Internally every outcome is a
//! `Result<String, UpstreamError>`; [`UpstreamClient::complete`] collapses
//! failures to the empty string, which callers treat as "fall back".
//!
//! There is no retry loop. A failed call is absorbed one layer up by the
//! fallback responder.

use tracing::field::Empty;
use tracing::{Instrument, info_span};

use parley_observe::genai_attrs;

use parley_types::error::UpstreamError;
use parley_types::llm::{CompletionRequest, Message};

use crate::llm::box_provider::BoxLlmProvider;
use crate::llm::provider::LlmProvider;

/// Inclusive temperature range accepted by the adapter.
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// Adapter around an optional upstream provider.
///
/// An adapter without a provider is "unconfigured": every call returns
/// empty immediately without touching the network.
#[derive(Debug, Default)]
pub struct UpstreamClient {
    provider: Option<BoxLlmProvider>,
}

impl UpstreamClient {
    /// An adapter that always degrades to the fallback path.
    pub fn unconfigured() -> Self {
        Self { provider: None }
    }

    pub fn new(provider: BoxLlmProvider) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// Wrap a concrete provider.
    pub fn from_provider<T: LlmProvider + 'static>(provider: T) -> Self {
        Self::new(BoxLlmProvider::new(provider))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name())
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.model())
    }

    /// Run one completion and return the trimmed reply text.
    ///
    /// Preconditions are checked before any network call: the client is
    /// configured, `messages` is non-empty, `max_tokens > 0` and
    /// `temperature` lies in `0..=2`. Messages with blank content are
    /// dropped; if none remain the call is not made.
    pub async fn try_complete(
        &self,
        messages: &[Message],
        max_tokens: u32,
        temperature: f64,
    ) -> Result<String, UpstreamError> {
        let provider = self.provider.as_ref().ok_or(UpstreamError::Unconfigured)?;

        if messages.is_empty() {
            return Err(UpstreamError::EmptyMessages);
        }
        if max_tokens == 0 {
            return Err(UpstreamError::InvalidMaxTokens(max_tokens));
        }
        if !TEMPERATURE_RANGE.contains(&temperature) {
            return Err(UpstreamError::InvalidTemperature(temperature));
        }

        let payload: Vec<Message> = messages
            .iter()
            .filter(|m| m.is_well_formed())
            .cloned()
            .collect();
        if payload.is_empty() {
            return Err(UpstreamError::EmptyMessages);
        }

        let request = CompletionRequest {
            model: String::new(),
            messages: payload,
            max_tokens,
            temperature,
        };

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.operation.name = genai_attrs::OP_CHAT,
            gen_ai.provider.name = provider.name(),
            gen_ai.request.model = provider.model(),
            gen_ai.request.max_tokens = max_tokens,
            gen_ai.request.temperature = temperature,
            gen_ai.response.id = Empty,
            gen_ai.response.finish_reasons = Empty,
            gen_ai.usage.input_tokens = Empty,
            gen_ai.usage.output_tokens = Empty,
        );

        let response = provider
            .complete(&request)
            .instrument(span.clone())
            .await?;

        span.record(genai_attrs::GEN_AI_RESPONSE_ID, response.id.as_str());
        span.record(
            genai_attrs::GEN_AI_RESPONSE_FINISH_REASONS,
            tracing::field::display(&response.stop_reason),
        );
        span.record(
            genai_attrs::GEN_AI_USAGE_INPUT_TOKENS,
            response.usage.input_tokens,
        );
        span.record(
            genai_attrs::GEN_AI_USAGE_OUTPUT_TOKENS,
            response.usage.output_tokens,
        );

        let text = response
            .content
            .as_deref()
            .map(str::trim)
            .unwrap_or_default();
        if text.is_empty() {
            return Err(UpstreamError::EmptyResponse);
        }

        tracing::debug!(
            response_id = %response.id,
            stop_reason = %response.stop_reason,
            output_tokens = response.usage.output_tokens,
            "upstream completion accepted"
        );
        Ok(text.to_string())
    }

    /// Run one completion; any failure becomes the empty string.
    pub async fn complete(&self, messages: &[Message], max_tokens: u32, temperature: f64) -> String {
        match self.try_complete(messages, max_tokens, temperature).await {
            Ok(text) => text,
            Err(UpstreamError::Unconfigured) => String::new(),
            Err(err) if err.is_precondition() => {
                tracing::warn!(
                    kind = err.kind(),
                    max_tokens,
                    temperature,
                    "upstream call skipped: {err}"
                );
                String::new()
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), "upstream call failed: {err}");
                String::new()
            }
        }
    }
}
