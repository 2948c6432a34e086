use thiserror::Error;

use crate::llm::LlmError;

/// Why the upstream adapter produced no usable text.
///
/// Callers outside the adapter only ever see the collapsed empty string;
/// this type exists so the failure kind can be logged and asserted on.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream client is not configured")]
    Unconfigured,

    #[error("no well-formed messages to send")]
    EmptyMessages,

    #[error("invalid max_tokens: {0} (must be > 0)")]
    InvalidMaxTokens(u32),

    #[error("invalid temperature: {0} (must be within 0..=2)")]
    InvalidTemperature(f64),

    #[error("upstream returned no usable content")]
    EmptyResponse,

    #[error(transparent)]
    Provider(#[from] LlmError),
}

impl UpstreamError {
    /// Short machine-readable kind, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Unconfigured => "unconfigured",
            UpstreamError::EmptyMessages => "empty_messages",
            UpstreamError::InvalidMaxTokens(_) => "invalid_max_tokens",
            UpstreamError::InvalidTemperature(_) => "invalid_temperature",
            UpstreamError::EmptyResponse => "empty_response",
            UpstreamError::Provider(_) => "provider",
        }
    }

    /// Whether the request was rejected before any network call.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            UpstreamError::Unconfigured
                | UpstreamError::EmptyMessages
                | UpstreamError::InvalidMaxTokens(_)
                | UpstreamError::InvalidTemperature(_)
        )
    }
}

/// Unexpected failures inside an orchestration entry point.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("orchestration task failed: {0}")]
    TaskFailed(String),

    #[error("internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_kinds() {
        assert_eq!(UpstreamError::Unconfigured.kind(), "unconfigured");
        assert_eq!(
            UpstreamError::Provider(LlmError::RateLimited).kind(),
            "provider"
        );
    }

    #[test]
    fn test_precondition_classification() {
        assert!(UpstreamError::InvalidTemperature(2.5).is_precondition());
        assert!(UpstreamError::InvalidMaxTokens(0).is_precondition());
        assert!(!UpstreamError::EmptyResponse.is_precondition());
        assert!(!UpstreamError::Provider(LlmError::AuthenticationFailed).is_precondition());
    }

    #[test]
    fn test_provider_error_is_transparent() {
        let err: UpstreamError = LlmError::Overloaded("busy".into()).into();
        assert_eq!(err.to_string(), "provider overloaded: busy");
    }
}
