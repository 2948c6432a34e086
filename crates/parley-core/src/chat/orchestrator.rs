//! Response orchestration.
//!
//! Both entry points share one state machine:
//!
//! 1. Reject blank input. Otherwise record the user turn, then reject input
//!    over the length limit (the turn stays recorded).
//! 2. Build the request: system preamble + memory snapshot.
//! 3. Call the upstream adapter with the entry point's token budget.
//! 4. Substitute the fallback responder's reply when the adapter returns empty.
//! 5. Record the assistant turn.
//! 6. Return the text, or hand it to the [`StreamChunker`].
//!
//! The assistant turn is recorded before any fragment is produced, so a
//! consumer that stops reading mid-stream cannot leave memory half-updated.

use tracing::{Instrument, info_span};

use parley_types::chat::{ChatReply, ReplySource};
use parley_types::llm::MessageRole;

use super::chunker::StreamChunker;
use super::fallback::FallbackResponder;
use super::memory::SharedMemory;
use super::prompt::build_messages;
use super::upstream::UpstreamClient;

/// Reply to blank input.
pub const EMPTY_INPUT_REPLY: &str = "Please say or type something.";

/// Default maximum accepted input length, in characters.
pub const MAX_INPUT_CHARS: usize = 1000;

/// Tunables for the two entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Inputs longer than this many characters are rejected.
    pub max_input_chars: usize,
    /// `max_tokens` for the whole-response entry point.
    pub whole_max_tokens: u32,
    /// `max_tokens` for the streaming entry point.
    pub stream_max_tokens: u32,
    pub temperature: f64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_input_chars: MAX_INPUT_CHARS,
            whole_max_tokens: 800,
            stream_max_tokens: 600,
            temperature: 0.4,
        }
    }
}

impl OrchestratorConfig {
    /// Reply to input over the length limit.
    pub fn too_long_reply(&self) -> String {
        format!(
            "Your message is too long. Please keep it under {} characters.",
            self.max_input_chars
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryPoint {
    Whole,
    Stream,
}

impl EntryPoint {
    fn label(self) -> &'static str {
        match self {
            EntryPoint::Whole => "chat",
            EntryPoint::Stream => "chat_stream",
        }
    }
}

/// Composes memory, upstream adapter and fallback responder into replies.
#[derive(Debug)]
pub struct ResponseOrchestrator {
    memory: SharedMemory,
    upstream: UpstreamClient,
    fallback: FallbackResponder,
    config: OrchestratorConfig,
}

impl ResponseOrchestrator {
    pub fn new(memory: SharedMemory, upstream: UpstreamClient) -> Self {
        Self {
            memory,
            upstream,
            fallback: FallbackResponder::new(),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Whole-response entry point.
    pub async fn respond(&self, text: &str) -> String {
        self.respond_detailed(text).await.text
    }

    /// Whole-response entry point, with the reply's provenance.
    pub async fn respond_detailed(&self, text: &str) -> ChatReply {
        self.run(text, EntryPoint::Whole).await
    }

    /// Streaming entry point. Memory is fully updated before this returns.
    ///
    /// Rejection messages are streamed as one fragment; replies are chunked.
    pub async fn respond_stream(&self, text: &str) -> StreamChunker {
        let reply = self.run(text, EntryPoint::Stream).await;
        match reply.source {
            ReplySource::Rejected => StreamChunker::notice(&reply.text),
            ReplySource::Upstream | ReplySource::Fallback => StreamChunker::new(&reply.text),
        }
    }

    async fn run(&self, text: &str, entry: EntryPoint) -> ChatReply {
        let span = info_span!("chat.respond", entry = entry.label());
        self.run_inner(text, entry).instrument(span).await
    }

    async fn run_inner(&self, text: &str, entry: EntryPoint) -> ChatReply {
        let text = text.trim();
        if text.is_empty() {
            return ChatReply::new(EMPTY_INPUT_REPLY, ReplySource::Rejected);
        }

        let history = {
            let mut memory = self.memory.lock().await;
            memory.push_turn(MessageRole::User, text);
            if text.chars().count() > self.config.max_input_chars {
                tracing::info!(
                    chars = text.chars().count(),
                    limit = self.config.max_input_chars,
                    "input rejected: too long"
                );
                return ChatReply::new(self.config.too_long_reply(), ReplySource::Rejected);
            }
            memory.snapshot()
        };

        let preview: String = text.chars().take(200).collect();
        tracing::info!(user = %preview, "user turn");

        let max_tokens = match entry {
            EntryPoint::Whole => self.config.whole_max_tokens,
            EntryPoint::Stream => self.config.stream_max_tokens,
        };
        let messages = build_messages(history);
        let upstream_text = self
            .upstream
            .complete(&messages, max_tokens, self.config.temperature)
            .await;

        let reply = if upstream_text.is_empty() {
            ChatReply::new(self.fallback.reply(text), ReplySource::Fallback)
        } else {
            ChatReply::new(upstream_text, ReplySource::Upstream)
        };

        self.memory
            .lock()
            .await
            .push_turn(MessageRole::Assistant, reply.text.as_str());

        tracing::info!(
            source = %reply.source,
            reply_chars = reply.text.chars().count(),
            "assistant turn"
        );
        reply
    }
}
