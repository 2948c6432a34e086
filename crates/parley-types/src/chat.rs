//! Conversation pipeline types: stream fragments, the end-of-stream sentinel,
//! and the detailed reply returned by the orchestrator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Wire marker that terminates a fragment stream.
pub const DONE_SENTINEL: &str = "[DONE]";

/// One ordered unit of a streamed reply's text.
///
/// Serializes as `{"token": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub token: String,
}

impl Fragment {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// An item of a reply stream: either a fragment or the terminal sentinel.
///
/// The sentinel is not a fragment; it is emitted exactly once, last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamItem {
    Fragment(Fragment),
    Done,
}

impl StreamItem {
    pub fn is_done(&self) -> bool {
        matches!(self, StreamItem::Done)
    }
}

/// Where a reply's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    /// The upstream completion service produced the text.
    Upstream,
    /// The local fallback responder produced the text.
    Fallback,
    /// The input failed validation and a canned message was returned.
    Rejected,
}

impl fmt::Display for ReplySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplySource::Upstream => write!(f, "upstream"),
            ReplySource::Fallback => write!(f, "fallback"),
            ReplySource::Rejected => write!(f, "rejected"),
        }
    }
}

/// A finished reply together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
}

impl ChatReply {
    pub fn new(text: impl Into<String>, source: ReplySource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}
