//! Bounded conversation memory.
//!
//! An ordered buffer of role-tagged messages that is normalized after every
//! append: malformed entries are purged, the buffer is cut down to the most
//! recent `2 * max_turns` entries, and adjacent entries from the same role are
//! merged into one.
//!
//! The memory is an owned value. The orchestrator shares it behind a single
//! [`tokio::sync::Mutex`] ([`SharedMemory`]) so append+normalize and snapshot
//! are each one critical section.

use std::sync::Arc;

use tokio::sync::Mutex;

use parley_types::llm::{Message, MessageRole};

/// Default number of user+assistant pairs retained.
pub const MAX_TURNS: usize = 10;

/// Memory handle shared between the orchestrator and the transport layer.
pub type SharedMemory = Arc<Mutex<ConversationMemory>>;

/// Ordered, bounded buffer of conversation turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    max_turns: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    /// Create an empty memory bounded at [`MAX_TURNS`] pairs.
    pub fn new() -> Self {
        Self::with_max_turns(MAX_TURNS)
    }

    /// Create an empty memory bounded at `max_turns` pairs (minimum 1).
    pub fn with_max_turns(max_turns: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_turns: max_turns.max(1),
        }
    }

    /// Wrap this memory in a [`SharedMemory`] handle.
    pub fn into_shared(self) -> SharedMemory {
        Arc::new(Mutex::new(self))
    }

    /// Maximum number of entries kept after normalization.
    pub fn capacity(&self) -> usize {
        self.max_turns * 2
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a turn. Content that is empty after trimming is ignored.
    ///
    /// Returns whether the turn was stored. Callers must run
    /// [`normalize`](Self::normalize) before the memory is read again;
    /// [`push_turn`](Self::push_turn) does both.
    pub fn append(&mut self, role: MessageRole, content: impl Into<String>) -> bool {
        let content = content.into();
        if content.trim().is_empty() {
            return false;
        }
        self.messages.push(Message { role, content });
        true
    }

    /// Append a turn and normalize in one step.
    pub fn push_turn(&mut self, role: MessageRole, content: impl Into<String>) -> bool {
        let stored = self.append(role, content);
        self.normalize();
        stored
    }

    /// Restore the buffer invariants.
    ///
    /// In order: drop malformed entries, keep the most recent
    /// `capacity()` entries, merge adjacent same-role runs with a single
    /// space. Running it twice is the same as running it once.
    pub fn normalize(&mut self) {
        self.messages.retain(Message::is_well_formed);

        let cap = self.capacity();
        if self.messages.len() > cap {
            let excess = self.messages.len() - cap;
            self.messages.drain(..excess);
        }

        let mut merged: Vec<Message> = Vec::with_capacity(self.messages.len());
        for msg in self.messages.drain(..) {
            match merged.last_mut() {
                Some(last) if last.role == msg.role => {
                    last.content.push(' ');
                    last.content.push_str(&msg.content);
                }
                _ => merged.push(msg),
            }
        }
        self.messages = merged;
    }

    /// Owned copy of the current buffer.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.clone()
    }
}
