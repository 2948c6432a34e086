//! System preamble prepended to every upstream request.

use parley_types::llm::Message;

/// Instruction given to the upstream model ahead of the conversation.
pub const SYSTEM_PREAMBLE: &str = "You are a helpful, detailed voice assistant. \
Provide comprehensive and informative responses in 3-8 sentences. \
Be conversational and engaging while being accurate and helpful. \
Use simple English without markdown formatting.";

/// Build the request message list: preamble first, then the conversation.
pub fn build_messages(history: Vec<Message>) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 1);
    messages.push(Message::system(SYSTEM_PREAMBLE));
    messages.extend(history);
    messages
}
