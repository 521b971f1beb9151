use folha_llm::{Message, MessageKind, ToolCall};
use serde::{Deserialize, Serialize};

/// Concatenate a node's delta onto the log
///
/// The log only grows: `delta` lands after `current` in emission order, with
/// no deduplication and no reordering.
pub fn append_messages(mut current: Vec<Message>, delta: Vec<Message>) -> Vec<Message> {
    current.extend(delta);
    current
}

/// Shared state handed from node to node during a turn
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Merge a node's output through the reducer
    pub fn apply(&mut self, delta: Vec<Message>) {
        let current = std::mem::take(&mut self.messages);
        self.messages = append_messages(current, delta);
    }

    pub fn push_human(&mut self, content: impl Into<String>) {
        self.apply(vec![Message::human(content)]);
    }

    /// Messages appended after the first `len` entries
    pub fn messages_since(&self, len: usize) -> &[Message] {
        self.messages.get(len..).unwrap_or(&[])
    }

    pub fn ai_message_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.kind() == MessageKind::AI)
            .count()
    }

    /// Tool calls carried by the last message, if it is an AI message
    pub fn pending_tool_calls(&self) -> &[ToolCall] {
        self.last_message().map(Message::tool_calls).unwrap_or(&[])
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        !self.pending_tool_calls().is_empty()
    }
}
