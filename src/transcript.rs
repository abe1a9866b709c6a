//! Append-only conversation transcript with a fixed system seed.

use crate::types::{Message, Role};

/// Ordered chat history.
///
/// Always starts with exactly one system message. Messages are only ever
/// appended; the sole other mutation is [`Transcript::reset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create a transcript seeded with `system_prompt`.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Drop everything except the seed system message.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// All messages in turn order, seed included.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false for a seeded transcript.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The seed system message.
    pub fn seed(&self) -> &Message {
        &self.messages[0]
    }

    /// Messages shown to the user (system messages hidden).
    pub fn visible(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}
