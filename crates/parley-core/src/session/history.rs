//! In-memory conversation history.

use super::message::{Message, Role};

/// Ordered message list headed by exactly one system message.
///
/// The system message is fixed at construction; everything else is appended
/// at the tail through [`History::push_human`] and [`History::push_assistant`].
/// Human and assistant messages alternate, so the length is always `1 + 2k`
/// or `1 + 2k + 1` with at most one trailing unanswered human message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    messages: Vec<Message>,
}

impl History {
    /// Creates a history containing only the system message.
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    /// Appends a human message.
    ///
    /// An unanswered human message already at the tail is replaced, so a
    /// retry after a failed turn does not stack up consecutive human messages.
    pub fn push_human(&mut self, content: impl Into<String>) {
        let message = Message::human(content);
        match self.messages.last_mut() {
            Some(last) if last.role == Role::Human => *last = message,
            _ => self.messages.push(message),
        }
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Full history including the system message.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Human/assistant messages only, i.e. what a record may hold.
    pub fn turns(&self) -> &[Message] {
        &self.messages[1..]
    }

    pub fn system(&self) -> &Message {
        &self.messages[0]
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Always false: the system message is never removed.
    pub fn is_empty(&self) -> bool {
        false
    }
}
