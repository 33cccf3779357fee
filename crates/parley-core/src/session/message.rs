//! Conversation message types.
//!
//! This module contains the typed message value exchanged with the oracles and
//! written to conversation records.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
///
/// The serialized name doubles as the `type` tag of the persisted record
/// format, so unknown tags are rejected at decode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Persona/instructions message heading every history.
    #[serde(rename = "SystemMessage")]
    System,
    /// Message from the user.
    #[serde(rename = "HumanMessage")]
    Human,
    /// Message from the AI assistant.
    #[serde(rename = "AIMessage")]
    Assistant,
}

/// A single immutable message in a conversation history.
///
/// Serializes as `{"type": "HumanMessage", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Message {
    /// The role of the message sender.
    #[serde(rename = "type")]
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(Role::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}
