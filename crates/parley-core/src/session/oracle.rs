//! Contracts for the external generation services.
//!
//! The session core never talks to a model directly; it calls these traits and
//! lets the interaction layer decide how the request reaches a provider.

use super::message::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Failure reported by an oracle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The provider request failed or returned a non-success status.
    #[error("request failed{}: {message}", status_suffix(.status))]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// The provider answered without any usable text.
    #[error("empty response from provider")]
    EmptyResponse,

    /// The oracle could not be set up (e.g. missing API key).
    #[error("oracle misconfigured: {0}")]
    Config(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

/// Produces the assistant reply for a conversation.
#[async_trait]
pub trait ModelOracle: Send + Sync {
    /// Generates the next message for `history` (system message first).
    ///
    /// Implementations must return a message with role `Assistant`.
    async fn generate(&self, history: &[Message]) -> Result<Message, OracleError>;
}

/// Suggests a human-readable name for a conversation.
#[async_trait]
pub trait NamingOracle: Send + Sync {
    /// Returns a candidate name; an empty string means "no name yet".
    async fn suggest_name(&self, history: &[Message]) -> Result<String, OracleError>;
}
