use crate::error::ApiError;
use parley_core::session::{Message, RecordStore, Session};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Orchestrates the single active session for the transport layer.
///
/// `SessionManager` is responsible for:
/// - Resetting the active session
/// - Running user turns one at a time
/// - Browsing stored records
///
/// Turns hold the session lock for their whole duration, including the model
/// call. Record browsing goes straight to the store and never waits on it.
pub struct SessionManager {
    /// The active session; turns are serialized through this lock
    session: Mutex<Session>,
    /// Shared with the session; used directly for listing and loading
    store: Arc<dyn RecordStore>,
}

impl SessionManager {
    /// Creates a new `SessionManager`.
    ///
    /// # Arguments
    ///
    /// * `session` - The session to drive
    /// * `store` - The record store the session persists to
    pub fn new(session: Session, store: Arc<dyn RecordStore>) -> Self {
        Self {
            session: Mutex::new(session),
            store,
        }
    }

    /// Discards the active conversation and starts a new one.
    ///
    /// Waits for an in-flight turn to finish first. The previous record is
    /// left on disk.
    pub async fn create_or_reset_session(&self) {
        let mut session = self.session.lock().await;
        session.reset();
        tracing::info!("Session reset");
    }

    /// Runs one user turn and returns the assistant's reply.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: `text` is empty or whitespace
    /// - `ModelUnavailable`: the model failed; the message stays in context
    /// - `StorageFailure`: the reply was produced but not persisted
    pub async fn handle_user_message(&self, text: &str) -> Result<String, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::invalid_input("user message must not be empty"));
        }

        let mut session = self.session.lock().await;
        session.submit_turn(text).await.map_err(|e| {
            tracing::error!(error = %e, "Turn failed");
            ApiError::from(e)
        })
    }

    /// Lists the identifiers of all stored records.
    pub async fn list_records(&self) -> Result<Vec<String>, ApiError> {
        Ok(self.store.list().await?)
    }

    /// Loads the turns of a stored record.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no record with this identifier
    /// - `StorageFailure`: the record is corrupt
    pub async fn load_record(&self, id: &str) -> Result<Vec<Message>, ApiError> {
        Ok(self.store.load(id).await?)
    }

    /// Identifier of the active session's record, if one exists yet.
    pub async fn active_record_id(&self) -> Option<String> {
        let session = self.session.lock().await;
        session.record().map(|handle| handle.id.clone())
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
