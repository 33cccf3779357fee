//! The active conversation session.

use super::history::History;
use super::message::Role;
use super::naming::{NamingOutcome, NamingPolicy, NamingState};
use super::oracle::ModelOracle;
use super::repository::{RecordHandle, RecordStore};
use crate::error::{ParleyError, Result};
use std::sync::Arc;

/// In-memory conversation state plus the record it is persisted to.
///
/// A session starts with only its system message and no record. The record
/// is created lazily when the first turn is persisted and renamed at most
/// once by the naming policy.
pub struct Session {
    system_prompt: String,
    history: History,
    record: Option<RecordHandle>,
    naming_state: NamingState,
    /// Number of `history.turns()` already written to the record.
    persisted: usize,
    store: Arc<dyn RecordStore>,
    model: Arc<dyn ModelOracle>,
    naming: NamingPolicy,
}

impl Session {
    pub fn new(
        system_prompt: impl Into<String>,
        store: Arc<dyn RecordStore>,
        model: Arc<dyn ModelOracle>,
        naming: NamingPolicy,
    ) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            history: History::new(system_prompt.clone()),
            system_prompt,
            record: None,
            naming_state: NamingState::Unnamed,
            persisted: 0,
            store,
            model,
            naming,
        }
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn record(&self) -> Option<&RecordHandle> {
        self.record.as_ref()
    }

    pub fn naming_state(&self) -> NamingState {
        self.naming_state
    }

    /// Runs one conversational turn and returns the assistant's text.
    ///
    /// # Errors
    ///
    /// - `ParleyError::Model`: the oracle failed; the user message stays in
    ///   the history, nothing is persisted.
    /// - `ParleyError::Storage`: the reply was generated and kept in memory
    ///   but could not be persisted. Unpersisted turns are written by the
    ///   next successful turn.
    pub async fn submit_turn(&mut self, user_text: &str) -> Result<String> {
        self.history.push_human(user_text);

        let reply = self.model.generate(self.history.messages()).await?;
        if reply.role != Role::Assistant {
            return Err(ParleyError::model(format!(
                "model oracle returned a {:?} message",
                reply.role
            )));
        }

        let content = reply.content;
        self.history.push_assistant(content.clone());

        self.persist().await?;
        self.maybe_name().await;

        Ok(content)
    }

    /// Drops the conversation and starts over with only the system message.
    ///
    /// The previous record stays on disk untouched.
    pub fn reset(&mut self) {
        self.history = History::new(self.system_prompt.clone());
        self.record = None;
        self.naming_state = NamingState::Unnamed;
        self.persisted = 0;
    }

    async fn persist(&mut self) -> Result<()> {
        let handle = match &self.record {
            Some(handle) => handle.clone(),
            None => {
                let handle = self.store.create().await?;
                tracing::info!(record_id = %handle.id, "Created conversation record");
                self.record = Some(handle.clone());
                handle
            }
        };

        let pending = &self.history.turns()[self.persisted..];
        self.store.append(&handle, pending).await?;
        tracing::debug!(
            record_id = %handle.id,
            appended = pending.len(),
            "Persisted turns"
        );
        self.persisted = self.history.turns().len();
        Ok(())
    }

    async fn maybe_name(&mut self) {
        if !self
            .naming
            .should_attempt(self.history.len(), self.naming_state)
        {
            return;
        }
        let Some(handle) = self.record.clone() else {
            return;
        };

        match self
            .naming
            .attempt(&self.history, self.store.as_ref(), &handle)
            .await
        {
            NamingOutcome::Renamed(renamed) => {
                tracing::info!(
                    from = %handle.id,
                    to = %renamed.id,
                    "Named conversation record"
                );
                self.record = Some(renamed);
                self.naming_state = NamingState::Named;
            }
            NamingOutcome::Unusable(candidate) => {
                tracing::warn!(
                    record_id = %handle.id,
                    candidate = %candidate,
                    "Naming oracle returned an unusable name"
                );
            }
            NamingOutcome::Failed(e) => {
                tracing::warn!(record_id = %handle.id, error = %e, "Naming failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "model_test.rs"]
mod tests;
