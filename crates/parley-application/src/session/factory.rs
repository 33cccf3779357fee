use super::SessionManager;
use parley_core::ParleyError;
use parley_core::config::ParleyConfig;
use parley_core::session::{ModelOracle, NamingOracle, NamingPolicy, RecordStore, Session};
use parley_infrastructure::JsonRecordStore;
use parley_interaction::{GeminiClient, GeminiModelOracle, GeminiNamingOracle};
use std::sync::Arc;
use std::time::Duration;

/// Factory for wiring a [`SessionManager`] from configuration.
///
/// This factory owns the decisions about which store and which oracles back a
/// session, so the transport layer only ever sees the manager.
pub struct SessionFactory {
    config: ParleyConfig,
}

impl SessionFactory {
    /// Creates a new SessionFactory.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved application configuration
    pub fn new(config: ParleyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// Builds a manager backed by the Gemini API.
    ///
    /// The same client serves both the conversation and the naming requests.
    ///
    /// # Errors
    ///
    /// Returns `ParleyError::Config` if the API key variable is unset or the
    /// HTTP client cannot be built.
    pub fn create_manager(&self) -> Result<SessionManager, ParleyError> {
        let model_config = &self.config.model;
        let client = GeminiClient::from_env(&model_config.api_key_env, &model_config.name)
            .and_then(|client| client.with_timeout(Duration::from_secs(model_config.timeout_secs)))
            .map_err(|e| ParleyError::config(e.to_string()))?;

        tracing::info!(model = %client.model(), "Using Gemini model");

        Ok(self.create_manager_with(
            Arc::new(GeminiModelOracle::new(client.clone())),
            Arc::new(GeminiNamingOracle::new(client)),
        ))
    }

    /// Builds a manager around caller-supplied oracles.
    ///
    /// # Arguments
    ///
    /// * `model` - Oracle producing assistant replies
    /// * `namer` - Oracle proposing record names
    pub fn create_manager_with(
        &self,
        model: Arc<dyn ModelOracle>,
        namer: Arc<dyn NamingOracle>,
    ) -> SessionManager {
        let store: Arc<dyn RecordStore> =
            Arc::new(JsonRecordStore::new(&self.config.storage.records_dir));
        let naming =
            NamingPolicy::new(namer).with_max_name_len(self.config.naming.max_name_len);
        let session = Session::new(
            self.config.model.system_prompt.clone(),
            store.clone(),
            model,
            naming,
        );

        tracing::debug!(
            records_dir = %self.config.storage.records_dir.display(),
            "Session wired"
        );

        SessionManager::new(session, store)
    }
}
