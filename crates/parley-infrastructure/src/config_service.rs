//! Configuration service implementation.
//!
//! Resolves and loads `config.toml`, then applies environment overrides.
//!
//! Resolution order for the file:
//! 1. An explicit path (e.g. a command-line argument)
//! 2. `PARLEY_CONFIG`
//! 3. `<config_dir>/parley/config.toml`, if it exists
//! 4. Built-in defaults

use crate::paths::ParleyPaths;
use parley_core::config::ParleyConfig;
use parley_core::error::{ParleyError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "PARLEY_CONFIG";
pub const RECORDS_DIR_ENV: &str = "PARLEY_RECORDS_DIR";
pub const BIND_ENV: &str = "PARLEY_BIND";

/// Loads [`ParleyConfig`] from disk and the process environment.
pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration using the real process environment.
    pub fn load(explicit_path: Option<&Path>) -> Result<ParleyConfig> {
        Self::load_with_env(explicit_path, |key| std::env::var(key).ok())
    }

    /// Loads the configuration, reading environment variables through `env`.
    pub fn load_with_env<F>(explicit_path: Option<&Path>, env: F) -> Result<ParleyConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match Self::resolve_path(explicit_path, &env) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::read_file(&path)?
            }
            None => ParleyConfig::default(),
        };

        Self::apply_env_overrides(&mut config, &env);
        Ok(config)
    }

    fn resolve_path<F>(explicit_path: Option<&Path>, env: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit_path {
            return Some(path.to_path_buf());
        }
        if let Some(path) = env(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Some(PathBuf::from(path));
        }
        ParleyPaths::config_file().ok().filter(|path| path.exists())
    }

    fn read_file(path: &Path) -> Result<ParleyConfig> {
        let content = fs::read_to_string(path).map_err(|e| {
            ParleyError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_env_overrides<F>(config: &mut ParleyConfig, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = env(RECORDS_DIR_ENV).filter(|v| !v.is_empty()) {
            config.storage.records_dir = PathBuf::from(dir);
        }
        if let Some(bind) = env(BIND_ENV).filter(|v| !v.is_empty()) {
            config.server.bind = bind;
        }
    }
}
