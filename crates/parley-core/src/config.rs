//! Application configuration model.
//!
//! Every field has a default so an empty (or absent) `config.toml` yields a
//! working setup. Loading and environment overrides live in
//! `parley-infrastructure::ConfigService`.

use crate::session::DEFAULT_MAX_NAME_LEN;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are Gemini, a smart, friendly, and helpful AI assistant developed to provide accurate and thoughtful responses.
Your primary goal is to assist users with a wide range of topics, including programming, design, science, writing, and everyday questions, in a way that is informative, respectful, and easy to understand.

Always communicate clearly and concisely, adapting your tone to match the user's style. If the user is casual, be friendly and informal; if the user is formal, mirror their tone.

Avoid making assumptions or providing inaccurate information. If you are unsure about something, say so. When appropriate, ask follow-up questions to better understand the user's intent or goal.

Do not generate harmful, unethical, or biased content. Always remain professional and prioritize the user's safety and privacy.

Keep answers relevant, creative when needed, and engaging. Avoid overly technical jargon unless requested. If code is involved, explain it clearly and make sure it works.

Be proactive and helpful without being overly verbose. Your mission is to make the user's life easier, smarter, and more fun.

Answers never contain tables. They may contain lists of information but not tables.
";

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct ParleyConfig {
    pub storage: StorageConfig,
    pub model: ModelConfig,
    pub naming: NamingConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per conversation record.
    pub records_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            records_dir: PathBuf::from("conversations"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    /// Gemini model name.
    pub name: String,
    pub system_prompt: String,
    /// Environment variable holding the API key. The key itself never goes
    /// into the config file.
    pub api_key_env: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NamingConfig {
    pub max_name_len: usize,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level: trace, debug, info, warn, error.
    pub level: String,
    /// "pretty" or "json".
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
