//! Automatic conversation naming.
//!
//! After each completed turn the session asks the [`NamingPolicy`] whether a
//! name should be derived. The policy fires only while the history is 4 or 5
//! messages long, so a conversation whose naming attempt was skipped keeps
//! its generated identifier for good.

use super::history::History;
use super::oracle::NamingOracle;
use super::repository::{RecordHandle, RecordStore};
use crate::error::ParleyError;
use std::sync::Arc;

/// Default upper bound on the normalized name length.
pub const DEFAULT_MAX_NAME_LEN: usize = 80;

const PATH_HOSTILE: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Byte budget for a name once `_<8 hex>.json` is appended, keeping the
/// file name within the common 255-byte limit.
const MAX_NAME_BYTES: usize = 255 - "_00000000.json".len();

/// Whether the session's record has been given a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NamingState {
    #[default]
    Unnamed,
    /// Terminal.
    Named,
}

/// Result of a single naming attempt.
#[derive(Debug)]
pub enum NamingOutcome {
    /// The record was renamed; the old handle is no longer valid.
    Renamed(RecordHandle),
    /// The oracle answered with nothing usable.
    Unusable(String),
    /// The oracle or the rename failed.
    Failed(ParleyError),
}

/// Decides when to name a conversation and applies the name.
pub struct NamingPolicy {
    oracle: Arc<dyn NamingOracle>,
    max_name_len: usize,
}

impl NamingPolicy {
    pub fn new(oracle: Arc<dyn NamingOracle>) -> Self {
        Self {
            oracle,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }

    pub fn with_max_name_len(mut self, max_name_len: usize) -> Self {
        self.max_name_len = max_name_len;
        self
    }

    /// True when the history length is 4 or 5 and no name was applied yet.
    pub fn should_attempt(&self, history_len: usize, state: NamingState) -> bool {
        state == NamingState::Unnamed && matches!(history_len, 4 | 5)
    }

    /// Asks the oracle for a name and renames `handle` if the name is usable.
    pub async fn attempt(
        &self,
        history: &History,
        store: &dyn RecordStore,
        handle: &RecordHandle,
    ) -> NamingOutcome {
        let candidate = match self.oracle.suggest_name(history.messages()).await {
            Ok(candidate) => candidate,
            Err(e) => return NamingOutcome::Failed(e.into()),
        };

        let Some(name) = normalize_name(&candidate, self.max_name_len) else {
            return NamingOutcome::Unusable(candidate);
        };

        match store.rename(handle, &name).await {
            Ok(renamed) => NamingOutcome::Renamed(renamed),
            Err(e) => NamingOutcome::Failed(e),
        }
    }
}

/// Turns an oracle answer into a file-safe name.
///
/// Trims whitespace and surrounding quotes and replaces spaces with
/// underscores. Rejects names that are empty, start with `.`, exceed
/// `max_len` characters or the file-name byte budget, or contain path
/// separators, reserved characters or control characters.
pub fn normalize_name(candidate: &str, max_len: usize) -> Option<String> {
    let trimmed = candidate
        .trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`'))
        .trim();

    if trimmed.is_empty() || trimmed.starts_with('.') {
        return None;
    }

    if trimmed
        .chars()
        .any(|c| c.is_control() || PATH_HOSTILE.contains(&c))
    {
        return None;
    }

    let name = trimmed.replace(' ', "_");
    if name.chars().count() > max_len || name.len() > MAX_NAME_BYTES {
        return None;
    }

    Some(name)
}
