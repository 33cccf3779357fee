//! Record store trait.
//!
//! Defines the interface for persisting conversation turns.

use super::message::Message;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Handle to one durable conversation record.
///
/// A handle is invalidated by a successful [`RecordStore::rename`]; the
/// returned handle must be used from then on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHandle {
    /// Stable identifier, unique within the store.
    pub id: String,
    /// Where the backing artifact lives.
    pub location: PathBuf,
}

/// An abstract store for conversation records.
///
/// This trait decouples the session core from the storage mechanism. Records
/// hold only human and assistant messages, in insertion order.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Crash-safe appends (no partially written artifacts)
/// - Surfacing corrupt artifacts instead of repairing them
/// - Rename without clobbering an existing record
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Creates a new, empty record under a fresh random identifier.
    ///
    /// # Returns
    ///
    /// - `Ok(RecordHandle)`: Record created
    /// - `Err(ParleyError::Storage)`: Location not writable
    async fn create(&self) -> Result<RecordHandle>;

    /// Appends `turns` to the end of the record.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Turns persisted
    /// - `Err(ParleyError::Storage)`: Artifact missing, corrupt or unwritable
    async fn append(&self, handle: &RecordHandle, turns: &[Message]) -> Result<()>;

    /// Loads all persisted turns of a record.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Message>)`: Turns in insertion order
    /// - `Err(ParleyError::NotFound)`: No record with this identifier
    /// - `Err(ParleyError::Storage)`: Artifact corrupt
    async fn load(&self, id: &str) -> Result<Vec<Message>>;

    /// Moves a record to a location derived from `new_name`.
    ///
    /// # Returns
    ///
    /// - `Ok(RecordHandle)`: Handle of the renamed record
    /// - `Err(ParleyError::Conflict)`: Destination taken, original untouched
    /// - `Err(ParleyError::Storage)`: Move failed
    async fn rename(&self, handle: &RecordHandle, new_name: &str) -> Result<RecordHandle>;

    /// Lists the identifiers of all stored records.
    ///
    /// Returns an empty list when nothing has been stored yet.
    async fn list(&self) -> Result<Vec<String>>;
}
