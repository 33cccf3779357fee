//! JSON file-backed RecordStore implementation.
//!
//! Directory structure:
//! ```text
//! records_dir/
//! ├── 5f0c7a3e-1d2b-4c8e-9a77-0b1e2d3c4f5a.json   # not yet named
//! └── Water_Facts_3fa9c01d.json                    # named, with suffix
//! ```
//!
//! Each file is a JSON array of `{"type": "HumanMessage"|"AIMessage",
//! "content": "..."}` objects. The record identifier is the file stem.

use crate::storage::{AtomicJsonError, AtomicJsonFile, random_suffix};
use async_trait::async_trait;
use parley_core::error::{ParleyError, Result};
use parley_core::session::{Message, RecordHandle, RecordStore, Role};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const RECORD_EXTENSION: &str = "json";

type SuffixSource = Box<dyn Fn() -> String + Send + Sync>;

impl From<AtomicJsonError> for ParleyError {
    fn from(err: AtomicJsonError) -> Self {
        match err {
            AtomicJsonError::JsonError(e) => {
                ParleyError::storage(format!("corrupt record: {}", e))
            }
            other => ParleyError::storage(other.to_string()),
        }
    }
}

/// Record store keeping one JSON file per conversation.
///
/// Appends go through [`AtomicJsonFile::update`], so a crash mid-write
/// leaves either the old or the new array on disk, never a torn file.
pub struct JsonRecordStore {
    records_dir: PathBuf,
    suffix_source: SuffixSource,
}

impl JsonRecordStore {
    /// Creates a store rooted at `records_dir`.
    ///
    /// The directory is created on the first [`RecordStore::create`].
    pub fn new(records_dir: impl AsRef<Path>) -> Self {
        Self {
            records_dir: records_dir.as_ref().to_path_buf(),
            suffix_source: Box::new(random_suffix),
        }
    }

    /// Replaces the rename suffix generator.
    pub fn with_suffix_source<F>(mut self, source: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.suffix_source = Box::new(source);
        self
    }

    pub fn records_dir(&self) -> &Path {
        &self.records_dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.records_dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    fn record_file(&self, path: PathBuf) -> AtomicJsonFile<Vec<Message>> {
        AtomicJsonFile::new(path)
    }

    /// Tries to move `handle` to `<name>_<suffix>.json`.
    ///
    /// Returns `Ok(None)` when the destination is already taken.
    fn try_rename(
        &self,
        handle: &RecordHandle,
        name: &str,
        suffix: &str,
    ) -> Result<Option<RecordHandle>> {
        let id = format!("{}_{}", name, suffix);
        if !is_valid_id(&id) {
            return Err(ParleyError::storage(format!(
                "invalid record name '{}'",
                name
            )));
        }

        let location = self.record_path(&id);
        if location.exists() {
            return Ok(None);
        }

        fs::rename(&handle.location, &location)?;
        Ok(Some(RecordHandle { id, location }))
    }
}

/// Identifiers map to file stems, so anything that could escape the records
/// directory or hide the file is refused.
fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id
            .chars()
            .any(|c| c.is_control() || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn create(&self) -> Result<RecordHandle> {
        fs::create_dir_all(&self.records_dir)?;

        let id = Uuid::new_v4().to_string();
        let location = self.record_path(&id);
        self.record_file(location.clone()).save(&Vec::new())?;

        tracing::debug!(record_id = %id, path = %location.display(), "Record file created");
        Ok(RecordHandle { id, location })
    }

    async fn append(&self, handle: &RecordHandle, turns: &[Message]) -> Result<()> {
        if turns.iter().any(|m| m.role == Role::System) {
            return Err(ParleyError::internal(
                "system messages are never written to a record",
            ));
        }

        self.record_file(handle.location.clone())
            .update(|records| {
                records.extend_from_slice(turns);
                Ok(())
            })
            .map_err(|e| match e {
                AtomicJsonError::Missing(_) => {
                    ParleyError::storage(format!("record '{}' is missing", handle.id))
                }
                other => other.into(),
            })
    }

    async fn load(&self, id: &str) -> Result<Vec<Message>> {
        if !is_valid_id(id) {
            return Err(ParleyError::not_found("Record", id));
        }

        self.record_file(self.record_path(id))
            .load()?
            .ok_or_else(|| ParleyError::not_found("Record", id))
    }

    async fn rename(&self, handle: &RecordHandle, new_name: &str) -> Result<RecordHandle> {
        if !handle.location.exists() {
            return Err(ParleyError::storage(format!(
                "record '{}' is missing",
                handle.id
            )));
        }

        let first = (self.suffix_source)();
        if let Some(renamed) = self.try_rename(handle, new_name, &first)? {
            return Ok(renamed);
        }

        let second = (self.suffix_source)();
        tracing::debug!(name = %new_name, suffix = %first, "Rename destination taken, retrying");
        match self.try_rename(handle, new_name, &second)? {
            Some(renamed) => Ok(renamed),
            None => Err(ParleyError::conflict(format!("{}_{}", new_name, second))),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.records_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some(RECORD_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if is_valid_id(stem) {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn store(temp_dir: &TempDir) -> JsonRecordStore {
        JsonRecordStore::new(temp_dir.path().join("conversations"))
    }

    #[tokio::test]
    async fn test_load_fresh_record_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        let handle = store.create().await.unwrap();

        assert!(handle.location.exists());
        assert_eq!(Uuid::parse_str(&handle.id).unwrap().get_version_num(), 4);
        assert!(store.load(&handle.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_in_unwritable_location_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("conversations");
        fs::write(&blocker, "not a directory").unwrap();
        let store = JsonRecordStore::new(&blocker);

        let err = store.create().await.unwrap_err();

        assert!(err.is_storage(), "got {err:?}");
        assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
    }

    #[tokio::test]
    async fn test_append_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let handle = store.create().await.unwrap();

        store
            .append(&handle, &[Message::human("hi"), Message::assistant("hello")])
            .await
            .unwrap();

        let raw = fs::read_to_string(&handle.location).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"type": "HumanMessage", "content": "hi"},
                {"type": "AIMessage", "content": "hello"}
            ])
        );

        store
            .append(&handle, &[Message::human("more"), Message::assistant("sure")])
            .await
            .unwrap();
        let loaded = store.load(&handle.id).await.unwrap();
        assert_eq!(
            loaded,
            vec![
                Message::human("hi"),
                Message::assistant("hello"),
                Message::human("more"),
                Message::assistant("sure"),
            ]
        );
    }

    #[tokio::test]
    async fn test_append_rejects_system_message() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let handle = store.create().await.unwrap();

        assert!(store.append(&handle, &[Message::system("x")]).await.is_err());
        assert!(store.load(&handle.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unknown_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert!(store.load("does-not-exist").await.unwrap_err().is_not_found());
        assert!(store.load("../secrets").await.unwrap_err().is_not_found());
        assert!(store.load("").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_surfaced_not_repaired() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let handle = store.create().await.unwrap();
        fs::write(&handle.location, r#"[{"type":"ToolMessage","content":"?"}]"#).unwrap();

        assert!(store.load(&handle.id).await.unwrap_err().is_storage());
        let err = store
            .append(&handle, &[Message::human("hi")])
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert_eq!(
            fs::read_to_string(&handle.location).unwrap(),
            r#"[{"type":"ToolMessage","content":"?"}]"#
        );
    }

    #[tokio::test]
    async fn test_append_to_missing_record_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let handle = store.create().await.unwrap();
        fs::remove_file(&handle.location).unwrap();

        let err = store
            .append(&handle, &[Message::human("hi")])
            .await
            .unwrap_err();
        assert!(err.is_storage());
        assert!(!handle.location.exists());
    }

    #[tokio::test]
    async fn test_rename_preserves_turns() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir).with_suffix_source(|| "3fa9c01d".to_string());
        let handle = store.create().await.unwrap();
        let turns = vec![Message::human("why is water wet"), Message::assistant("...")];
        store.append(&handle, &turns).await.unwrap();

        let renamed = store.rename(&handle, "Water_Facts").await.unwrap();

        assert_eq!(renamed.id, "Water_Facts_3fa9c01d");
        assert_eq!(store.load(&renamed.id).await.unwrap(), turns);
        assert!(store.load(&handle.id).await.unwrap_err().is_not_found());
        assert!(!handle.location.exists());
    }

    #[tokio::test]
    async fn test_rename_regenerates_suffix_once() {
        let temp_dir = TempDir::new().unwrap();
        let suffixes = Mutex::new(vec!["bbbb1111".to_string(), "aaaa0000".to_string()]);
        let store = store(&temp_dir)
            .with_suffix_source(move || suffixes.lock().unwrap().pop().unwrap());

        let other = store.create().await.unwrap();
        fs::rename(&other.location, store.records_dir().join("Water_Facts_aaaa0000.json"))
            .unwrap();

        let handle = store.create().await.unwrap();
        let renamed = store.rename(&handle, "Water_Facts").await.unwrap();

        assert_eq!(renamed.id, "Water_Facts_bbbb1111");
    }

    #[tokio::test]
    async fn test_rename_conflict_leaves_original() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir).with_suffix_source(|| "deadbeef".to_string());

        let first = store.create().await.unwrap();
        store.rename(&first, "Water_Facts").await.unwrap();

        let second = store.create().await.unwrap();
        store.append(&second, &[Message::human("hi")]).await.unwrap();

        let err = store.rename(&second, "Water_Facts").await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(
            store.load(&second.id).await.unwrap(),
            vec![Message::human("hi")]
        );
    }

    #[tokio::test]
    async fn test_rename_rejects_path_hostile_name() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);
        let handle = store.create().await.unwrap();

        assert!(store.rename(&handle, "../escape").await.unwrap_err().is_storage());
        assert!(handle.location.exists());
    }

    #[tokio::test]
    async fn test_list_records() {
        let temp_dir = TempDir::new().unwrap();
        let store = store(&temp_dir);

        assert!(store.list().await.unwrap().is_empty());

        let a = store.create().await.unwrap();
        let b = store.create().await.unwrap();
        fs::write(store.records_dir().join(".leftover.json.tmp"), "[]").unwrap();
        fs::write(store.records_dir().join("notes.txt"), "ignored").unwrap();

        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(store.list().await.unwrap(), expected);
    }
}
