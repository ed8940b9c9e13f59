//! Metadata store for dataset records

use crate::storage::{DatasetRecord, StoreError, StoreResult};
use indexmap::IndexMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Key-value repository of [`DatasetRecord`]s keyed by record id
pub trait MetadataStore: Send + Sync {
    /// Insert a record and return its id
    fn create(&self, record: DatasetRecord) -> StoreResult<String>;

    fn get(&self, id: &str) -> StoreResult<Option<DatasetRecord>>;

    /// All records of one owner, oldest upload first
    fn scan_by_owner(&self, owner: &str) -> StoreResult<Vec<DatasetRecord>>;

    /// Replace the record stored under `id`
    fn update(&self, id: &str, record: DatasetRecord) -> StoreResult<()>;

    /// Remove a record, returning what was stored
    fn delete(&self, id: &str) -> StoreResult<DatasetRecord>;
}

type RecordMap = IndexMap<String, DatasetRecord>;

fn scan(records: &RecordMap, owner: &str) -> Vec<DatasetRecord> {
    let mut found: Vec<DatasetRecord> = records
        .values()
        .filter(|r| r.owner == owner)
        .cloned()
        .collect();
    found.sort_by(|a, b| a.uploaded_at.cmp(&b.uploaded_at));
    found
}

fn replace(records: &mut RecordMap, id: &str, mut record: DatasetRecord) -> StoreResult<()> {
    let slot = records
        .get_mut(id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    record.id = id.to_string();
    *slot = record;
    Ok(())
}

/// Process-local store, used by tests and one-shot runs
#[derive(Default)]
pub struct InMemoryMetadataStore {
    records: Mutex<RecordMap>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, RecordMap>> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn create(&self, record: DatasetRecord) -> StoreResult<String> {
        let id = record.id.clone();
        self.lock()?.insert(id.clone(), record);
        Ok(id)
    }

    fn get(&self, id: &str) -> StoreResult<Option<DatasetRecord>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn scan_by_owner(&self, owner: &str) -> StoreResult<Vec<DatasetRecord>> {
        let records = self.lock()?;
        Ok(scan(&records, owner))
    }

    fn update(&self, id: &str, record: DatasetRecord) -> StoreResult<()> {
        let mut records = self.lock()?;
        replace(&mut records, id, record)
    }

    fn delete(&self, id: &str) -> StoreResult<DatasetRecord> {
        self.lock()?
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// Store persisted as one JSON document, rewritten on every mutation
pub struct JsonFileMetadataStore {
    path: PathBuf,
    records: Mutex<RecordMap>,
}

impl JsonFileMetadataStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A corrupt file is an error rather
    /// than silently discarded.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => RecordMap::new(),
            Ok(text) => {
                let list: Vec<DatasetRecord> = serde_json::from_str(&text)?;
                list.into_iter().map(|r| (r.id.clone(), r)).collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RecordMap::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        debug!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    fn lock(&self) -> StoreResult<std::sync::MutexGuard<'_, RecordMap>> {
        self.records.lock().map_err(|_| StoreError::Poisoned)
    }

    fn persist(&self, records: &RecordMap) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let list: Vec<&DatasetRecord> = records.values().collect();
        let json = serde_json::to_string_pretty(&list)?;

        // Write-then-rename keeps the previous document intact on failure
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| {
            warn!("Failed to replace {}: {}", self.path.display(), source);
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

impl MetadataStore for JsonFileMetadataStore {
    fn create(&self, record: DatasetRecord) -> StoreResult<String> {
        let mut records = self.lock()?;
        let id = record.id.clone();
        let mut next = records.clone();
        next.insert(id.clone(), record);
        self.persist(&next)?;
        *records = next;
        Ok(id)
    }

    fn get(&self, id: &str) -> StoreResult<Option<DatasetRecord>> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn scan_by_owner(&self, owner: &str) -> StoreResult<Vec<DatasetRecord>> {
        let records = self.lock()?;
        Ok(scan(&records, owner))
    }

    fn update(&self, id: &str, record: DatasetRecord) -> StoreResult<()> {
        let mut records = self.lock()?;
        let mut next = records.clone();
        replace(&mut next, id, record)?;
        self.persist(&next)?;
        *records = next;
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<DatasetRecord> {
        let mut records = self.lock()?;
        let mut next = records.clone();
        let removed = next
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        self.persist(&next)?;
        *records = next;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn record(owner: &str, filename: &str) -> DatasetRecord {
        DatasetRecord::new(
            owner,
            filename,
            10,
            format!("uploads/{}/{}", owner, filename),
        )
    }

    fn exercise(store: &dyn MetadataStore) {
        let mut older = record("alice", "old.csv");
        older.uploaded_at -= Duration::hours(1);
        let newer = record("alice", "new.csv");
        let other = record("bob", "b.csv");

        let newer_id = store.create(newer.clone()).unwrap();
        let older_id = store.create(older).unwrap();
        store.create(other).unwrap();

        let alice: Vec<String> = store
            .scan_by_owner("alice")
            .unwrap()
            .into_iter()
            .map(|r| r.filename)
            .collect();
        assert_eq!(alice, vec!["old.csv", "new.csv"]);
        assert!(store.scan_by_owner("carol").unwrap().is_empty());

        let mut edited = newer;
        edited.report_key = Some("reports/x.md".into());
        store.update(&newer_id, edited).unwrap();
        assert_eq!(
            store.get(&newer_id).unwrap().unwrap().report_key.as_deref(),
            Some("reports/x.md")
        );

        let removed = store.delete(&older_id).unwrap();
        assert_eq!(removed.filename, "old.csv");
        assert!(matches!(
            store.delete(&older_id),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update("missing", record("alice", "z.csv")),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_in_memory_store() {
        exercise(&InMemoryMetadataStore::new());
    }

    #[test]
    fn test_json_file_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("meta").join("records.json");
        exercise(&JsonFileMetadataStore::open(&path).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn test_json_file_store_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");

        let id = {
            let store = JsonFileMetadataStore::open(&path).unwrap();
            store.create(record("alice", "a.csv")).unwrap()
        };

        let reopened = JsonFileMetadataStore::open(&path).unwrap();
        let found = reopened.get(&id).unwrap().unwrap();
        assert_eq!(found.filename, "a.csv");
    }

    #[test]
    fn test_failed_write_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        let store = JsonFileMetadataStore::open(&path).unwrap();
        let kept = store.create(record("alice", "kept.csv")).unwrap();

        // A directory in place of the document makes the rename fail
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let lost = record("alice", "lost.csv");
        let lost_id = lost.id.clone();
        assert!(matches!(store.create(lost), Err(StoreError::Io { .. })));
        assert!(store.get(&lost_id).unwrap().is_none());

        assert!(matches!(store.delete(&kept), Err(StoreError::Io { .. })));
        assert!(store.get(&kept).unwrap().is_some());

        let mut edited = store.get(&kept).unwrap().unwrap();
        edited.report_key = Some("reports/x.json".into());
        assert!(store.update(&kept, edited).is_err());
        assert!(store.get(&kept).unwrap().unwrap().report_key.is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            JsonFileMetadataStore::open(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
