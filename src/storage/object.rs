//! Object store for uploads and reports

use crate::storage::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Outcome of a write: a flag plus location or message, never a panic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoreOutcome {
    pub fn stored(location: impl Into<String>) -> Self {
        Self {
            success: true,
            location: Some(location.into()),
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            location: None,
            message: Some(message.into()),
        }
    }
}

/// Blob storage addressed by slash-separated keys
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> StoreOutcome;

    fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    fn delete(&self, key: &str) -> StoreOutcome;
}

/// Object store backed by a directory tree
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }

    fn write(&self, key: &str, bytes: &[u8]) -> StoreResult<PathBuf> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, bytes).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, key: &str, bytes: &[u8], content_type: &str) -> StoreOutcome {
        match self.write(key, bytes) {
            Ok(path) => {
                debug!("Stored {} ({} bytes, {})", key, bytes.len(), content_type);
                StoreOutcome::stored(path.display().to_string())
            }
            Err(e) => {
                warn!("Failed to store {}: {}", key, e);
                StoreOutcome::failed(format!("Failed to store object: {}", e))
            }
        }
    }

    fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolve(key)?;
        std::fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StoreError::NotFound(key.to_string())
            } else {
                StoreError::Io { path, source }
            }
        })
    }

    fn delete(&self, key: &str) -> StoreOutcome {
        let result = self.resolve(key).and_then(|path| {
            std::fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })
        });
        match result {
            Ok(()) => StoreOutcome {
                success: true,
                location: None,
                message: None,
            },
            Err(e) => StoreOutcome::failed(e.to_string()),
        }
    }
}
