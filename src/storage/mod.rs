//! Persistence collaborators
//!
//! Two narrow seams sit between the profiling core and whatever keeps data
//! around afterwards:
//!
//! - [`ObjectStore`] holds raw uploads and rendered reports by key
//! - [`MetadataStore`] holds one [`DatasetRecord`] per profiled upload
//!
//! Local implementations keep everything under a single data directory
//! (`~/.local/share/dataprobe` by default).

mod metadata;
mod object;
mod record;

pub use metadata::{InMemoryMetadataStore, JsonFileMetadataStore, MetadataStore};
pub use object::{LocalObjectStore, ObjectStore, StoreOutcome};
pub use record::{DatasetRecord, FieldValue, NumberKind};

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur in the storage layer
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),

    #[error("Failed to (de)serialize records: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Default root for locally persisted data
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("dataprobe")
}

/// Key for an uploaded dataset: `uploads/{owner}/{timestamp}_{id8}.{ext}`
///
/// `id` is any unique token; only its first 8 characters are used.
pub fn upload_key(owner: &str, filename: &str, at: DateTime<Utc>, id: &str) -> String {
    let extension = filename.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    format!(
        "uploads/{}/{}_{}.{}",
        key_segment(owner),
        at.format("%Y%m%d_%H%M%S"),
        id.chars().take(8).collect::<String>(),
        key_segment(extension)
    )
}

/// Key for a rendered report: `reports/{timestamp}_{filename}.{ext}`
pub fn report_key(filename: &str, at: DateTime<Utc>, extension: &str) -> String {
    format!(
        "reports/{}_{}.{}",
        at.format("%Y%m%d_%H%M%S"),
        key_segment(filename),
        extension
    )
}

/// Replace anything that could act as a path separator or traversal
fn key_segment(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        cleaned.replace('.', "_")
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn test_upload_key_layout() {
        let key = upload_key("alice", "sales.v2.csv", at(), "0123456789abcdef");
        assert_eq!(key, "uploads/alice/20240309_140507_01234567.csv");
    }

    #[test]
    fn test_upload_key_without_extension() {
        let key = upload_key("alice", "README", at(), "abcdefgh");
        assert_eq!(key, "uploads/alice/20240309_140507_abcdefgh.");
    }

    #[test]
    fn test_report_key_layout() {
        assert_eq!(
            report_key("sales.csv", at(), "md"),
            "reports/20240309_140507_sales.csv.md"
        );
    }

    #[test]
    fn test_keys_cannot_traverse() {
        let key = upload_key("../etc", "x.csv", at(), "abcdefgh");
        assert!(key.starts_with("uploads/.._etc/"));
        assert_eq!(key_segment(".."), "__");
        assert_eq!(key_segment("a/b"), "a_b");
    }
}
