//! Local document store
//!
//! A synchronous, file-backed key-value pair: one file holds the whole
//! serialized document, a sibling marker file holds the last local save
//! timestamp (informational only). Reads fail soft: absent or corrupt
//! data yields an empty document so the UI always has something to show.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::model::Document;
use crate::store::error::StoreResult;

/// File-backed local store for a single document
#[derive(Debug, Clone)]
pub struct LocalStore {
    data_path: PathBuf,
    marker_path: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at `data_dir` under the given namespace
    ///
    /// The document lands in `<data_dir>/<namespace>.json`, the save
    /// marker in `<data_dir>/<namespace>.last-save`.
    pub fn new(data_dir: impl AsRef<Path>, namespace: &str) -> Self {
        let dir = data_dir.as_ref();
        Self {
            data_path: dir.join(format!("{namespace}.json")),
            marker_path: dir.join(format!("{namespace}.last-save")),
        }
    }

    /// Path of the document file
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Load the document, failing soft
    ///
    /// Absent file → empty document. Corrupt JSON → empty document, with
    /// a warning so corruption is at least visible in the logs.
    pub fn load(&self) -> Document {
        let raw = match std::fs::read_to_string(&self.data_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Document::empty(),
            Err(e) => {
                tracing::warn!(path = ?self.data_path, error = %e, "local read failed, starting empty");
                return Document::empty();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    path = ?self.data_path,
                    error = %e,
                    "local document is corrupt, starting empty"
                );
                Document::empty()
            }
        }
    }

    /// Serialize and write the document, refreshing the save marker
    ///
    /// Writes to a temp file and renames so a crash mid-write cannot
    /// leave a truncated document behind.
    pub fn save(&self, doc: &Document) -> StoreResult<()> {
        if let Some(parent) = self.data_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.data_path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.data_path)?;

        // Marker failures are not worth failing the save over
        if let Err(e) = std::fs::write(&self.marker_path, Utc::now().to_rfc3339()) {
            tracing::debug!(error = %e, "could not update save marker");
        }

        tracing::debug!(path = ?self.data_path, "document saved locally");
        Ok(())
    }

    /// Timestamp of the last local save, if the marker is readable
    pub fn last_save(&self) -> Option<DateTime<Utc>> {
        let raw = std::fs::read_to_string(&self.marker_path).ok()?;
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Collection, DiaryEntry, Photo, Plant};
    use tempfile::tempdir;

    #[test]
    fn test_load_absent_is_empty() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "test");

        let doc = store.load();
        assert_eq!(doc, Document::empty());
        assert!(store.last_save().is_none());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "test");

        let mut doc = Document::empty();
        doc.peppers.push(Plant::new(1, "Habanero", "Capsicum chinense"));
        doc.diary_entries.push(
            DiaryEntry::new(1, "Sprouted", "")
                .photo(Photo::new(1, "a.jpg", "image/jpeg", "data:;base64,AAAA")),
        );
        doc.quick_notes = "order Rocoto seeds".to_string();
        doc.touch();

        store.save(&doc).unwrap();
        let restored = store.load();

        assert_eq!(restored, doc);
        // Photo payload survives the local round trip unchanged
        assert!(restored.diary_entries[0].has_photo_data());
        assert!(store.last_save().is_some());
    }

    #[test]
    fn test_empty_collections_survive_round_trip() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "test");

        let mut doc = Document::empty();
        doc.touch();
        store.save(&doc).unwrap();

        let restored = store.load();
        assert!(restored.peppers.is_empty());
        assert_eq!(restored.quick_notes, "");
        assert_eq!(restored.last_update, doc.last_update);
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path(), "test");

        std::fs::write(store.data_path(), "{ not json").unwrap();
        assert_eq!(store.load(), Document::empty());
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested");
        let store = LocalStore::new(&nested, "test");

        let doc = Document::empty();
        store.save(&doc).unwrap();
        assert!(store.data_path().exists());
    }

    #[test]
    fn test_separate_namespaces_do_not_collide() {
        let dir = tempdir().unwrap();
        let tracker = LocalStore::new(dir.path(), "tracker");
        let database = LocalStore::new(dir.path(), "database");

        let mut doc = Document::empty();
        doc.quick_notes = "tracker side".to_string();
        tracker.save(&doc).unwrap();

        assert_eq!(database.load(), Document::empty());
        assert_eq!(tracker.load().quick_notes, "tracker side");
    }
}
