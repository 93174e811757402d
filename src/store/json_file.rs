use crate::domain::{Snapshot, SnapshotRecord};
use crate::errors::TrackerError;
use crate::store::SnapshotStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Snapshot kept as one JSON object keyed by listing id:
///
/// ```json
/// { "LRW3E7EK0RC000001": { "price": 31990, "has_photos": true } }
/// ```
pub struct JsonFileStore {
    path: PathBuf,
}

/// On-disk value; the id lives in the key.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct StoredRecord {
    price: i64,
    has_photos: bool,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn unavailable(&self, what: &str, e: impl std::fmt::Display) -> TrackerError {
        TrackerError::StoreUnavailable(format!("{what} {}: {e}", self.path.display()))
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Snapshot, TrackerError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No snapshot at {}, starting empty", self.path.display());
                return Ok(Snapshot::new());
            }
            Err(e) => return Err(self.unavailable("read", e)),
        };

        let stored: BTreeMap<String, StoredRecord> =
            serde_json::from_str(&text).map_err(|e| self.unavailable("parse", e))?;

        Ok(stored
            .into_iter()
            .map(|(id, r)| {
                let record = SnapshotRecord {
                    id: id.clone(),
                    price: r.price,
                    has_photos: r.has_photos,
                };
                (id, record)
            })
            .collect())
    }

    /// Writes to a temporary file next to the target, syncs it, then renames
    /// it over the target. A failure at any step leaves the old file in place.
    fn replace(&mut self, records: &Snapshot) -> Result<(), TrackerError> {
        let stored: BTreeMap<&str, StoredRecord> = records
            .iter()
            .map(|(id, r)| {
                (
                    id.as_str(),
                    StoredRecord {
                        price: r.price,
                        has_photos: r.has_photos,
                    },
                )
            })
            .collect();

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let tmp = NamedTempFile::new_in(&dir).map_err(|e| self.unavailable("create temp in", e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &stored)
                .map_err(|e| self.unavailable("serialize", e))?;
            writer.flush().map_err(|e| self.unavailable("write", e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| self.unavailable("sync", e))?;
        tmp.persist(&self.path)
            .map_err(|e| self.unavailable("rename into", e.error))?;

        log::debug!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("cars.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn file_layout_is_keyed_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        let mut store = JsonFileStore::new(&path);

        let mut snap = Snapshot::new();
        snap.insert(
            "A".into(),
            SnapshotRecord { id: "A".into(), price: 30000, has_photos: false },
        );
        store.replace(&snap).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({ "A": { "price": 30000, "has_photos": false } }));
    }

    #[test]
    fn corrupt_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TrackerError::StoreUnavailable(_)));
    }

    #[test]
    fn wrong_record_shape_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cars.json");
        fs::write(&path, r#"{"A": {"price": "cheap", "has_photos": true}}"#).unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, TrackerError::StoreUnavailable(_)));
    }

    #[test]
    fn unwritable_target_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so no temp file can be created.
        let path = dir.path().join("missing").join("cars.json");
        let mut store = JsonFileStore::new(&path);

        let err = store.replace(&Snapshot::new()).unwrap_err();
        assert!(matches!(err, TrackerError::StoreUnavailable(_)));
        assert!(!path.exists());
    }
}
