use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Flat-table snapshot store: named CSV tables under a single root directory.
///
/// The store is the pipeline's only durability boundary, and callers treat it
/// as fallible-but-quiet: `load` returns an empty table on any miss or error,
/// `save` logs and swallows failures. The UI layers above would rather show
/// "no data" than crash, and the fetcher re-derives everything on the next
/// pass anyway.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    root: PathBuf,
}

impl SnapshotStore {
    /// Build a store rooted at `root`. The directory is created lazily on the
    /// first `save`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Load a named table. Missing file, unreadable file, or rows that fail
    /// to deserialize all degrade to an empty/partial result, never an error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let path = self.path_for(key);
        if !path.exists() {
            tracing::debug!(key, "snapshot not found in store");
            return Vec::new();
        }
        let reader = match csv::Reader::from_path(&path) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to open snapshot; degrading to empty");
                metrics::counter!("evaluator_store_errors_total", "op" => "load").increment(1);
                return Vec::new();
            }
        };
        let mut rows = Vec::new();
        for record in reader.into_deserialize() {
            match record {
                Ok(row) => rows.push(row),
                Err(e) => {
                    tracing::warn!(key, error = %e, "skipping unparseable snapshot row");
                    metrics::counter!("evaluator_store_errors_total", "op" => "load_row")
                        .increment(1);
                }
            }
        }
        tracing::debug!(key, rows = rows.len(), "loaded snapshot");
        rows
    }

    /// Persist a named table. Best-effort: the write goes to a temp file that
    /// is renamed into place, and failures are logged, not raised.
    pub fn save<T: Serialize>(&self, key: &str, rows: &[T]) {
        if let Err(e) = self.try_save(key, rows) {
            tracing::warn!(key, error = %e, "failed to persist snapshot");
            metrics::counter!("evaluator_store_errors_total", "op" => "save").increment(1);
        } else {
            tracing::info!(key, rows = rows.len(), "snapshot persisted");
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, rows: &[T]) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let tmp = tmp_path(&path);
        {
            let mut writer = csv::Writer::from_path(&tmp)?;
            for row in rows {
                writer.serialize(row)?;
            }
            writer.flush()?;
        }
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ValuationRecord;

    fn sample_rows() -> Vec<ValuationRecord> {
        vec![
            ValuationRecord {
                player_name: "Luka Doncic".to_string(),
                cr: Some(24.5),
                position: "G".to_string(),
            },
            ValuationRecord {
                player_name: "Walter Tavares".to_string(),
                cr: None,
                position: "C".to_string(),
            },
        ]
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let rows = sample_rows();
        store.save("player_cr_data_2026-01-05.csv", &rows);
        let back: Vec<ValuationRecord> = store.load("player_cr_data_2026-01-05.csv");
        assert_eq!(back, rows);
    }

    #[test]
    fn test_load_missing_key_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        let rows: Vec<ValuationRecord> = store.load("does_not_exist.csv");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("injury_report.csv");
        std::fs::write(
            &path,
            "player_name,cr,position\nLuka Doncic,24.5,G\nBroken,not-a-number,F\n",
        )
        .unwrap();
        let store = SnapshotStore::new(dir.path());
        let rows: Vec<ValuationRecord> = store.load("injury_report.csv");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_name, "Luka Doncic");
    }

    #[test]
    fn test_save_into_unwritable_root_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the root directory should be makes create_dir_all fail.
        let blocked = dir.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();
        let store = SnapshotStore::new(&blocked);
        store.save("anything.csv", &sample_rows());
        let rows: Vec<ValuationRecord> = store.load("anything.csv");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store.save("t.csv", &sample_rows());
        let shorter = vec![sample_rows().remove(0)];
        store.save("t.csv", &shorter);
        let back: Vec<ValuationRecord> = store.load("t.csv");
        assert_eq!(back, shorter);
    }
}
