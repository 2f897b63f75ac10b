//! Persisted scan snapshot.
//!
//! A single JSON document holds the most recent scan so that a later
//! `--select --delete` can refer to entries by id without re-scanning.
//! The file is not locked; concurrent writers race and the last one wins.

use crate::error::CacheError;
use crate::scanner::Entry;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CACHE_NAMESPACE: &str = "treescout";
pub const CACHE_FILE_NAME: &str = "node_modules_cache.json";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSnapshot {
    #[serde(default)]
    pub version: u32,
    pub root: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl ScanSnapshot {
    pub fn new(root: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            root: root.into(),
            created_at: Utc::now(),
            entries,
        }
    }

    pub fn find(&self, id: u32) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Drop exactly the given ids. Survivors keep their ids and order.
    pub fn reconcile(&mut self, removed_ids: &HashSet<u32>) {
        self.entries.retain(|e| !removed_ids.contains(&e.id));
    }

    /// Forget every entry, e.g. after all of them were targeted for deletion.
    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }
}

/// `<user cache dir>/treescout/node_modules_cache.json`
pub fn default_cache_path() -> Result<PathBuf, CacheError> {
    let base = dirs::cache_dir().ok_or(CacheError::NoCacheDir)?;
    Ok(base.join(CACHE_NAMESPACE).join(CACHE_FILE_NAME))
}

pub fn load(path: &Path) -> Result<ScanSnapshot, CacheError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CacheError::Missing(path.to_path_buf())
        } else {
            CacheError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let mut snapshot: ScanSnapshot =
        serde_json::from_slice(&bytes).map_err(|source| CacheError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    if snapshot.version == 0 {
        snapshot.version = SNAPSHOT_VERSION;
    }
    Ok(snapshot)
}

/// Overwrite the snapshot file, creating its directory if needed.
pub fn save(path: &Path, snapshot: &ScanSnapshot) -> Result<(), CacheError> {
    let write_err = |source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut json = serde_json::to_vec_pretty(snapshot)?;
    json.push(b'\n');
    fs::write(path, json).map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn entry(id: u32, size_bytes: u64) -> Entry {
        Entry {
            id,
            path: format!("/work/p{}/node_modules", id),
            size_bytes,
        }
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/dir/cache.json");
        let snapshot = ScanSnapshot::new("/work", vec![entry(1, 300), entry(2, 20)]);

        save(&path, &snapshot).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_saved_document_shape() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        save(&path, &ScanSnapshot::new("/work", vec![entry(1, 5)])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["root"], "/work");
        assert!(value["created_at"].is_string());
        assert_eq!(value["entries"][0]["id"], 1);
        assert_eq!(value["entries"][0]["size_bytes"], 5);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_zero_or_missing_version_normalized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"root":"/w","created_at":"2026-01-02T03:04:05Z","entries":[]}"#,
        )
        .unwrap();
        assert_eq!(load(&path).unwrap().version, 1);

        fs::write(
            &path,
            r#"{"version":0,"root":"/w","created_at":"2026-01-02T03:04:05Z","entries":[]}"#,
        )
        .unwrap();
        assert_eq!(load(&path).unwrap().version, 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let err = load(&dir.path().join("none.json")).unwrap_err();
        assert!(matches!(err, CacheError::Missing(_)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load(&path).unwrap_err(), CacheError::Malformed { .. }));
    }

    #[test]
    fn test_reconcile_keeps_ids_and_order() {
        let mut snapshot =
            ScanSnapshot::new("/work", vec![entry(1, 90), entry(2, 50), entry(3, 10)]);
        snapshot.reconcile(&HashSet::from([2]));

        let ids: Vec<u32> = snapshot.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(snapshot.find(2).is_none());
        assert_eq!(snapshot.find(3).unwrap().size_bytes, 10);
    }

    #[test]
    fn test_clear_entries() {
        let mut snapshot = ScanSnapshot::new("/work", vec![entry(1, 1)]);
        snapshot.clear_entries();
        assert!(snapshot.entries.is_empty());
        assert_eq!(snapshot.root, "/work");
    }
}
