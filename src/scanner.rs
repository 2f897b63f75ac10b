//! `node_modules` discovery and id assignment.

use crate::dir_size::calculate_dir_size;
use crate::error::ScanError;
use crate::tree::NODE_MODULES;
use crate::vcs::is_vcs_internal;

use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// A discovered `node_modules` directory.
///
/// Ids are a view over the scan that produced them, not a durable key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u32,
    pub path: String,
    pub size_bytes: u64,
}

/// Walks a tree once and collects every outermost `node_modules` directory.
#[derive(Default)]
pub struct NodeModulesScanner {
    progress: Option<ProgressBar>,
}

impl NodeModulesScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report walk progress on a spinner. Ticked inline from the walk loop.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Scan `root`, returning entries sorted largest first with ids 1..N.
    ///
    /// Fails only when `root` itself cannot be read; unreadable subtrees are
    /// treated as empty.
    pub fn scan(&self, root: &Path) -> Result<Vec<Entry>, ScanError> {
        fs::read_dir(root).map_err(|source| ScanError::Unreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut entries = Vec::new();
        let mut entries_scanned = 0u64;
        let mut walker = WalkDir::new(root).follow_links(false).into_iter();

        while let Some(result) = walker.next() {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    debug!("skipping unreadable entry: {}", err);
                    continue;
                }
            };

            entries_scanned += 1;
            if let Some(progress) = &self.progress {
                if entries_scanned % 100 == 0 {
                    progress.set_message(format!(
                        "Scanning: {} entries, {} node_modules found",
                        entries_scanned,
                        entries.len()
                    ));
                    progress.tick();
                }
            }

            // Symlinks report their own type here, so linked directories never match
            if !entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if is_vcs_internal(&name) {
                walker.skip_current_dir();
                continue;
            }

            if name == NODE_MODULES {
                let path = entry.path();
                let size_bytes = calculate_dir_size(path);
                debug!("found {} ({} bytes)", path.display(), size_bytes);
                entries.push(Entry {
                    id: 0,
                    path: path.to_string_lossy().into_owned(),
                    size_bytes,
                });
                walker.skip_current_dir();
            }
        }

        if let Some(progress) = &self.progress {
            progress.finish_and_clear();
        }

        assign_ids(&mut entries);
        Ok(entries)
    }
}

/// Stable sort by descending size, then number 1..N in that order.
fn assign_ids(entries: &mut [Entry]) {
    entries.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
    for (i, entry) in entries.iter_mut().enumerate() {
        entry.id = i as u32 + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, len: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; len]).unwrap();
    }

    #[test]
    fn test_entries_sorted_by_size_with_dense_ids() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("a/node_modules/pkg/file.js"), 100);
        write(&root.join("a/node_modules/pkg2/file2.js"), 50);
        write(&root.join("b/node_modules/x/y.js"), 10);

        let entries = NodeModulesScanner::new().scan(root).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].size_bytes, 150);
        assert!(entries[0].path.ends_with("node_modules"));
        assert!(Path::new(&entries[0].path).starts_with(root.join("a")));
        assert_eq!(entries[1].id, 2);
        assert_eq!(entries[1].size_bytes, 10);
    }

    #[test]
    fn test_nested_node_modules_not_identified() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("node_modules/dep/node_modules/inner/i.js"), 7);
        write(&root.join("node_modules/dep/d.js"), 3);

        let entries = NodeModulesScanner::new().scan(root).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].size_bytes, 10);
    }

    #[test]
    fn test_vcs_metadata_is_skipped() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join(".git/node_modules/x.js"), 5);
        write(&root.join("app/node_modules/y.js"), 5);

        let entries = NodeModulesScanner::new().scan(root).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].path.contains(".git"));
    }

    #[test]
    fn test_ties_keep_discovery_order() {
        let mut entries = vec![
            Entry { id: 0, path: "first".into(), size_bytes: 5 },
            Entry { id: 0, path: "big".into(), size_bytes: 9 },
            Entry { id: 0, path: "second".into(), size_bytes: 5 },
        ];
        assign_ids(&mut entries);

        let order: Vec<_> = entries.iter().map(|e| (e.id, e.path.as_str())).collect();
        assert_eq!(order, vec![(1, "big"), (2, "first"), (3, "second")]);
    }

    #[test]
    fn test_sizes_never_increase() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        for (i, len) in [30usize, 400, 2, 77].iter().enumerate() {
            write(&root.join(format!("p{}/node_modules/f.js", i)), *len);
        }

        let entries = NodeModulesScanner::new().scan(root).unwrap();

        assert_eq!(entries.len(), 4);
        assert!(entries.windows(2).all(|w| w[0].size_bytes >= w[1].size_bytes));
        let ids: Vec<u32> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = tempdir().unwrap();
        let err = NodeModulesScanner::new()
            .scan(&dir.path().join("missing"))
            .unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_empty_tree_has_no_entries() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        assert!(NodeModulesScanner::new().scan(dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_not_followed() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(&root.join("real/node_modules/a.js"), 8);
        std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();

        let entries = NodeModulesScanner::new().scan(root).unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].path.contains("real"));
    }
}
