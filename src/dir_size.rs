//! Recursive directory size accumulation.

use std::fs;
use std::path::Path;
use tracing::debug;

/// Calculate the total size of every regular file under `path`.
///
/// Symlinks are neither followed nor counted, so link cycles cannot cause
/// unbounded recursion. Unreadable entries contribute nothing.
pub fn calculate_dir_size(path: &Path) -> u64 {
    // Use symlink_metadata so a symlinked root is not followed either
    let metadata = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            debug!("could not get metadata for {}: {}", path.display(), err);
            return 0;
        }
    };

    if metadata.is_symlink() {
        return 0;
    }
    if metadata.is_file() {
        return metadata.len();
    }

    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(err) => {
            debug!("failed to read directory {}: {}", path.display(), err);
            return 0;
        }
    };

    let mut total = 0u64;
    for entry in entries.flatten() {
        let entry_path = entry.path();
        let Ok(entry_metadata) = fs::symlink_metadata(&entry_path) else {
            continue;
        };

        if entry_metadata.is_symlink() {
            continue;
        }
        if entry_metadata.is_dir() {
            total += calculate_dir_size(&entry_path);
        } else {
            total += entry_metadata.len();
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sums_nested_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("top.txt"), vec![0u8; 10]).unwrap();
        fs::write(dir.path().join("a/mid.txt"), vec![0u8; 20]).unwrap();
        fs::write(dir.path().join("a/b/deep.txt"), vec![0u8; 30]).unwrap();

        assert_eq!(calculate_dir_size(dir.path()), 60);
    }

    #[test]
    fn test_missing_path_is_zero() {
        let dir = tempdir().unwrap();
        assert_eq!(calculate_dir_size(&dir.path().join("nope")), 0);
    }

    #[test]
    fn test_single_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("f.bin");
        fs::write(&file, vec![0u8; 42]).unwrap();
        assert_eq!(calculate_dir_size(&file), 42);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_not_followed() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        fs::write(dir.path().join("a/file.txt"), vec![0u8; 7]).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("a/loop")).unwrap();

        assert_eq!(calculate_dir_size(dir.path()), 7);
    }
}
