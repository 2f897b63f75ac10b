//! Version-control metadata handling and last-commit lookup.

use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// VCS internal directories that are never traversed or listed.
pub const VCS_INTERNALS: &[&str] = &[".git"];

/// Check whether a directory name is VCS metadata
pub fn is_vcs_internal(name: &str) -> bool {
    VCS_INTERNALS.contains(&name)
}

/// Walk up from `path` to the nearest directory containing `.git`
pub fn find_git_root(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|ancestor| ancestor.join(".git").exists())
        .map(Path::to_path_buf)
}

/// Best-effort source of "when was this path last committed".
///
/// Implementations must never fail: anything that goes wrong is `None`.
pub trait CommitLookup {
    fn last_commit(&self, path: &Path) -> Option<String>;
}

/// Asks `git log` for the committer date of the latest commit.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitCommitLookup;

impl CommitLookup for GitCommitLookup {
    fn last_commit(&self, path: &Path) -> Option<String> {
        // Skip spawning git outside any repository
        find_git_root(path)?;

        let output = Command::new("git")
            .arg("-C")
            .arg(path)
            .arg("log")
            .arg("-1")
            .arg("--format=%cd")
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let date = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if date.is_empty() {
                    None
                } else {
                    Some(date)
                }
            }
            Ok(output) => {
                debug!(
                    "git log failed for {}: {}",
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(err) => {
                debug!("could not run git for {}: {}", path.display(), err);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_vcs_internals() {
        assert!(is_vcs_internal(".git"));
        assert!(!is_vcs_internal("CVS"));
        assert!(!is_vcs_internal(".svn"));
        assert!(!is_vcs_internal("src"));
        assert!(!is_vcs_internal("node_modules"));
    }

    #[test]
    fn test_find_git_root_walks_up() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();

        let root = find_git_root(&dir.path().join("a/b")).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_lookup_outside_repository_is_none() {
        let dir = tempdir().unwrap();
        // Temp dirs normally live outside any repository; only assert when that holds
        if find_git_root(dir.path()).is_none() {
            assert_eq!(GitCommitLookup.last_commit(dir.path()), None);
        }
    }
}
