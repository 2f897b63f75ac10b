//! Recursive tree rendering with running totals.

use crate::dir_size::calculate_dir_size;
use crate::render::Render;
use crate::vcs::{is_vcs_internal, CommitLookup};

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name that is summarized instead of descended into.
pub const NODE_MODULES: &str = "node_modules";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Running totals for one walk. Owned by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeTotals {
    pub total_size_bytes: u64,
    pub total_files: u64,
    pub total_folders: u64,
}

/// Check whether the base name of `path` is `node_modules`
pub fn is_node_modules(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == NODE_MODULES)
}

struct Child {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

pub struct TreeWalker<'a> {
    render: &'a mut dyn Render,
    commits: &'a dyn CommitLookup,
}

impl<'a> TreeWalker<'a> {
    pub fn new(render: &'a mut dyn Render, commits: &'a dyn CommitLookup) -> Self {
        Self { render, commits }
    }

    /// Render the subtree under `path`, adding into `totals`.
    ///
    /// A `node_modules` directory (including `path` itself) is summarized
    /// with its recursive size and last commit date; its contents are not
    /// counted as files or folders.
    pub fn walk(&mut self, path: &Path, prefix: &str, totals: &mut TreeTotals) {
        if is_node_modules(path) {
            self.summarize(path, prefix, totals);
            return;
        }

        let read_dir = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(err) => {
                debug!("skipping unreadable directory {}: {}", path.display(), err);
                return;
            }
        };

        // Directories first, files later
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read_dir.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().is_ok_and(|ft| ft.is_dir());
            let child = Child {
                name,
                path: entry.path(),
                is_dir,
            };
            if !is_dir {
                files.push(child);
            } else if !is_vcs_internal(&child.name) {
                dirs.push(child);
            }
        }
        dirs.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let count = dirs.len() + files.len();
        for (i, child) in dirs.into_iter().chain(files).enumerate() {
            let is_last = i + 1 == count;
            let (connector, extension) = if is_last {
                (LAST_BRANCH, SPACE)
            } else {
                (BRANCH, PIPE)
            };
            let line_prefix = format!("{}{}", prefix, connector);

            if child.is_dir {
                if child.name == NODE_MODULES {
                    self.summarize(&child.path, &line_prefix, totals);
                    continue;
                }
                self.render.directory(&line_prefix, &child.name);
                totals.total_folders += 1;
                self.walk(&child.path, &format!("{}{}", prefix, extension), totals);
            } else {
                // Follows links; a link to a directory contributes nothing
                let size = fs::metadata(&child.path)
                    .map(|m| if m.is_dir() { 0 } else { m.len() })
                    .unwrap_or(0);
                totals.total_files += 1;
                totals.total_size_bytes += size;
                self.render.file(&line_prefix, &child.name, size);
            }
        }
    }

    fn summarize(&mut self, path: &Path, prefix: &str, totals: &mut TreeTotals) {
        let size = calculate_dir_size(path);
        let last_commit = self.commits.last_commit(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| NODE_MODULES.to_string());

        self.render
            .node_modules(prefix, &name, size, last_commit.as_deref());
        totals.total_size_bytes += size;
    }
}
