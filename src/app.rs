//! The two run modes: tree view and `node_modules` lifecycle.

use crate::cache::{self, ScanSnapshot};
use crate::delete::delete_entries;
use crate::error::{ArgumentError, ScanError};
use crate::prompt::Confirm;
use crate::render::{Render, Tone};
use crate::scanner::{Entry, NodeModulesScanner};
use crate::selection::{self, Mode, SelectionRequest};
use crate::size::format_size;
use crate::tree::{is_node_modules, TreeTotals, TreeWalker};
use crate::vcs::CommitLookup;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const DIVIDER: &str = "────────────────────────────────────────";

/// Shown after an argument error in `node_modules` mode.
pub const NODE_MODULES_USAGE: &[&str] = &[
    "Usage examples:",
    "  treescout node_modules --read",
    "  treescout node_modules --delete",
    "  treescout node_modules --select --delete id1,id2,id3",
    "  treescout node_modules --select --delete '[1,2,3]'  (quote brackets in zsh)",
];

/// Render the tree under `path` followed by a summary block.
pub fn run_tree(
    path: &Path,
    render: &mut dyn Render,
    commits: &dyn CommitLookup,
) -> Result<TreeTotals> {
    let metadata = fs::metadata(path).map_err(|source| ScanError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Err(ArgumentError::NotADirectory(path.to_path_buf()).into());
    }

    let mut totals = TreeTotals::default();
    render.message(
        Tone::Muted,
        &format!("Scanning directory: {}", path.display()),
    );

    // A node_modules root gets its summary only, no tree
    if !is_node_modules(path) {
        render.message(Tone::Plain, &path.display().to_string());
    }
    TreeWalker::new(render, commits).walk(path, "", &mut totals);

    print_summary(render, &totals);
    Ok(totals)
}

fn print_summary(render: &mut dyn Render, totals: &TreeTotals) {
    render.message(Tone::Muted, "");
    render.message(Tone::Muted, DIVIDER);
    render.message(Tone::Info, "Summary");
    render.message(
        Tone::Plain,
        &format!("  Size     : {}", format_size(totals.total_size_bytes)),
    );
    render.message(Tone::Plain, &format!("  Files    : {}", totals.total_files));
    render.message(Tone::Plain, &format!("  Folders  : {}", totals.total_folders));
    render.message(Tone::Muted, "");
    render.message(Tone::Muted, "Done ✔");
}

/// What a `node_modules` run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeModulesOutcome {
    /// The confirmation gate was declined; nothing was touched.
    Cancelled,
    /// A scan ran and was persisted.
    Scanned { entries: Vec<Entry> },
    /// Entries were removed; `deleted` holds the ones that succeeded.
    Deleted {
        targeted: Vec<Entry>,
        deleted: Vec<Entry>,
    },
}

/// Collaborators and settings for `node_modules` mode.
pub struct NodeModulesRun<'a> {
    pub render: &'a mut dyn Render,
    pub confirm: &'a mut dyn Confirm,
    pub cache_path: PathBuf,
    pub show_progress: bool,
}

impl NodeModulesRun<'_> {
    /// Parse `args`, then scan, list, persist and optionally delete.
    pub fn run<S: AsRef<str>>(&mut self, args: &[S]) -> Result<NodeModulesOutcome> {
        let request = selection::parse(args)?;
        self.execute(&request)
    }

    pub fn execute(&mut self, request: &SelectionRequest) -> Result<NodeModulesOutcome> {
        let is_dir = fs::metadata(&request.root).is_ok_and(|m| m.is_dir());
        if !is_dir {
            return Err(ArgumentError::NotADirectory(request.root.clone()).into());
        }
        let abs_root = request
            .root
            .canonicalize()
            .unwrap_or_else(|_| request.root.clone());

        if request.mode == Mode::DeleteSelected {
            return self.delete_selected(&abs_root, &request.ids);
        }

        if !self.confirm.confirm(&abs_root) {
            self.render.message(Tone::Muted, "Cancelled.");
            return Ok(NodeModulesOutcome::Cancelled);
        }

        self.render.message(
            Tone::Muted,
            &format!("Scanning for node_modules under: {}", abs_root.display()),
        );
        let entries = self.scanner().scan(&abs_root)?;
        self.print_entries(&entries);

        let mut snapshot = ScanSnapshot::new(abs_root.to_string_lossy(), entries.clone());
        cache::save(&self.cache_path, &snapshot).context("Failed to save scan results")?;
        debug!("saved snapshot to {}", self.cache_path.display());

        if request.mode == Mode::ReadOnly {
            return Ok(NodeModulesOutcome::Scanned { entries });
        }

        self.render.message(Tone::Muted, "");
        self.render
            .message(Tone::Muted, "Deleting all found node_modules...");
        let deleted = delete_entries(&entries, self.render);

        // Every id was targeted, so none of them are meaningful any more
        snapshot.clear_entries();
        cache::save(&self.cache_path, &snapshot).context("Failed to save scan results")?;

        Ok(NodeModulesOutcome::Deleted {
            targeted: entries,
            deleted,
        })
    }

    fn delete_selected(&mut self, abs_root: &Path, ids: &[u32]) -> Result<NodeModulesOutcome> {
        let mut snapshot = cache::load(&self.cache_path)?;

        let current_root = abs_root.to_string_lossy();
        if !snapshot.root.is_empty() && snapshot.root != current_root {
            self.render
                .message(Tone::Warning, "Cached scan root differs from current root.");
            self.render
                .message(Tone::Warning, &format!("Cached: {}", snapshot.root));
            self.render
                .message(Tone::Warning, &format!("Current: {}", current_root));
        }

        // Resolve every id before deleting anything
        let selected = ids
            .iter()
            .map(|&id| {
                snapshot
                    .find(id)
                    .cloned()
                    .ok_or(ArgumentError::UnknownId(id))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.render.message(
            Tone::Muted,
            &format!("Deleting {} selected node_modules...", selected.len()),
        );
        let deleted = delete_entries(&selected, self.render);

        let removed: HashSet<u32> = deleted.iter().map(|e| e.id).collect();
        snapshot.reconcile(&removed);
        cache::save(&self.cache_path, &snapshot).context("Failed to update scan results")?;

        Ok(NodeModulesOutcome::Deleted {
            targeted: selected,
            deleted,
        })
    }

    fn scanner(&self) -> NodeModulesScanner {
        let scanner = NodeModulesScanner::new();
        if !self.show_progress {
            return scanner;
        }

        let progress = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            progress.set_style(style);
        }
        progress.set_message("Scanning...");
        scanner.with_progress(progress)
    }

    fn print_entries(&mut self, entries: &[Entry]) {
        if entries.is_empty() {
            self.render
                .message(Tone::Warning, "No node_modules directories found.");
            return;
        }
        self.render.message(
            Tone::Info,
            &format!("Found {} node_modules directories:", entries.len()),
        );
        for entry in entries {
            self.render.entry(entry);
        }
    }
}
