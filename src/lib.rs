//! treescout - directory tree explorer with node_modules cleanup
//!
//! Renders a colorized tree of a directory with file sizes and totals.
//! `node_modules` directories are summarized rather than expanded, and a
//! dedicated mode finds every `node_modules` under a root, numbers them by
//! size, and remembers the result so that a later run can delete a chosen
//! subset by id without scanning again.
//!
//! ## Flow
//!
//! - Tree mode: [`app::run_tree`] drives [`tree::TreeWalker`].
//! - `node_modules` mode: [`selection::parse`] → confirmation →
//!   [`scanner::NodeModulesScanner`] → [`cache::save`] → optional
//!   [`delete::delete_entries`] and snapshot reconciliation.
//!
//! Ids are only meaningful against the snapshot that assigned them.

pub mod app;
pub mod cache;
pub mod delete;
pub mod dir_size;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod scanner;
pub mod selection;
pub mod size;
pub mod tree;
pub mod vcs;

// Re-export commonly used items
pub use app::{run_tree, NodeModulesOutcome, NodeModulesRun};
pub use cache::{default_cache_path, ScanSnapshot};
pub use error::{ArgumentError, CacheError, DeletionError, ScanError};
pub use prompt::{Confirm, LineConfirm};
pub use render::{ConsoleRender, MemoryRender, Render, Tone};
pub use scanner::{Entry, NodeModulesScanner};
pub use selection::{parse_ids, Mode, SelectionRequest};
pub use size::format_size;
pub use tree::{TreeTotals, TreeWalker};
pub use vcs::{CommitLookup, GitCommitLookup};
