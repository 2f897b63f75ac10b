//! Removal of scanned `node_modules` directories.

use crate::error::DeletionError;
use crate::render::{Render, Tone};
use crate::scanner::Entry;

use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Recursively remove one entry's directory.
pub fn delete_entry(entry: &Entry) -> Result<(), DeletionError> {
    let path = PathBuf::from(&entry.path);
    fs::remove_dir_all(&path).map_err(|source| DeletionError {
        id: entry.id,
        path,
        source,
    })
}

/// Remove every entry in order and return the ones actually removed.
///
/// A failure is reported and skipped; the rest of the batch still runs.
pub fn delete_entries(entries: &[Entry], render: &mut dyn Render) -> Vec<Entry> {
    let mut deleted = Vec::with_capacity(entries.len());

    for entry in entries {
        match delete_entry(entry) {
            Ok(()) => {
                debug!("removed {}", entry.path);
                render.message(
                    Tone::Success,
                    &format!("Deleted: [{}] {}", entry.id, entry.path),
                );
                deleted.push(entry.clone());
            }
            Err(err) => {
                debug!("delete failed: {}", err);
                render.message(Tone::Error, &format!("Failed: {}", err));
            }
        }
    }

    deleted
}
