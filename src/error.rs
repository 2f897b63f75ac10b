//! Error taxonomy and exit code mapping.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for filesystem, scan and cache I/O failures.
pub const EXIT_IO: u8 = 1;
/// Exit code for argument and validation failures.
pub const EXIT_USAGE: u8 = 2;

/// Malformed invocation. Raised before any filesystem mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("empty id list")]
    EmptyIdList,

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("--select is only supported with --delete")]
    SelectWithoutDelete,

    #[error("missing ids list (example: [1,2,3] or id1,id2)")]
    MissingIds,

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("unknown id: {0} (run --read again to refresh IDs)")]
    UnknownId(u32),
}

/// The scan root could not be walked.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One entry that could not be removed. Reported, never fatal to the batch.
#[derive(Error, Debug)]
#[error("[{id}] {} ({source})", .path.display())]
pub struct DeletionError {
    pub id: u32,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Snapshot persistence failures.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cannot determine user cache dir")]
    NoCacheDir,

    #[error("no cached scan found at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cached scan at {} is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ArgumentError {
    pub fn exit_code(&self) -> u8 {
        EXIT_USAGE
    }
}

impl ScanError {
    pub fn exit_code(&self) -> u8 {
        EXIT_IO
    }
}

impl CacheError {
    /// A missing snapshot blocks the requested operation, which is a usage
    /// problem; everything else is I/O.
    pub fn exit_code(&self) -> u8 {
        match self {
            CacheError::Missing(_) => EXIT_USAGE,
            _ => EXIT_IO,
        }
    }
}

/// Map an error chain to a process exit code.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ArgumentError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<CacheError>() {
            return e.exit_code();
        }
        if let Some(e) = cause.downcast_ref::<ScanError>() {
            return e.exit_code();
        }
    }
    EXIT_IO
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_argument_errors_exit_with_usage_code() {
        let err = anyhow::Error::new(ArgumentError::SelectWithoutDelete);
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
    }

    #[test]
    fn test_missing_cache_is_usage_error() {
        let err = anyhow::Error::new(CacheError::Missing(PathBuf::from("/tmp/x.json")));
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
    }

    #[test]
    fn test_context_does_not_hide_exit_code() {
        let result: Result<(), ArgumentError> = Err(ArgumentError::UnknownId(3));
        let err = result.context("selecting entries").unwrap_err();
        assert_eq!(exit_code_for(&err), EXIT_USAGE);
    }

    #[test]
    fn test_unknown_errors_are_io() {
        let err = anyhow::anyhow!("something broke");
        assert_eq!(exit_code_for(&err), EXIT_IO);
    }

    #[test]
    fn test_select_message() {
        assert_eq!(
            ArgumentError::SelectWithoutDelete.to_string(),
            "--select is only supported with --delete"
        );
    }
}
