//! Argument grammar for `node_modules` mode.
//!
//! Non-flag tokens are classified by shape: anything that looks like an id
//! list is parsed as one, and the first remaining token is the scan root. A
//! directory literally named like an id (`7`, `id3`) is therefore read as ids.

use crate::error::ArgumentError;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    DeleteAll,
    DeleteSelected,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionRequest {
    pub root: PathBuf,
    pub mode: Mode,
    /// Ascending and unique. Non-empty for `DeleteSelected`.
    pub ids: Vec<u32>,
}

impl SelectionRequest {
    pub fn deletes(&self) -> bool {
        self.mode != Mode::ReadOnly
    }
}

fn strip_id_prefix(token: &str) -> &str {
    match token.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("id") => &token[2..],
        _ => token,
    }
}

/// Heuristic: bracketed, comma separated, or a single `N` / `idN`
pub fn is_likely_id_list(token: &str) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }
    if token.starts_with('[') && token.contains(']') {
        return true;
    }
    if token.contains(',') {
        return true;
    }
    strip_id_prefix(token).parse::<i64>().is_ok()
}

/// Parse `[1,2]`, `1,2`, `id1,id2`, `7` or `id7` into sorted unique ids.
pub fn parse_ids(input: &str) -> Result<Vec<u32>, ArgumentError> {
    let input = input.trim();
    let input = input.strip_prefix('[').unwrap_or(input);
    let input = input.strip_suffix(']').unwrap_or(input).trim();
    if input.is_empty() {
        return Err(ArgumentError::EmptyIdList);
    }

    let mut ids = BTreeSet::new();
    for part in input.split(',') {
        let token = strip_id_prefix(part.trim());
        match token.parse::<u32>() {
            Ok(id) if id > 0 => {
                ids.insert(id);
            }
            _ => return Err(ArgumentError::InvalidId(token.to_string())),
        }
    }
    Ok(ids.into_iter().collect())
}

/// Parse the arguments following `node_modules`.
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<SelectionRequest, ArgumentError> {
    let mut read = false;
    let mut delete = false;
    let mut select = false;
    let mut root: Option<PathBuf> = None;
    let mut ids = Vec::new();

    for arg in args {
        let arg = arg.as_ref();
        match arg {
            "--read" => read = true,
            "--delete" => delete = true,
            "--select" => select = true,
            _ if arg.starts_with("--") => {
                return Err(ArgumentError::UnknownFlag(arg.to_string()));
            }
            _ if is_likely_id_list(arg) => ids = parse_ids(arg)?,
            _ if root.is_none() => root = Some(PathBuf::from(arg)),
            _ => return Err(ArgumentError::UnexpectedArgument(arg.to_string())),
        }
    }

    if select && !delete {
        return Err(ArgumentError::SelectWithoutDelete);
    }
    if select && ids.is_empty() {
        return Err(ArgumentError::MissingIds);
    }

    let mode = match (read, delete, select) {
        (_, true, true) => Mode::DeleteSelected,
        (_, true, false) => Mode::DeleteAll,
        _ => Mode::ReadOnly,
    };
    if mode != Mode::DeleteSelected {
        ids.clear();
    }

    Ok(SelectionRequest {
        root: root.unwrap_or_else(|| PathBuf::from(".")),
        mode,
        ids,
    })
}
