//! Confirmation gate before a full scan.

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Token the user must type to start a scan.
pub const CONFIRM_TOKEN: &str = "START";

pub trait Confirm {
    /// Ask whether to scan `root`. Anything but a clear yes is a no.
    fn confirm(&mut self, root: &Path) -> bool;
}

/// Reads one line from a reader and compares it to [`CONFIRM_TOKEN`].
pub struct LineConfirm<R> {
    reader: R,
}

impl<R: BufRead> LineConfirm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

/// The interactive gate on standard input.
pub fn stdin_confirm() -> LineConfirm<io::StdinLock<'static>> {
    LineConfirm::new(io::stdin().lock())
}

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self, root: &Path) -> bool {
        println!("{}", "This can take a while depending on project size.".yellow());
        println!(
            "{}",
            format!(
                "Type {} to begin scanning node_modules under: {}",
                CONFIRM_TOKEN,
                root.display()
            )
            .yellow()
        );
        print!("> ");
        // Make sure the prompt is displayed before blocking
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) | Err(_) => false,
            Ok(_) => line.trim() == CONFIRM_TOKEN,
        }
    }
}
