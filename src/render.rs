//! Output capability consumed by the walker, scanner and deletion steps.

use crate::scanner::Entry;
use crate::size::format_size;
use colored::Colorize;

/// Placeholder shown when a `node_modules` path has no commit history.
pub const NO_COMMIT_PLACEHOLDER: &str = "(not a git repo or error)";

/// Semantic channel of a message line; styling is up to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Info,
    Warning,
    Error,
    Success,
    Muted,
}

/// One call per rendered line.
pub trait Render {
    /// A directory row in the tree. `prefix` already includes the connector.
    fn directory(&mut self, prefix: &str, name: &str);
    /// A file row in the tree with its size.
    fn file(&mut self, prefix: &str, name: &str, size: u64);
    /// The summary rows standing in for an undescended `node_modules`.
    fn node_modules(&mut self, prefix: &str, name: &str, size: u64, last_commit: Option<&str>);
    /// A numbered scan result.
    fn entry(&mut self, entry: &Entry);
    fn message(&mut self, tone: Tone, text: &str);
}

pub fn directory_line(prefix: &str, name: &str) -> String {
    format!("{}📁 {}/", prefix, name)
}

pub fn file_line(prefix: &str, name: &str) -> String {
    format!("{}📄 {}", prefix, name)
}

pub fn node_modules_lines(
    prefix: &str,
    name: &str,
    size: u64,
    last_commit: Option<&str>,
) -> [String; 2] {
    [
        format!(
            "{}[skipping {}/] (total size: {})",
            prefix,
            name,
            format_size(size)
        ),
        format!(
            "{}Last commit: {}",
            prefix,
            last_commit.unwrap_or(NO_COMMIT_PLACEHOLDER)
        ),
    ]
}

pub fn entry_line(entry: &Entry) -> String {
    format!(
        "  [{}] {} ({})",
        entry.id,
        entry.path,
        format_size(entry.size_bytes)
    )
}

/// Colored terminal output on stdout.
#[derive(Debug, Default)]
pub struct ConsoleRender;

impl Render for ConsoleRender {
    fn directory(&mut self, prefix: &str, name: &str) {
        println!("{}", directory_line(prefix, name).blue());
    }

    fn file(&mut self, prefix: &str, name: &str, size: u64) {
        println!(
            "{}{}",
            file_line(prefix, name).white(),
            format!(" ({})", format_size(size)).bright_black()
        );
    }

    fn node_modules(&mut self, prefix: &str, name: &str, size: u64, last_commit: Option<&str>) {
        for line in node_modules_lines(prefix, name, size, last_commit) {
            println!("{}", line.red());
        }
    }

    fn entry(&mut self, entry: &Entry) {
        println!("{}", entry_line(entry));
    }

    fn message(&mut self, tone: Tone, text: &str) {
        match tone {
            Tone::Plain => println!("{}", text),
            Tone::Info => println!("{}", text.cyan()),
            Tone::Warning => println!("{}", text.yellow()),
            Tone::Error => eprintln!("{}", format!("❌ {}", text).red()),
            Tone::Success => println!("{}", format!("✅ {}", text).green()),
            Tone::Muted => println!("{}", text.bright_black()),
        }
    }
}

/// Keeps every rendered line as plain text, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryRender {
    pub lines: Vec<(Tone, String)>,
}

impl MemoryRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines without their tone.
    pub fn text(&self) -> Vec<&str> {
        self.lines.iter().map(|(_, line)| line.as_str()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|(_, line)| line.contains(needle))
    }
}

impl Render for MemoryRender {
    fn directory(&mut self, prefix: &str, name: &str) {
        self.lines.push((Tone::Info, directory_line(prefix, name)));
    }

    fn file(&mut self, prefix: &str, name: &str, size: u64) {
        self.lines.push((
            Tone::Info,
            format!("{} ({})", file_line(prefix, name), format_size(size)),
        ));
    }

    fn node_modules(&mut self, prefix: &str, name: &str, size: u64, last_commit: Option<&str>) {
        for line in node_modules_lines(prefix, name, size, last_commit) {
            self.lines.push((Tone::Warning, line));
        }
    }

    fn entry(&mut self, entry: &Entry) {
        self.lines.push((Tone::Info, entry_line(entry)));
    }

    fn message(&mut self, tone: Tone, text: &str) {
        self.lines.push((tone, text.to_string()));
    }
}
