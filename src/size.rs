//! Human-readable byte counts.

use humansize::{FormatSizeOptions, WINDOWS};

/// Format a byte count with 1024-based units and `KB`/`MB`/... suffixes,
/// using the smallest unit that keeps the value below 1024.
pub fn format_size(bytes: u64) -> String {
    let formatted =
        humansize::format_size(bytes, FormatSizeOptions::from(WINDOWS).decimal_places(1));
    // humansize spells the kilo unit `kB`
    match formatted.strip_suffix(" kB") {
        Some(value) => format!("{} KB", value),
        None => formatted,
    }
}
