//! Table rendering for catalog listings.

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, ContentArrangement, Table};

/// A borderless table with a dimmed header row.
pub fn plain_table<I, S>(header: I) -> Table
where
    I: IntoIterator<Item = S>,
    S: Into<Cell>,
{
    let mut table = Table::new();
    table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Truncate a display name to `len` characters, adding an ellipsis.
pub fn truncate(name: &str, len: usize) -> String {
    let name = name.trim();
    if name.chars().count() <= len {
        return name.to_string();
    }
    let cut: String = name.chars().take(len).collect();
    format!("{}...", cut.trim_end())
}
