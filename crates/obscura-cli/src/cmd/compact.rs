//! Compact command

use std::path::Path;

use anyhow::{Context, Result};
use crossterm::style::Stylize;

use crate::ui::{Theme, format_size};

/// Re-encode the snapshot, dropping records that fail to load or that the
/// configured load filters exclude.
pub fn compact(snapshot: Option<&Path>, compress: bool, output: Option<&Path>) -> Result<()> {
    let session = super::open(snapshot)?;
    let target = output.unwrap_or(&session.path);
    let compress = compress || session.config.compress;

    let before = std::fs::metadata(&session.path).map(|m| m.len()).unwrap_or(0);
    session
        .catalog
        .save_file(target, compress)
        .with_context(|| format!("Failed to write {}", target.display()))?;
    let after = std::fs::metadata(target)
        .with_context(|| format!("Failed to stat {}", target.display()))?
        .len();

    let theme = Theme::default();
    println!(
        "  {} wrote {} packages to {} ({} -> {}{})",
        theme.icons.success.green(),
        session.catalog.len(),
        target.display(),
        format_size(before),
        format_size(after),
        if compress { ", zstd" } else { "" }
    );
    Ok(())
}
