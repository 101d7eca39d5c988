//! Check-url command

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;

use crate::ui::Theme;

/// Report whether `url` is already served by any package
pub fn check_url(snapshot: Option<&Path>, url: &str) -> Result<()> {
    let session = super::open(snapshot)?;
    let theme = Theme::default();
    if session.catalog.url_exists(url) {
        println!("  {} known: {url}", theme.icons.success.green());
    } else {
        println!("  {} not in catalog: {url}", theme.icons.error.red());
    }
    Ok(())
}
