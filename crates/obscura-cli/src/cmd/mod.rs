//! Command implementations.

pub mod add;
pub mod check_url;
pub mod compact;
pub mod completions;
pub mod info;
pub mod links;
pub mod list;
pub mod search;
pub mod stats;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use obscura_core::{Catalog, CatalogConfig, LoadOptions, LoadReport};

use crate::ui::Theme;

/// A catalog opened from disk, with the settings used to open it.
#[derive(Debug)]
pub struct Session {
    pub catalog: Catalog,
    pub path: PathBuf,
    pub config: CatalogConfig,
}

/// Resolve the snapshot path: explicit flag, then config, then default.
pub fn resolve_snapshot(flag: Option<&Path>, config: &CatalogConfig) -> Result<PathBuf> {
    flag.map(Path::to_path_buf)
        .or_else(|| config.snapshot_path())
        .context("Could not determine snapshot location. Pass --snapshot or set OBSCURA_HOME.")
}

/// Load config and the snapshot it points at.
pub fn open(flag: Option<&Path>) -> Result<Session> {
    let config = CatalogConfig::load_default().context("Failed to read config")?;
    let path = resolve_snapshot(flag, &config)?;
    if !path.exists() {
        bail!("No snapshot found at {}", path.display());
    }

    let (catalog, report) = Catalog::open(&path, config.load)
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    print_load_warnings(&report);

    Ok(Session {
        catalog,
        path,
        config,
    })
}

/// Open the snapshot for rewriting, or start an empty one if it is absent.
///
/// Load filters from the config are ignored so that every well-formed
/// record is written back. The report tells the caller what a save would
/// drop.
pub fn open_for_update(flag: Option<&Path>) -> Result<(Session, LoadReport)> {
    let config = CatalogConfig::load_default().context("Failed to read config")?;
    let path = resolve_snapshot(flag, &config)?;
    if !path.exists() {
        tracing::info!(path = %path.display(), "starting a new snapshot");
        let session = Session {
            catalog: Catalog::new(),
            path,
            config,
        };
        return Ok((session, LoadReport::default()));
    }

    let (catalog, report) = Catalog::open(&path, LoadOptions::default())
        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
    print_load_warnings(&report);

    let session = Session {
        catalog,
        path,
        config,
    };
    Ok((session, report))
}

fn print_load_warnings(report: &LoadReport) {
    if report.is_clean() {
        return;
    }
    let theme = Theme::default();
    eprintln!(
        "  {} skipped {} malformed record(s) while loading",
        theme.icons.warning.with(theme.colors.warning),
        report.skipped.len()
    );
    for skipped in &report.skipped {
        eprintln!("    {}: {}", skipped.location, skipped.reason);
    }
}
