//! Add command

use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::style::Stylize;
use obscura_core::{ArchMatrix, DownloadLink, Package, Tagged};

use crate::ui::Theme;

/// One download link to ingest, with enough context to place it.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub bundle: String,
    pub name: Option<String>,
    pub developer: Option<String>,
    pub version: String,
    pub min_os: String,
    pub url: String,
    pub build: String,
    pub size: u64,
}

/// Ingest a link into the snapshot, creating the package or version as needed.
///
/// A snapshot with skipped records is left untouched unless `force` is set.
pub fn add(snapshot: Option<&Path>, new: &NewLink, force: bool) -> Result<()> {
    let (session, report) = super::open_for_update(snapshot)?;
    if !report.is_clean() && !force {
        bail!(
            "{} has {} malformed record(s) that saving would drop. Fix them, run `obscura compact`, or pass --force.",
            session.path.display(),
            report.skipped.len()
        );
    }
    let catalog = &session.catalog;
    let theme = Theme::default();

    if catalog.url_exists(&new.url) {
        bail!("URL already in catalog: {}", new.url);
    }

    // Architecture metadata is filled in later by whoever inspects the binary.
    let link = DownloadLink::new(
        ArchMatrix::unavailable(),
        new.url.as_str(),
        new.build.as_str(),
        new.size,
    );

    let action = match catalog.by_bundle_identifier(&new.bundle) {
        Some(pkg) if pkg.version(&new.version).is_some() => {
            catalog.publish_links(&new.bundle, &new.version, vec![link])?;
            "added link to"
        }
        Some(_) => {
            catalog.publish_version(&new.bundle, &new.version, vec![link], &new.min_os)?;
            "added version to"
        }
        None => {
            let name = new.name.as_deref().unwrap_or(&new.bundle);
            let developer = new.developer.clone().unwrap_or_default();
            let mut builder = Package::builder(name, new.bundle.as_str())
                .developer(Tagged::new(developer, None));
            builder.append_version(new.version.as_str(), vec![link], new.min_os.as_str())?;
            if !catalog.add(builder.build()) {
                bail!("Package '{}' was added concurrently", new.bundle);
            }
            "created"
        }
    };

    catalog
        .save_file(&session.path, session.config.compress)
        .with_context(|| format!("Failed to write {}", session.path.display()))?;

    println!(
        "  {} {} {} {}",
        theme.icons.success.green(),
        action,
        new.bundle.as_str().with(theme.colors.package_name),
        new.version.as_str().with(theme.colors.version)
    );
    Ok(())
}
