//! Info command

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;
use obscura_schema::version::ANY_OS_VERSION;

use crate::ui::Theme;
use crate::ui::table::plain_table;

/// Show a package's metadata and the versions usable on `os`
pub fn info(snapshot: Option<&Path>, bundle: &str, os: Option<&str>) -> Result<()> {
    let session = super::open(snapshot)?;
    let Some(pkg) = session.catalog.by_bundle_identifier(bundle) else {
        bail!("Package '{bundle}' not found");
    };
    let theme = Theme::default();
    let lw = 12;

    println!();
    println!(
        "  {} {}",
        pkg.name().as_str().with(theme.colors.package_name).bold(),
        pkg.bundle_id().as_str().with(theme.colors.secondary)
    );
    println!();

    let developer = pkg.developer();
    if !developer.value.is_empty() {
        println!("  {:<lw$}{}", "developer", developer.value);
    }
    let artwork = pkg.artwork();
    if artwork.value.is_inline() {
        println!("  {:<lw$}inline image", "artwork");
    } else if !artwork.value.is_empty() {
        println!("  {:<lw$}{}", "artwork", artwork.value.uri());
    }
    if let Some(latest) = pkg.latest() {
        println!(
            "  {:<lw$}{} (requires {})",
            "latest",
            latest.version().with(theme.colors.version),
            latest.minimum_os_version()
        );
    }
    if pkg.uses_derived_display_name() {
        println!("  {:<lw$}from bundle metadata", "name");
    }

    let versions = pkg.supported_versions(os.unwrap_or(ANY_OS_VERSION));
    if versions.is_empty() {
        println!();
        println!(
            "  {} No versions run on {}",
            theme.icons.info.blue(),
            os.unwrap_or("this OS")
        );
        return Ok(());
    }

    let mut table = plain_table(["version", "requires", "links"]);
    for version in versions {
        let links = pkg.links_for(version).map_or(0, <[_]>::len);
        let requires = pkg.minimum_os_version_for(version).unwrap_or("?");
        table.add_row(vec![version.to_string(), requires.to_string(), links.to_string()]);
    }
    println!();
    println!("{table}");
    Ok(())
}
