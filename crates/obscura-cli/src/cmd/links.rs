//! Links command

use std::path::Path;

use anyhow::{Result, bail};
use crossterm::style::Stylize;

use crate::policy;
use crate::ui::table::{plain_table, truncate};
use crate::ui::{Theme, format_size};

/// Show every link of one version, in catalog order
pub fn links(snapshot: Option<&Path>, bundle: &str, version: &str, os: Option<&str>) -> Result<()> {
    let session = super::open(snapshot)?;
    let Some(pkg) = session.catalog.by_bundle_identifier(bundle) else {
        bail!("Package '{bundle}' not found");
    };
    let Some(links) = pkg.links_for(version) else {
        bail!("Package '{bundle}' has no version {version}");
    };
    let theme = Theme::default();
    let requires = pkg.minimum_os_version_for(version).unwrap_or("?");

    println!();
    println!(
        "  {} {}  requires {}",
        truncate(pkg.name().as_str(), 20).with(theme.colors.package_name).bold(),
        version.with(theme.colors.version),
        requires
    );
    println!();

    let methods = policy::install_methods(os)
        .iter()
        .map(policy::InstallMethod::label)
        .collect::<Vec<_>>()
        .join(", ");

    let mut table = plain_table([
        "#",
        "host",
        "build",
        "size",
        "architectures",
        "installable",
        "max os",
    ]);
    for (i, link) in links.iter().enumerate() {
        let mut host = link.host().unwrap_or("?").to_string();
        if link.is_https() {
            host.push_str(", SSL");
        }
        table.add_row(vec![
            (i + 1).to_string(),
            host,
            link.build_version().to_string(),
            format_size(link.size_bytes()),
            policy::describe_architectures(link),
            if policy::is_installable(link) { "yes" } else { "no" }.to_string(),
            policy::max_os_version(link).unwrap_or("-").to_string(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  install via: {methods}");
    Ok(())
}
