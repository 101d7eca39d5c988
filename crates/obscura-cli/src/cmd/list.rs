//! List command

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use crossterm::style::Stylize;
use obscura_core::Package;
use obscura_schema::version::ANY_OS_VERSION;

use crate::ui::Theme;
use crate::ui::table::{plain_table, truncate};

/// Print the given packages as a name / bundle / latest-version table.
pub fn print_packages(packages: &[Arc<Package>], os: &str) {
    let theme = Theme::default();
    let mut table = plain_table(["name", "bundle", "latest", "developer"]);
    for pkg in packages {
        let latest = pkg.supported_versions(os).first().copied().unwrap_or("-");
        table.add_row(vec![
            truncate(pkg.name().as_str(), 30),
            pkg.bundle_id().to_string(),
            latest.to_string(),
            pkg.developer().value.clone(),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "{}",
        format!("  {} packages", packages.len()).with(theme.colors.secondary)
    );
}

/// List packages offered for `os`
pub fn list(snapshot: Option<&Path>, os: Option<&str>) -> Result<()> {
    let session = super::open(snapshot)?;
    let os = os.unwrap_or(ANY_OS_VERSION);
    let packages = session.catalog.list_compatible(os);
    print_packages(&packages, os);
    Ok(())
}
