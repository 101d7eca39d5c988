//! Stats command

use std::path::Path;

use anyhow::Result;

/// Print package, version and URL counts
pub fn stats(snapshot: Option<&Path>, os: Option<&str>) -> Result<()> {
    let session = super::open(snapshot)?;
    let view = session.catalog.view();
    let lw = 20;

    let total = view.stats(None);
    println!();
    println!("  {:<lw$}{}", "packages", total.packages);
    println!("  {:<lw$}{}", "versions", total.versions);
    println!("  {:<lw$}{}", "urls", total.urls);

    if let Some(os) = os {
        let usable = view.stats(Some(os));
        println!();
        println!("  on {os}");
        println!("  {:<lw$}{}", "packages", usable.packages);
        println!("  {:<lw$}{}", "versions", usable.versions);
        println!("  {:<lw$}{}", "urls", usable.urls);
    }
    Ok(())
}
