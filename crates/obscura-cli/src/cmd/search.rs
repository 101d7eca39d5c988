//! Search command

use std::path::Path;

use anyhow::Result;
use crossterm::style::Stylize;
use obscura_schema::version::ANY_OS_VERSION;

use crate::ui::Theme;

/// Search packages by name, shortest names first
pub fn search(snapshot: Option<&Path>, query: &str, os: Option<&str>) -> Result<()> {
    let start = std::time::Instant::now();
    let session = super::open(snapshot)?;
    let results = session.catalog.search(query, os);
    let theme = Theme::default();

    if results.is_empty() {
        println!();
        println!(
            "  {} No packages found matching '{}'",
            theme.icons.info.blue(),
            query.white()
        );
        println!();
        return Ok(());
    }

    super::list::print_packages(&results, os.unwrap_or(ANY_OS_VERSION));

    let elapsed = start.elapsed();
    println!(
        "SEARCH COMPLETE {}, elapsed {:.2}s",
        results.len(),
        elapsed.as_secs_f64()
    );
    Ok(())
}
