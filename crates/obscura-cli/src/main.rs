//! obscura - application version catalog CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use obscura_cli::cmd;
use obscura_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let snapshot = cli.snapshot.as_deref();

    match cli.command {
        Commands::List { os } => cmd::list::list(snapshot, os.as_deref()),
        Commands::Search { query, os } => cmd::search::search(snapshot, &query, os.as_deref()),
        Commands::Info { bundle, os } => cmd::info::info(snapshot, &bundle, os.as_deref()),
        Commands::Links {
            bundle,
            version,
            os,
        } => cmd::links::links(snapshot, &bundle, &version, os.as_deref()),
        Commands::Stats { os } => cmd::stats::stats(snapshot, os.as_deref()),
        Commands::CheckUrl { url } => cmd::check_url::check_url(snapshot, &url),
        Commands::Add {
            bundle,
            name,
            developer,
            version,
            min_os,
            url,
            build,
            size,
            force,
        } => cmd::add::add(
            snapshot,
            &cmd::add::NewLink {
                bundle,
                name,
                developer,
                version,
                min_os,
                url,
                build,
                size,
            },
            force,
        ),
        Commands::Compact { compress, output } => {
            cmd::compact::compact(snapshot, compress, output.as_deref())
        }
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
