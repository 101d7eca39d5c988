//! obscura - application version catalog tool
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Loads a catalog snapshot and answers the same questions a storefront
//! would: which packages and versions run on a given OS, which links a
//! version offers, and whether a URL is already known. Also ingests new
//! links and rewrites snapshots.

pub mod cmd;
pub mod policy;
pub mod ui;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "obscura")]
#[command(author, version, about = "obscura - application version catalog")]
pub struct Cli {
    /// Snapshot file (defaults to config, then ~/.obscura/apps.json)
    #[arg(long, global = true, env = "OBSCURA_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List packages offered for an OS version
    List {
        /// Client OS version (all packages when omitted)
        #[arg(long)]
        os: Option<String>,
    },
    /// Search packages by name
    Search {
        /// Case-insensitive substring of the name
        query: String,
        /// Only packages offered for this OS version
        #[arg(long)]
        os: Option<String>,
    },
    /// Show a package and its versions
    Info {
        /// Bundle identifier
        bundle: String,
        /// Only versions that run on this OS version
        #[arg(long)]
        os: Option<String>,
    },
    /// Show the download links of one version
    Links {
        /// Bundle identifier
        bundle: String,
        /// Exact version string
        version: String,
        /// Client OS version, used to pick install methods
        #[arg(long)]
        os: Option<String>,
    },
    /// Show catalog statistics
    Stats {
        /// Also count what is usable on this OS version
        #[arg(long)]
        os: Option<String>,
    },
    /// Check whether a URL is already in the catalog
    CheckUrl {
        /// Download URL
        url: String,
    },
    /// Add a download link, creating the package or version as needed
    Add {
        /// Bundle identifier
        #[arg(long)]
        bundle: String,
        /// Display name (used when the package is new)
        #[arg(long)]
        name: Option<String>,
        /// Developer name (used when the package is new)
        #[arg(long)]
        developer: Option<String>,
        /// Version string
        #[arg(long)]
        version: String,
        /// Minimum OS version
        #[arg(long)]
        min_os: String,
        /// Download URL
        #[arg(long)]
        url: String,
        /// Build identifier
        #[arg(long, default_value = "")]
        build: String,
        /// Size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
        /// Save even if malformed records in the snapshot would be dropped
        #[arg(long)]
        force: bool,
    },
    /// Rewrite the snapshot, dropping records that fail to load
    Compact {
        /// Write zstd-compressed output
        #[arg(long)]
        compress: bool,
        /// Output file (defaults to overwriting the snapshot)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}
