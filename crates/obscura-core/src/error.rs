//! Error types for catalog operations.

use std::io;

use obscura_schema::{BundleId, SnapshotError};
use thiserror::Error;

/// Errors surfaced by the catalog engine.
///
/// Lookups that simply miss (unknown bundle identifier or version) are
/// not errors; they return `None`.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The snapshot as a whole could not be read or decoded.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),

    /// A version string was appended twice to the same package.
    #[error("Package '{bundle_id}' already has version {version}")]
    DuplicateVersion {
        /// The package being built.
        bundle_id: BundleId,
        /// The repeated version string.
        version: String,
    },

    /// An ingestion targeted a package that is not in the catalog.
    #[error("Package '{0}' not found")]
    UnknownPackage(BundleId),

    /// An ingestion targeted a version the package does not have.
    #[error("Package '{bundle_id}' has no version {version}")]
    UnknownVersion {
        /// The package being updated.
        bundle_id: BundleId,
        /// The missing version string.
        version: String,
    },

    /// An ingestion tried to add a URL that the catalog already serves.
    #[error("URL already in catalog: {0}")]
    DuplicateUrl(String),

    /// The configuration file is not valid TOML for [`crate::config::CatalogConfig`].
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// An I/O error outside of snapshot decoding (e.g. reading config).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias used across the crate.
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
