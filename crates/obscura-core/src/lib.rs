//! Obscura catalog engine.
//!
//! Packages, their versions and download links, and the concurrent
//! [`Catalog`] that serves compatibility queries while being reloaded.
//!
//! # Architecture
//!
//! - **Typestate**: versions are appended to a [`PackageBuilder`] and sorted
//!   once in [`PackageBuilder::build`]; only a built [`Package`] is queryable.
//! - **Copy-on-write**: every catalog write publishes a fresh immutable
//!   [`CatalogView`]; readers never observe a partial reload.

pub mod catalog;
pub mod config;
pub mod entry;
pub mod error;
pub mod link;
pub mod loader;
pub mod package;
pub mod paths;
pub mod stats;

pub use catalog::{Catalog, CatalogView};
pub use config::CatalogConfig;
pub use entry::VersionEntry;
pub use error::CatalogError;
pub use link::DownloadLink;
pub use loader::{LoadOptions, LoadReport, SkippedRecord};
pub use package::{Package, PackageBuilder};
pub use stats::CatalogStats;

pub use obscura_schema::version::{compare, is_later};
pub use obscura_schema::{Arch, ArchMatrix, Artwork, BundleId, Tagged};
