//! Packages and their two-phase construction.
//!
//! A [`PackageBuilder`] accumulates versions in O(1) appends and sorts once
//! in [`PackageBuilder::build`]. Only the finished [`Package`] can be
//! queried or published to a catalog, so an unsorted version list is never
//! observable by readers.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use obscura_schema::version::compare;
use obscura_schema::{Artwork, BundleId, PackageRecord, Tagged};

use crate::entry::VersionEntry;
use crate::error::{CatalogError, Result};
use crate::link::DownloadLink;

/// Collects versions for a package before it is sorted and frozen.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    name: String,
    bundle_id: BundleId,
    developer: Tagged<String>,
    artwork: Tagged<Artwork>,
    derived_display_name: bool,
    versions: Vec<VersionEntry>,
    seen: HashSet<String>,
    shared: Option<Arc<Metadata>>,
}

impl PackageBuilder {
    /// Start a package with its display name and bundle identifier.
    pub fn new(name: impl Into<String>, bundle_id: impl Into<BundleId>) -> Self {
        Self {
            name: name.into(),
            bundle_id: bundle_id.into(),
            developer: Tagged::default(),
            artwork: Tagged::default(),
            derived_display_name: false,
            versions: Vec::new(),
            seen: HashSet::new(),
            shared: None,
        }
    }

    /// The identifier this builder will produce a package for.
    pub fn bundle_id(&self) -> &BundleId {
        &self.bundle_id
    }

    /// Set the developer name and its freshness token.
    ///
    /// On a builder from [`Package::to_builder`] this detaches the metadata
    /// from the published package.
    pub fn developer(mut self, developer: Tagged<String>) -> Self {
        self.detach();
        self.developer = developer;
        self
    }

    /// Set the artwork and its freshness token. Detaches like
    /// [`PackageBuilder::developer`].
    pub fn artwork(mut self, artwork: Tagged<Artwork>) -> Self {
        self.detach();
        self.artwork = artwork;
        self
    }

    /// Mark the display name as derived from bundle metadata. Detaches like
    /// [`PackageBuilder::developer`].
    pub fn derived_display_name(mut self, derived: bool) -> Self {
        self.detach();
        self.derived_display_name = derived;
        self
    }

    /// Take a private copy of shared metadata so setters do not leak into a
    /// published package.
    fn detach(&mut self) {
        if let Some(meta) = self.shared.take() {
            self.name = meta.name.load().as_str().to_string();
            self.developer = (*meta.developer.load()).clone();
            self.artwork = (*meta.artwork.load()).clone();
            self.derived_display_name = meta.derived_display_name.load(Ordering::Acquire);
        }
    }

    /// Append a version without sorting.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateVersion`] if `version` was already
    /// appended; the builder is left unchanged.
    pub fn append_version(
        &mut self,
        version: impl Into<String>,
        links: Vec<DownloadLink>,
        minimum_os_version: impl Into<String>,
    ) -> Result<()> {
        let version = version.into();
        if !self.seen.insert(version.clone()) {
            return Err(CatalogError::DuplicateVersion {
                bundle_id: self.bundle_id.clone(),
                version,
            });
        }
        self.versions
            .push(VersionEntry::new(version, minimum_os_version, links));
        Ok(())
    }

    /// Append links to a version that was already appended.
    ///
    /// Existing links keep their positions; the new ones go last.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownVersion`] if `version` is not present.
    pub fn append_links(&mut self, version: &str, links: Vec<DownloadLink>) -> Result<()> {
        let Some(entry) = self.versions.iter_mut().find(|v| v.version() == version) else {
            return Err(CatalogError::UnknownVersion {
                bundle_id: self.bundle_id.clone(),
                version: version.to_string(),
            });
        };
        entry.extend_links(links);
        Ok(())
    }

    /// Stable sort of versions, newest first. Idempotent.
    pub fn sort_versions(&mut self) {
        self.versions
            .sort_by(|a, b| compare(b.version(), a.version()));
    }

    /// Versions in their current order.
    pub fn versions(&self) -> &[VersionEntry] {
        &self.versions
    }

    /// Sort and freeze into a queryable [`Package`].
    pub fn build(mut self) -> Package {
        self.sort_versions();

        let urls = self
            .versions
            .iter()
            .flat_map(VersionEntry::links_in_original_order)
            .map(|link| link.url().to_string())
            .collect();

        let meta = self.shared.unwrap_or_else(|| {
            Arc::new(Metadata {
                name: Slot::new(self.name),
                developer: Slot::new(self.developer),
                artwork: Slot::new(self.artwork),
                derived_display_name: AtomicBool::new(self.derived_display_name),
            })
        });

        Package {
            bundle_id: self.bundle_id,
            meta,
            versions: self.versions,
            urls,
        }
    }
}

/// A metadata field that can be replaced while readers hold the old value.
#[derive(Debug)]
struct Slot<T>(RwLock<Arc<T>>);

impl<T> Slot<T> {
    fn new(value: T) -> Self {
        Self(RwLock::new(Arc::new(value)))
    }

    fn load(&self) -> Arc<T> {
        Arc::clone(&self.0.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn store(&self, value: T) {
        let value = Arc::new(value);
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = value;
    }
}

/// Refreshable display metadata, shared by every package derived from the
/// same published one.
#[derive(Debug)]
struct Metadata {
    name: Slot<String>,
    developer: Slot<Tagged<String>>,
    artwork: Slot<Tagged<Artwork>>,
    derived_display_name: AtomicBool,
}

/// A distributable application with its released versions.
///
/// The bundle identifier and version history are fixed once built. Display
/// metadata (name, developer, artwork, derived-name flag) can be refreshed
/// in place; each field is swapped independently without blocking readers
/// of the others. Packages derived through [`Package::to_builder`] share the
/// same metadata cells, so a refresh applied to a superseded package is
/// still seen by its successor.
#[derive(Debug)]
pub struct Package {
    bundle_id: BundleId,
    meta: Arc<Metadata>,
    versions: Vec<VersionEntry>,
    urls: HashSet<String>,
}

impl Package {
    /// Start building a package.
    pub fn builder(name: impl Into<String>, bundle_id: impl Into<BundleId>) -> PackageBuilder {
        PackageBuilder::new(name, bundle_id)
    }

    /// Copy this package's versions into a new builder.
    ///
    /// Used to derive a new package (e.g. with an extra version) without
    /// touching the published one. The built package shares this package's
    /// metadata cells unless a metadata setter is called on the builder.
    pub fn to_builder(&self) -> PackageBuilder {
        let mut builder = PackageBuilder::new(self.name().as_str(), self.bundle_id.clone());
        builder.seen = self.versions.iter().map(|v| v.version().to_string()).collect();
        builder.versions = self.versions.clone();
        builder.shared = Some(Arc::clone(&self.meta));
        builder
    }

    /// Primary key.
    pub fn bundle_id(&self) -> &BundleId {
        &self.bundle_id
    }

    /// Current display name.
    pub fn name(&self) -> Arc<String> {
        self.meta.name.load()
    }

    /// Current developer name and token.
    pub fn developer(&self) -> Arc<Tagged<String>> {
        self.meta.developer.load()
    }

    /// Current artwork and token.
    pub fn artwork(&self) -> Arc<Tagged<Artwork>> {
        self.meta.artwork.load()
    }

    /// True when the display name came from bundle metadata.
    pub fn uses_derived_display_name(&self) -> bool {
        self.meta.derived_display_name.load(Ordering::Acquire)
    }

    /// Replace the display name.
    pub fn rename(&self, name: impl Into<String>) {
        self.meta.name.store(name.into());
    }

    /// Replace the developer name. The token is stored, not checked.
    pub fn update_developer(&self, token: Option<String>, developer: impl Into<String>) {
        self.meta.developer.store(Tagged::new(developer.into(), token));
    }

    /// Replace the artwork. The token is stored, not checked.
    pub fn update_artwork(&self, token: Option<String>, artwork: Artwork) {
        self.meta.artwork.store(Tagged::new(artwork, token));
    }

    /// Record that the display name was derived from bundle metadata.
    pub fn mark_derived_display_name(&self) {
        self.meta.derived_display_name.store(true, Ordering::Release);
    }

    /// All versions, newest first.
    pub fn versions(&self) -> &[VersionEntry] {
        &self.versions
    }

    /// The newest version, if any.
    pub fn latest(&self) -> Option<&VersionEntry> {
        self.versions.first()
    }

    /// Exact lookup of a version entry.
    pub fn version(&self, version: &str) -> Option<&VersionEntry> {
        self.versions.iter().find(|v| v.version() == version)
    }

    /// True if at least one version runs on `os`.
    pub fn is_offered_for(&self, os: &str) -> bool {
        self.versions.iter().any(|v| v.is_supported_on(os))
    }

    /// Version strings that run on `os`, newest first.
    pub fn supported_versions(&self, os: &str) -> Vec<&str> {
        self.versions
            .iter()
            .filter(|v| v.is_supported_on(os))
            .map(VersionEntry::version)
            .collect()
    }

    /// Links for an exact version string, in ingestion order.
    pub fn links_for(&self, version: &str) -> Option<&[DownloadLink]> {
        self.version(version).map(VersionEntry::links_in_original_order)
    }

    /// OS floor for an exact version string.
    pub fn minimum_os_version_for(&self, version: &str) -> Option<&str> {
        self.version(version).map(VersionEntry::minimum_os_version)
    }

    /// Every URL across all versions. Duplicates collapse.
    pub fn all_urls(&self) -> &HashSet<String> {
        &self.urls
    }

    /// URLs of the versions that run on `os`.
    pub fn all_urls_for(&self, os: &str) -> HashSet<&str> {
        self.versions
            .iter()
            .filter(|v| v.is_supported_on(os))
            .flat_map(VersionEntry::links_in_original_order)
            .map(DownloadLink::url)
            .collect()
    }

    /// Serialize back into the snapshot form.
    pub fn to_record(&self) -> PackageRecord {
        let developer = self.developer();
        let artwork = self.artwork();
        PackageRecord {
            name: self.name().as_str().to_string(),
            bundle_id: self.bundle_id.to_string(),
            developer: (!developer.value.is_empty()).then(|| developer.value.clone()),
            developer_token: developer.token.clone(),
            artwork: (!artwork.value.is_empty()).then(|| artwork.value.uri().to_string()),
            artwork_token: artwork.token.clone(),
            derived_display_name: self.uses_derived_display_name(),
            versions: self.versions.iter().map(VersionEntry::to_record).collect(),
        }
    }
}
