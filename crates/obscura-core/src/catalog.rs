//! The concurrent package catalog.
//!
//! Readers take an `Arc<CatalogView>` and query it without holding any
//! lock. Writers build a complete new view off to the side and publish it
//! with a single pointer swap, so a reader sees either the old generation
//! or the new one in full. Readers still holding the old view finish on
//! it undisturbed.
//!
//! Writers are serialized among themselves so two concurrent `add` calls
//! cannot both copy the same base view and lose one insert.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use obscura_schema::BundleId;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};
use crate::link::DownloadLink;
use crate::package::{Package, PackageBuilder};

/// An immutable generation of the catalog.
#[derive(Debug, Default)]
pub struct CatalogView {
    generation: u64,
    packages: Vec<Arc<Package>>,
    index: HashMap<BundleId, usize>,
    urls: HashSet<String>,
}

impl CatalogView {
    /// Build a view, keeping the first package for each bundle identifier.
    fn build(generation: u64, packages: Vec<Arc<Package>>) -> Self {
        let mut view = Self {
            generation,
            packages: Vec::with_capacity(packages.len()),
            index: HashMap::with_capacity(packages.len()),
            urls: HashSet::new(),
        };
        for package in packages {
            if view.index.contains_key(package.bundle_id()) {
                debug!(bundle_id = %package.bundle_id(), "dropping duplicate bundle identifier");
                continue;
            }
            view.push(package);
        }
        view
    }

    fn push(&mut self, package: Arc<Package>) {
        self.index
            .insert(package.bundle_id().clone(), self.packages.len());
        self.urls.extend(package.all_urls().iter().cloned());
        self.packages.push(package);
    }

    /// Copy this view with one package replaced by `package`.
    fn with_replaced(&self, generation: u64, package: Arc<Package>) -> Self {
        let packages = self
            .packages
            .iter()
            .map(|p| {
                if p.bundle_id() == package.bundle_id() {
                    Arc::clone(&package)
                } else {
                    Arc::clone(p)
                }
            })
            .collect();
        Self::build(generation, packages)
    }

    /// Publication counter; increases with every successful write.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True if the catalog holds no packages.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// All packages in catalog order.
    pub fn packages(&self) -> &[Arc<Package>] {
        &self.packages
    }

    /// Look up a package by bundle identifier.
    pub fn by_bundle_identifier(&self, id: &str) -> Option<&Arc<Package>> {
        self.index.get(id).map(|idx| &self.packages[*idx])
    }

    /// Packages offering at least one version for `os`, in catalog order.
    pub fn list_compatible(&self, os: &str) -> Vec<Arc<Package>> {
        self.packages
            .iter()
            .filter(|p| p.is_offered_for(os))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search on display name.
    ///
    /// When `os` is given only packages offered for it are considered.
    /// Results are ordered by name length, shortest first; ties keep
    /// catalog order.
    pub fn search(&self, query: &str, os: Option<&str>) -> Vec<Arc<Package>> {
        let query = query.to_lowercase();
        let mut hits: Vec<(usize, Arc<Package>)> = self
            .packages
            .iter()
            .filter(|p| os.is_none_or(|os| p.is_offered_for(os)))
            .filter_map(|p| {
                let name = p.name();
                name.to_lowercase()
                    .contains(&query)
                    .then(|| (name.chars().count(), Arc::clone(p)))
            })
            .collect();
        hits.sort_by_key(|(len, _)| *len);
        hits.into_iter().map(|(_, p)| p).collect()
    }

    /// True if any package serves `url`.
    pub fn url_exists(&self, url: &str) -> bool {
        self.urls.contains(url)
    }
}

/// The shared, concurrently readable set of packages.
#[derive(Debug, Default)]
pub struct Catalog {
    current: RwLock<Arc<CatalogView>>,
    writer: Mutex<()>,
}

impl Catalog {
    /// Create an empty catalog (generation 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog already holding `packages`.
    pub fn with_packages(packages: Vec<Package>) -> Self {
        let catalog = Self::new();
        catalog.replace_all(packages);
        catalog
    }

    /// The current generation. Hold on to it for a consistent multi-query read.
    pub fn view(&self) -> Arc<CatalogView> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn publish(&self, view: CatalogView) {
        let generation = view.generation;
        let packages = view.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(view);
        debug!(generation, packages, "published catalog generation");
    }

    /// Replace the whole catalog atomically.
    ///
    /// Packages sharing a bundle identifier keep the first occurrence.
    /// Returns the new generation number.
    pub fn replace_all(&self, packages: Vec<Package>) -> u64 {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let generation = self.view().generation + 1;
        let view = CatalogView::build(generation, packages.into_iter().map(Arc::new).collect());
        info!(generation, packages = view.len(), "catalog replaced");
        self.publish(view);
        generation
    }

    /// Insert `package` unless its bundle identifier is already present.
    ///
    /// Returns whether it was inserted. An existing package is left as is.
    pub fn add(&self, package: Package) -> bool {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.view();
        if base.index.contains_key(package.bundle_id()) {
            debug!(bundle_id = %package.bundle_id(), "add ignored, bundle identifier exists");
            return false;
        }

        let mut packages = base.packages.clone();
        packages.push(Arc::new(package));
        self.publish(CatalogView::build(base.generation + 1, packages));
        true
    }

    /// Derive a new version of a published package and swap it in.
    ///
    /// `links` must not contain any URL the catalog already serves.
    fn republish(
        &self,
        bundle_id: &str,
        links: &[DownloadLink],
        change: impl FnOnce(&mut PackageBuilder) -> Result<()>,
    ) -> Result<u64> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let base = self.view();
        let existing = base
            .by_bundle_identifier(bundle_id)
            .ok_or_else(|| CatalogError::UnknownPackage(BundleId::new(bundle_id)))?;

        let mut batch = HashSet::new();
        for link in links {
            if base.url_exists(link.url()) || !batch.insert(link.url()) {
                return Err(CatalogError::DuplicateUrl(link.url().to_string()));
            }
        }

        let mut builder = existing.to_builder();
        change(&mut builder)?;
        let generation = base.generation + 1;
        self.publish(base.with_replaced(generation, Arc::new(builder.build())));
        Ok(generation)
    }

    /// Add a version to an already published package.
    ///
    /// A new package is derived from the published one and swapped in with
    /// a new generation; readers of the old generation are unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPackage`] if `bundle_id` is not in the
    /// catalog, [`CatalogError::DuplicateUrl`] if any link URL is already
    /// served anywhere, or [`CatalogError::DuplicateVersion`] if the package
    /// already has `version`.
    pub fn publish_version(
        &self,
        bundle_id: &str,
        version: &str,
        links: Vec<DownloadLink>,
        minimum_os_version: &str,
    ) -> Result<u64> {
        let batch = links.clone();
        let generation = self.republish(bundle_id, &batch, |builder| {
            builder.append_version(version, links, minimum_os_version)
        })?;
        info!(bundle_id, version, generation, "published new version");
        Ok(generation)
    }

    /// Append links to an existing version of a published package.
    ///
    /// The new links go after the existing ones, so indices handed out
    /// earlier still address the same link.
    ///
    /// # Errors
    ///
    /// As [`Catalog::publish_version`], with [`CatalogError::UnknownVersion`]
    /// in place of the duplicate-version case.
    pub fn publish_links(
        &self,
        bundle_id: &str,
        version: &str,
        links: Vec<DownloadLink>,
    ) -> Result<u64> {
        let batch = links.clone();
        let generation = self.republish(bundle_id, &batch, |builder| {
            builder.append_links(version, links)
        })?;
        info!(bundle_id, version, generation, "published new links");
        Ok(generation)
    }

    /// See [`CatalogView::by_bundle_identifier`].
    pub fn by_bundle_identifier(&self, id: &str) -> Option<Arc<Package>> {
        self.view().by_bundle_identifier(id).cloned()
    }

    /// See [`CatalogView::list_compatible`].
    pub fn list_compatible(&self, os: &str) -> Vec<Arc<Package>> {
        self.view().list_compatible(os)
    }

    /// See [`CatalogView::search`].
    pub fn search(&self, query: &str, os: Option<&str>) -> Vec<Arc<Package>> {
        self.view().search(query, os)
    }

    /// See [`CatalogView::url_exists`].
    pub fn url_exists(&self, url: &str) -> bool {
        self.view().url_exists(url)
    }

    /// Number of packages in the current generation.
    pub fn len(&self) -> usize {
        self.view().len()
    }

    /// True if the current generation is empty.
    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }
}
