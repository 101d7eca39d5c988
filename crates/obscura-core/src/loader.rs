//! Snapshot loading and saving.
//!
//! Decoding happens one level at a time: packages, then versions, then
//! links. A record that fails to decode is skipped and reported, its
//! siblings still load. Only a snapshot that is not a JSON array at all
//! fails the load, and in that case the catalog keeps its current
//! generation.

use std::collections::HashSet;
use std::path::Path;

use obscura_schema::snapshot::{self, RawPackageRecord, RawVersionRecord};
use obscura_schema::{Artwork, LinkRecord, PackageRecord, Tagged};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::error::Result;
use crate::link::DownloadLink;
use crate::package::{Package, PackageBuilder};

/// Filters applied while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Skip packages that have no artwork.
    pub skip_empty_artwork: bool,
    /// Skip packages whose artwork is an inline `data:` URI.
    pub skip_inline_artwork: bool,
}

/// Where in the snapshot a skipped record was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLocation {
    /// Index of the package record.
    pub package: usize,
    /// Bundle identifier, when the package record got far enough to have one.
    pub bundle_id: Option<String>,
    /// Index of the version record within the package.
    pub version: Option<usize>,
    /// Index of the link record within the version.
    pub link: Option<usize>,
}

impl std::fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "packages[{}]", self.package)?;
        if let Some(id) = &self.bundle_id {
            write!(f, " ({id})")?;
        }
        if let Some(v) = self.version {
            write!(f, ".versions[{v}]")?;
        }
        if let Some(l) = self.link {
            write!(f, ".urls[{l}]")?;
        }
        Ok(())
    }
}

/// A record that was dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the snapshot.
    pub location: RecordLocation,
    /// Why it was dropped.
    pub reason: String,
}

/// Outcome of a load that did not fail outright.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Packages that made it into the catalog.
    pub loaded: usize,
    /// Packages dropped by [`LoadOptions`] filters.
    pub filtered: usize,
    /// Malformed or conflicting records that were skipped.
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    /// True when nothing had to be skipped.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }

    fn skip(&mut self, location: RecordLocation, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(%location, %reason, "skipping snapshot record");
        self.skipped.push(SkippedRecord { location, reason });
    }
}

/// Decode snapshot bytes into finished packages.
///
/// # Errors
///
/// Fails only when the snapshot as a whole is unreadable.
pub fn parse(bytes: &[u8], options: LoadOptions) -> Result<(Vec<Package>, LoadReport)> {
    let raw = snapshot::decode(bytes)?;
    Ok(build_packages(raw, options))
}

/// Turn undecoded package values into packages, skipping what does not fit.
pub fn build_packages(
    raw: Vec<serde_json::Value>,
    options: LoadOptions,
) -> (Vec<Package>, LoadReport) {
    let mut report = LoadReport::default();
    let mut packages = Vec::with_capacity(raw.len());
    let mut seen = HashSet::new();

    for (idx, value) in raw.into_iter().enumerate() {
        let mut location = RecordLocation {
            package: idx,
            bundle_id: None,
            version: None,
            link: None,
        };

        let record: RawPackageRecord = match serde_json::from_value(value) {
            Ok(record) => record,
            Err(e) => {
                report.skip(location, e.to_string());
                continue;
            }
        };
        location.bundle_id = Some(record.bundle_id.clone());

        let artwork = Artwork::new(record.artwork.as_deref().unwrap_or_default());
        if (options.skip_empty_artwork && artwork.is_empty())
            || (options.skip_inline_artwork && artwork.is_inline())
        {
            report.filtered += 1;
            continue;
        }

        if !seen.insert(record.bundle_id.clone()) {
            report.skip(location, "duplicate bundle identifier");
            continue;
        }

        let builder = Package::builder(record.name.as_str(), record.bundle_id.as_str())
            .developer(Tagged::new(
                record.developer.unwrap_or_default(),
                record.developer_token,
            ))
            .artwork(Tagged::new(artwork, record.artwork_token))
            .derived_display_name(record.derived_display_name);

        let builder = append_versions(builder, record.versions, &location, &mut report);
        packages.push(builder.build());
    }

    report.loaded = packages.len();
    (packages, report)
}

fn append_versions(
    mut builder: PackageBuilder,
    versions: Vec<serde_json::Value>,
    package: &RecordLocation,
    report: &mut LoadReport,
) -> PackageBuilder {
    for (v_idx, value) in versions.into_iter().enumerate() {
        let location = RecordLocation {
            version: Some(v_idx),
            ..package.clone()
        };

        let version: RawVersionRecord = match serde_json::from_value(value) {
            Ok(version) => version,
            Err(e) => {
                report.skip(location, e.to_string());
                continue;
            }
        };

        let mut links = Vec::with_capacity(version.links.len());
        for (l_idx, value) in version.links.into_iter().enumerate() {
            match serde_json::from_value::<LinkRecord>(value) {
                Ok(link) => links.push(DownloadLink::from(&link)),
                Err(e) => report.skip(
                    RecordLocation {
                        link: Some(l_idx),
                        ..location.clone()
                    },
                    e.to_string(),
                ),
            }
        }

        if let Err(e) =
            builder.append_version(version.version, links, version.minimum_os_version)
        {
            report.skip(location, e.to_string());
        }
    }
    builder
}

/// Serialize every package of the current generation.
pub fn records(catalog: &Catalog) -> Vec<PackageRecord> {
    catalog
        .view()
        .packages()
        .iter()
        .map(|p| p.to_record())
        .collect()
}

impl Catalog {
    /// Load a snapshot and atomically replace the catalog with it.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the catalog untouched, when the snapshot
    /// as a whole cannot be decoded.
    pub fn load(&self, bytes: &[u8], options: LoadOptions) -> Result<LoadReport> {
        let (packages, report) = parse(bytes, options)?;
        let generation = self.replace_all(packages);
        info!(
            generation,
            loaded = report.loaded,
            filtered = report.filtered,
            skipped = report.skipped.len(),
            "snapshot loaded"
        );
        Ok(report)
    }

    /// Read a snapshot file and atomically replace the catalog with it.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load`]; also fails if the file cannot be read.
    pub fn load_file(&self, path: &Path, options: LoadOptions) -> Result<LoadReport> {
        let raw = snapshot::read(path)?;
        let (packages, report) = build_packages(raw, options);
        let generation = self.replace_all(packages);
        info!(
            path = %path.display(),
            generation,
            loaded = report.loaded,
            filtered = report.filtered,
            skipped = report.skipped.len(),
            "snapshot loaded"
        );
        Ok(report)
    }

    /// Open a new catalog from a snapshot file.
    ///
    /// # Errors
    ///
    /// See [`Catalog::load_file`].
    pub fn open(path: &Path, options: LoadOptions) -> Result<(Self, LoadReport)> {
        let catalog = Self::new();
        let report = catalog.load_file(path, options)?;
        Ok((catalog, report))
    }

    /// Serialize the current generation to snapshot bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn save(&self, compress: bool) -> Result<Vec<u8>> {
        Ok(snapshot::encode(&records(self), compress)?)
    }

    /// Write the current generation to a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save_file(&self, path: &Path, compress: bool) -> Result<()> {
        snapshot::write(path, &records(self), compress)?;
        info!(path = %path.display(), compress, "snapshot saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;

    const SNAPSHOT: &str = r#"[
        {"name":"Example","bundle":"com.example.app","dev":"Example Inc.","devVer":"r1",
         "art":"https://example.com/icon.png","artver":"r1","nN":false,
         "versions":[
            {"ver":"1.0","support":"6.0","urls":[
                {"url":"https://example.com/1.ipa","bv":"100","fs":1000,"bin":{"arm32":false}}]},
            {"ver":"2.0","support":"9.0","urls":[
                {"url":"https://example.com/2.ipa","bv":"200","fs":2000,"bin":{"arm64":false}},
                {"url":"https://mirror.example.com/2.ipa","bv":"200","fs":2000}]}
         ]}
    ]"#;

    #[test]
    fn test_load_scenario() {
        let catalog = Catalog::new();
        let report = catalog.load(SNAPSHOT.as_bytes(), LoadOptions::default()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.loaded, 1);

        let pkg = catalog.by_bundle_identifier("com.example.app").unwrap();
        assert_eq!(pkg.supported_versions("8.0"), ["1.0"]);
        assert_eq!(pkg.supported_versions("10.0"), ["2.0", "1.0"]);
        assert_eq!(pkg.developer().token.as_deref(), Some("r1"));

        let links = pkg.links_for("2.0").unwrap();
        assert_eq!(links[0].url(), "https://example.com/2.ipa");
        assert!(!links[1].arch_matrix().is_available());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let json = r#"[
            {"bundle":"com.example.noname","versions":[]},
            {"name":"Good","bundle":"com.example.good","versions":[
                {"ver":"1.0","urls":[]},
                {"ver":"2.0","support":"7.0","urls":[
                    {"url":"https://a/ok.ipa","bv":"1","fs":1},
                    {"url":"https://a/bad.ipa","bv":"1"}]}
            ]},
            {"name":"Dup","bundle":"com.example.good","versions":[]}
        ]"#;
        let catalog = Catalog::new();
        let report = catalog.load(json.as_bytes(), LoadOptions::default()).unwrap();

        assert_eq!(report.loaded, 1);
        assert_eq!(report.skipped.len(), 4);
        assert_eq!(report.skipped[1].location.to_string(), "packages[1] (com.example.good).versions[0]");
        assert_eq!(report.skipped[2].location.link, Some(1));
        assert_eq!(report.skipped[3].reason, "duplicate bundle identifier");

        let pkg = catalog.by_bundle_identifier("com.example.good").unwrap();
        assert_eq!(pkg.name().as_str(), "Good");
        assert_eq!(pkg.links_for("2.0").unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_version_in_snapshot() {
        let json = r#"[{"name":"A","bundle":"a","versions":[
            {"ver":"1.0","support":"6.0","urls":[{"url":"https://a/1","bv":"1","fs":1}]},
            {"ver":"1.0","support":"7.0","urls":[{"url":"https://a/2","bv":"1","fs":1}]}]}]"#;
        let (packages, report) = parse(json.as_bytes(), LoadOptions::default()).unwrap();
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(packages[0].minimum_os_version_for("1.0"), Some("6.0"));
    }

    #[test]
    fn test_malformed_snapshot_keeps_previous_catalog() {
        let catalog = Catalog::new();
        catalog.load(SNAPSHOT.as_bytes(), LoadOptions::default()).unwrap();
        let generation = catalog.view().generation();

        let err = catalog.load(b"{ not json", LoadOptions::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Snapshot(_)));
        assert_eq!(catalog.view().generation(), generation);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_artwork_filters() {
        let json = r#"[
            {"name":"A","bundle":"a","art":"","versions":[]},
            {"name":"B","bundle":"b","art":"data:image/png;base64,AA","versions":[]},
            {"name":"C","bundle":"c","art":"https://x/c.png","versions":[]}
        ]"#;
        let options = LoadOptions {
            skip_empty_artwork: true,
            skip_inline_artwork: true,
        };
        let (packages, report) = parse(json.as_bytes(), options).unwrap();
        assert_eq!(report.filtered, 2);
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].bundle_id(), "c");
    }

    #[test]
    fn test_save_then_load_preserves_catalog() {
        let catalog = Catalog::new();
        catalog.load(SNAPSHOT.as_bytes(), LoadOptions::default()).unwrap();
        let bytes = catalog.save(false).unwrap();

        let reloaded = Catalog::new();
        reloaded.load(&bytes, LoadOptions::default()).unwrap();
        assert_eq!(records(&catalog), records(&reloaded));
    }
}
