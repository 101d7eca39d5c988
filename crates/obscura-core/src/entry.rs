//! One released version of a package.

use obscura_schema::VersionRecord;
use obscura_schema::version::satisfies;

use crate::link::DownloadLink;

/// A released version with its OS floor and download options.
///
/// Link order is the ingestion order and is addressed by index from
/// outside (install manifests embed it), so it is never sorted or filtered
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionEntry {
    version: String,
    minimum_os_version: String,
    links: Vec<DownloadLink>,
}

impl VersionEntry {
    /// Create a version entry.
    pub fn new(
        version: impl Into<String>,
        minimum_os_version: impl Into<String>,
        links: Vec<DownloadLink>,
    ) -> Self {
        Self {
            version: version.into(),
            minimum_os_version: minimum_os_version.into(),
            links,
        }
    }

    /// Dotted version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Lowest OS version this release runs on.
    pub fn minimum_os_version(&self) -> &str {
        &self.minimum_os_version
    }

    /// Links exactly as ingested.
    pub fn links_in_original_order(&self) -> &[DownloadLink] {
        &self.links
    }

    /// The link at `index` in ingestion order.
    pub fn link(&self, index: usize) -> Option<&DownloadLink> {
        self.links.get(index)
    }

    /// Append links after the existing ones; earlier indices stay valid.
    pub(crate) fn extend_links(&mut self, links: Vec<DownloadLink>) {
        self.links.extend(links);
    }

    /// True if this release runs on `os`.
    pub fn is_supported_on(&self, os: &str) -> bool {
        satisfies(&self.minimum_os_version, os)
    }

    /// Serialize back into the snapshot form.
    pub fn to_record(&self) -> VersionRecord {
        VersionRecord {
            version: self.version.clone(),
            minimum_os_version: self.minimum_os_version.clone(),
            links: self.links.iter().map(DownloadLink::to_record).collect(),
        }
    }
}
