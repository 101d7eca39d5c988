//! A single download option for one version.

use obscura_schema::snapshot::BinaryDescriptor;
use obscura_schema::{ArchMatrix, LinkRecord};

/// One concrete download: URL, build identifier, size and binary metadata.
///
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    matrix: ArchMatrix,
    url: String,
    build_version: String,
    size_bytes: u64,
    unknown_tags: BinaryDescriptor,
}

impl DownloadLink {
    /// Create a link. Pass [`ArchMatrix::unavailable`] when the binary was
    /// not inspected.
    pub fn new(
        matrix: ArchMatrix,
        url: impl Into<String>,
        build_version: impl Into<String>,
        size_bytes: u64,
    ) -> Self {
        Self {
            matrix,
            url: url.into(),
            build_version: build_version.into(),
            size_bytes,
            unknown_tags: BinaryDescriptor::new(),
        }
    }

    /// Per-architecture support and protection.
    pub fn arch_matrix(&self) -> &ArchMatrix {
        &self.matrix
    }

    /// Download URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build identifier reported by the binary.
    pub fn build_version(&self) -> &str {
        &self.build_version
    }

    /// Size of the download in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Host part of the URL, if the URL has a scheme.
    pub fn host(&self) -> Option<&str> {
        let (_, rest) = self.url.split_once("//")?;
        rest.split('/').next().filter(|h| !h.is_empty())
    }

    /// True when the link is served over TLS.
    pub fn is_https(&self) -> bool {
        self.url.starts_with("https")
    }

    /// Serialize back into the snapshot form.
    ///
    /// Architecture tags that were not recognized on load are written back
    /// unchanged.
    pub fn to_record(&self) -> LinkRecord {
        let binary = LinkRecord::descriptor_for(&self.matrix).map(|mut descriptor| {
            descriptor.extend(self.unknown_tags.clone());
            descriptor
        });
        LinkRecord {
            url: self.url.clone(),
            build_version: self.build_version.clone(),
            size_bytes: self.size_bytes,
            binary,
        }
    }
}

impl From<&LinkRecord> for DownloadLink {
    fn from(record: &LinkRecord) -> Self {
        Self {
            matrix: record.arch_matrix(),
            url: record.url.clone(),
            build_version: record.build_version.clone(),
            size_bytes: record.size_bytes,
            unknown_tags: record.unknown_tags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use obscura_schema::Arch;

    #[test]
    fn test_host() {
        let link = DownloadLink::new(
            ArchMatrix::unavailable(),
            "https://archive.org/download/item/app.ipa",
            "1",
            0,
        );
        assert_eq!(link.host(), Some("archive.org"));
        assert!(link.is_https());

        let bare = DownloadLink::new(ArchMatrix::unavailable(), "app.ipa", "1", 0);
        assert_eq!(bare.host(), None);
    }

    #[test]
    fn test_record_keeps_descriptor_state() {
        let unavailable = DownloadLink::new(ArchMatrix::unavailable(), "http://a/b", "1", 5);
        assert!(unavailable.to_record().binary.is_none());

        let empty = DownloadLink::new(ArchMatrix::from_entries([]), "http://a/b", "1", 5);
        assert_eq!(empty.to_record().binary.map(|b| b.len()), Some(0));

        let arm = DownloadLink::new(
            ArchMatrix::from_entries([(Arch::Arm64, true)]),
            "http://a/b",
            "1",
            5,
        );
        let back = DownloadLink::from(&arm.to_record());
        assert_eq!(back, arm);
    }

    #[test]
    fn test_unknown_arch_tags_survive_rewrite() {
        let record = LinkRecord {
            url: "https://a/b.ipa".to_string(),
            build_version: "1".to_string(),
            size_bytes: 5,
            binary: Some(BinaryDescriptor::from([
                ("arm64".to_string(), false),
                ("riscv64".to_string(), true),
            ])),
        };
        let link = DownloadLink::from(&record);
        assert!(link.arch_matrix().supports(Arch::Arm64));
        assert_eq!(link.arch_matrix().iter().count(), 1);
        assert_eq!(link.to_record(), record);
    }
}
