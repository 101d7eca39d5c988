//! Persisted catalog snapshot format.
//!
//! A snapshot is a JSON array of package records. Field names are short
//! because snapshots are large and were historically hand-edited:
//!
//! ```text
//! [{ "name": "Notes", "bundle": "com.example.notes",
//!    "dev": "Example Inc.", "devVer": "r42",
//!    "art": "https://...", "artver": "r42", "nN": false,
//!    "versions": [{ "ver": "1.0", "support": "6.0",
//!                   "urls": [{ "url": "https://...", "bv": "100", "fs": 1024,
//!                              "bin": { "arm64": false } }] }] }]
//! ```
//!
//! Older snapshots omit `bin`, `devVer` and `artver`; every optional key
//! defaults to "unknown". Records are generic over their children so the
//! loader can decode one level at a time and skip a broken child without
//! losing its siblings.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arch::{Arch, ArchMatrix};

/// Magic bytes for ZSTD compression (Little Endian: 0xFD2FB528 -> 28 B5 2F FD)
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compression level for snapshot files.
pub const ZSTD_LEVEL: i32 = 19;

/// Errors that make a whole snapshot unusable.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The snapshot file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The bytes are not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but is not a JSON array of package records.
    #[error("Snapshot root must be an array of packages, found {0}")]
    NotAnArray(&'static str),
}

/// Raw binary descriptor: architecture tag → content-protected flag.
pub type BinaryDescriptor = BTreeMap<String, bool>;

/// One download option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Download URL.
    pub url: String,
    /// Build identifier reported by the binary.
    #[serde(rename = "bv")]
    pub build_version: String,
    /// Size of the download in bytes.
    #[serde(rename = "fs")]
    pub size_bytes: u64,
    /// Architecture descriptor, absent when inspection failed or was skipped.
    #[serde(rename = "bin", default, skip_serializing_if = "Option::is_none")]
    pub binary: Option<BinaryDescriptor>,
}

impl LinkRecord {
    /// Convert the descriptor into an [`ArchMatrix`].
    ///
    /// Unknown architecture tags are dropped; the rest of the descriptor
    /// is kept.
    pub fn arch_matrix(&self) -> ArchMatrix {
        let Some(descriptor) = &self.binary else {
            return ArchMatrix::unavailable();
        };
        ArchMatrix::from_entries(descriptor.iter().filter_map(|(tag, protected)| {
            match tag.parse::<Arch>() {
                Ok(arch) => Some((arch, *protected)),
                Err(_) => {
                    tracing::debug!(url = %self.url, tag = %tag, "ignoring unknown architecture");
                    None
                }
            }
        }))
    }

    /// Descriptor entries whose architecture tag is not recognized.
    ///
    /// These are kept aside so a rewrite of the snapshot does not lose them.
    pub fn unknown_tags(&self) -> BinaryDescriptor {
        self.binary
            .iter()
            .flatten()
            .filter(|(tag, _)| tag.parse::<Arch>().is_err())
            .map(|(tag, protected)| (tag.clone(), *protected))
            .collect()
    }

    /// Encode a matrix back into a descriptor (`None` when unavailable).
    pub fn descriptor_for(matrix: &ArchMatrix) -> Option<BinaryDescriptor> {
        matrix.as_map().map(|entries| {
            entries
                .iter()
                .map(|(arch, protected)| (arch.as_str().to_string(), *protected))
                .collect()
        })
    }
}

/// One released version of a package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord<L = LinkRecord> {
    /// Dotted version string.
    #[serde(rename = "ver")]
    pub version: String,
    /// Minimum OS version this release runs on.
    #[serde(rename = "support")]
    pub minimum_os_version: String,
    /// Download options in their original order.
    #[serde(rename = "urls")]
    pub links: Vec<L>,
}

/// One package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord<V = VersionRecord> {
    /// Display name.
    pub name: String,
    /// Bundle identifier.
    #[serde(rename = "bundle")]
    pub bundle_id: String,
    /// Developer name.
    #[serde(rename = "dev", default, skip_serializing_if = "Option::is_none")]
    pub developer: Option<String>,
    /// Freshness token for `developer`.
    #[serde(rename = "devVer", default, skip_serializing_if = "Option::is_none")]
    pub developer_token: Option<String>,
    /// Artwork URI or inline data.
    #[serde(rename = "art", default, skip_serializing_if = "Option::is_none")]
    pub artwork: Option<String>,
    /// Freshness token for `artwork`.
    #[serde(rename = "artver", default, skip_serializing_if = "Option::is_none")]
    pub artwork_token: Option<String>,
    /// True when `name` came from bundle metadata rather than a store listing.
    #[serde(rename = "nN", default)]
    pub derived_display_name: bool,
    /// Released versions.
    pub versions: Vec<V>,
}

/// A package record whose versions are still undecoded.
pub type RawPackageRecord = PackageRecord<serde_json::Value>;

/// A version record whose links are still undecoded.
pub type RawVersionRecord = VersionRecord<serde_json::Value>;

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Decode snapshot bytes into undecoded package values.
///
/// Zstd-compressed input is detected by its magic bytes and inflated first.
///
/// # Errors
///
/// Returns [`SnapshotError`] when the bytes cannot be decompressed, are not
/// JSON, or the root is not an array.
pub fn decode(bytes: &[u8]) -> Result<Vec<serde_json::Value>, SnapshotError> {
    let root: serde_json::Value = if bytes.len() >= 4 && bytes[0..4] == ZSTD_MAGIC {
        let decompressed = zstd::decode_all(bytes)?;
        serde_json::from_slice(&decompressed)?
    } else {
        serde_json::from_slice(bytes)?
    };

    match root {
        serde_json::Value::Array(records) => Ok(records),
        other => Err(SnapshotError::NotAnArray(json_kind(&other))),
    }
}

/// Encode package records, optionally zstd-compressed.
///
/// # Errors
///
/// Returns [`SnapshotError`] if serialization or compression fails.
pub fn encode(records: &[PackageRecord], compress: bool) -> Result<Vec<u8>, SnapshotError> {
    let buf = serde_json::to_vec(records)?;
    if compress {
        Ok(zstd::encode_all(&buf[..], ZSTD_LEVEL)?)
    } else {
        Ok(buf)
    }
}

/// Read and decode a snapshot file.
///
/// # Errors
///
/// Returns [`SnapshotError`] on I/O failure or if the file is not a snapshot.
pub fn read(path: &Path) -> Result<Vec<serde_json::Value>, SnapshotError> {
    let bytes = fs::read(path)?;
    decode(&bytes)
}

/// Encode and write a snapshot file.
///
/// The file is written to a sibling temporary file first and renamed into
/// place, so a concurrent reader never sees a half-written snapshot.
///
/// # Errors
///
/// Returns [`SnapshotError`] on serialization or I/O failure.
pub fn write(path: &Path, records: &[PackageRecord], compress: bool) -> Result<(), SnapshotError> {
    let bytes = encode(records, compress)?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::Write::write_all(&mut tmp, &bytes)?;
    tmp.persist(path).map_err(|e| SnapshotError::Io(e.error))?;
    Ok(())
}
