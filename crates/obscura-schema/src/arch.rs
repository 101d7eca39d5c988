//! CPU architectures found in distributed application binaries.
//!
//! Each tag is one Apple-silicon ABI generation. A binary may contain
//! several slices and each slice may be content-protected on its own,
//! which is what [`ArchMatrix`] records.
//!
//! # Example
//!
//! ```
//! use obscura_schema::{Arch, ArchMatrix};
//!
//! let matrix = ArchMatrix::from_entries([(Arch::Arm64, false)]);
//! assert!(matrix.supports(Arch::Arm64));
//! assert!(!matrix.supports(Arch::Arm64e));
//! ```

use std::collections::BTreeMap;

/// A CPU architecture slice in a binary.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum Arch {
    /// 32-bit ARM.
    #[serde(rename = "arm32")]
    Arm32,
    /// Baseline 64-bit ARM.
    #[serde(rename = "arm64")]
    Arm64,
    /// 64-bit ARMv8 slice.
    #[serde(rename = "arm64-v8")]
    Arm64V8,
    /// 64-bit ARM with pointer authentication.
    #[serde(rename = "arm64e")]
    Arm64e,
    /// Pre-release pointer-authentication ABI.
    #[serde(rename = "arm64e-legacy")]
    Arm64eLegacy,
}

impl Arch {
    /// Every known architecture, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Arm32,
        Self::Arm64,
        Self::Arm64V8,
        Self::Arm64e,
        Self::Arm64eLegacy,
    ];

    /// Convert to the tag used in snapshots and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm32 => "arm32",
            Self::Arm64 => "arm64",
            Self::Arm64V8 => "arm64-v8",
            Self::Arm64e => "arm64e",
            Self::Arm64eLegacy => "arm64e-legacy",
        }
    }

    /// True for every 64-bit tag.
    pub fn is_64_bit(&self) -> bool {
        !matches!(self, Self::Arm32)
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "arm32" | "armv7" | "armv7s" => Ok(Self::Arm32),
            "arm64" => Ok(Self::Arm64),
            "arm64-v8" | "arm64v8" => Ok(Self::Arm64V8),
            "arm64e" => Ok(Self::Arm64e),
            "arm64e-legacy" | "arm64e_legacy" => Ok(Self::Arm64eLegacy),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// Per-architecture support and content-protection for one binary.
///
/// A matrix is either *available* (binary inspection succeeded, possibly
/// with zero slices) or *unavailable* (inspection failed or was skipped).
/// An unavailable matrix answers `false` to every query, but callers
/// should surface it as "metadata unavailable" rather than "no
/// architectures".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchMatrix {
    entries: Option<BTreeMap<Arch, bool>>,
}

impl ArchMatrix {
    /// The sentinel for a binary whose metadata could not be read.
    pub fn unavailable() -> Self {
        Self { entries: None }
    }

    /// Build an available matrix from `(arch, protected)` pairs.
    ///
    /// A repeated architecture keeps the last flag given for it.
    pub fn from_entries(entries: impl IntoIterator<Item = (Arch, bool)>) -> Self {
        Self {
            entries: Some(entries.into_iter().collect()),
        }
    }

    /// Build from an optional descriptor; `None` yields [`Self::unavailable`].
    pub fn from_descriptor(descriptor: Option<&BTreeMap<Arch, bool>>) -> Self {
        Self {
            entries: descriptor.cloned(),
        }
    }

    /// True if binary metadata was available when this matrix was built.
    pub fn is_available(&self) -> bool {
        self.entries.is_some()
    }

    /// True if the binary contains a slice for `arch`.
    pub fn supports(&self, arch: Arch) -> bool {
        self.entries.as_ref().is_some_and(|e| e.contains_key(&arch))
    }

    /// True if the `arch` slice is content-protected. False when unsupported.
    pub fn is_protected(&self, arch: Arch) -> bool {
        self.entries
            .as_ref()
            .and_then(|e| e.get(&arch))
            .copied()
            .unwrap_or(false)
    }

    /// The `arch → protected` mapping, or `None` when unavailable.
    pub fn as_map(&self) -> Option<&BTreeMap<Arch, bool>> {
        self.entries.as_ref()
    }

    /// Iterate over supported architectures and their protection flag.
    pub fn iter(&self) -> impl Iterator<Item = (Arch, bool)> + '_ {
        self.entries
            .iter()
            .flat_map(|e| e.iter().map(|(arch, protected)| (*arch, *protected)))
    }

    /// True if the binary supports none of the 64-bit architectures.
    ///
    /// An unavailable matrix is legacy-only as well, since no 64-bit slice
    /// is known to exist.
    pub fn is_legacy_only(&self) -> bool {
        !Arch::ALL
            .iter()
            .filter(|arch| arch.is_64_bit())
            .any(|arch| self.supports(*arch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_arm64_slice() {
        let matrix = ArchMatrix::from_entries([(Arch::Arm64, false)]);
        assert!(matrix.is_available());
        assert!(matrix.supports(Arch::Arm64));
        assert!(!matrix.supports(Arch::Arm64e));
        assert!(!matrix.is_protected(Arch::Arm64));
        assert!(!matrix.is_legacy_only());
    }

    #[test]
    fn test_unavailable_differs_from_empty() {
        let unavailable = ArchMatrix::unavailable();
        let empty = ArchMatrix::from_entries([]);
        assert!(!unavailable.is_available());
        assert!(empty.is_available());
        assert_ne!(unavailable, empty);
        assert!(unavailable.as_map().is_none());
        assert_eq!(empty.as_map().map(BTreeMap::len), Some(0));
    }

    #[test]
    fn test_protected_requires_support() {
        let matrix = ArchMatrix::from_entries([(Arch::Arm32, true)]);
        assert!(matrix.is_protected(Arch::Arm32));
        assert!(!matrix.is_protected(Arch::Arm64));
        assert!(matrix.is_legacy_only());
    }

    #[test]
    fn test_from_str_round_trip() {
        for arch in Arch::ALL {
            assert_eq!(arch.as_str().parse::<Arch>(), Ok(arch));
        }
        assert!("x86_64".parse::<Arch>().is_err());
    }

    #[test]
    fn test_serde_tags() {
        let json = serde_json::to_string(&Arch::Arm64eLegacy).unwrap();
        assert_eq!(json, "\"arm64e-legacy\"");
        let arch: Arch = serde_json::from_str("\"arm64-v8\"").unwrap();
        assert_eq!(arch, Arch::Arm64V8);
    }
}
