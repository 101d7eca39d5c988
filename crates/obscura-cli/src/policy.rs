//! Install policy applied when presenting links to a client.
//!
//! None of this lives in the catalog engine: which link is "best", which
//! OS ceiling to advertise, and which installers to offer are decisions of
//! whoever renders the catalog.

use obscura_core::DownloadLink;
use obscura_schema::version::satisfies;

/// Highest OS advertised for a binary with no 64-bit slice.
pub const LEGACY_MAX_OS_VERSION: &str = "10.99.99";

/// A way to get a link onto a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Plain download of the archive.
    Direct,
    /// OTA manifest install (needs AppSync on the device).
    Manifest,
    /// TrollStore URL scheme.
    TrollStore,
    /// AltStore Classic URL scheme.
    AltStore,
    /// SideStore URL scheme.
    SideStore,
}

impl InstallMethod {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Direct => "direct download",
            Self::Manifest => "manifest install",
            Self::TrollStore => "TrollStore",
            Self::AltStore => "AltStore Classic",
            Self::SideStore => "SideStore",
        }
    }
}

/// True if at least one supported slice is not content-protected.
pub fn is_installable(link: &DownloadLink) -> bool {
    link.arch_matrix().iter().any(|(_, protected)| !protected)
}

/// OS ceiling to advertise for `link`, if any.
pub fn max_os_version(link: &DownloadLink) -> Option<&'static str> {
    link.arch_matrix()
        .is_legacy_only()
        .then_some(LEGACY_MAX_OS_VERSION)
}

fn trollstore_supported(os: &str) -> bool {
    let in_range = satisfies("14.0", os) && satisfies(os, "16.6.1");
    let early_17 = os.starts_with("17.0") && os.ends_with(".0");
    in_range || early_17
}

/// Installers a device on `os` can use. `None` means the client is not a device.
pub fn install_methods(os: Option<&str>) -> Vec<InstallMethod> {
    let mut methods = vec![InstallMethod::Direct, InstallMethod::Manifest];
    let Some(os) = os else {
        return methods;
    };
    if trollstore_supported(os) {
        methods.push(InstallMethod::TrollStore);
    }
    if satisfies("12.2", os) {
        methods.push(InstallMethod::AltStore);
    }
    if satisfies("14.0", os) {
        methods.push(InstallMethod::SideStore);
    }
    methods
}

/// Short description of the binary's slices, e.g. `arm64, arm64e (protected)`.
pub fn describe_architectures(link: &DownloadLink) -> String {
    let matrix = link.arch_matrix();
    if !matrix.is_available() || matrix.iter().next().is_none() {
        return "metadata unavailable".to_string();
    }
    matrix
        .iter()
        .map(|(arch, protected)| {
            if protected {
                format!("{arch} (protected)")
            } else {
                arch.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
