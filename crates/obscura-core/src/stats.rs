//! Catalog statistics.

use obscura_schema::version::ANY_OS_VERSION;

use crate::catalog::CatalogView;

/// Package, version and URL counts for one catalog generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    /// Packages counted.
    pub packages: usize,
    /// Versions counted across those packages.
    pub versions: usize,
    /// Distinct URLs per package, summed.
    pub urls: usize,
}

impl CatalogView {
    /// Counts for the whole catalog, or only what is usable on `os`.
    ///
    /// Per-OS counts include only compatible packages, their supported
    /// versions, and the URLs of those versions.
    pub fn stats(&self, os: Option<&str>) -> CatalogStats {
        match os {
            None => CatalogStats {
                packages: self.len(),
                versions: self
                    .packages()
                    .iter()
                    .map(|p| p.supported_versions(ANY_OS_VERSION).len())
                    .sum(),
                urls: self.packages().iter().map(|p| p.all_urls().len()).sum(),
            },
            Some(os) => {
                let compatible = self.list_compatible(os);
                CatalogStats {
                    packages: compatible.len(),
                    versions: compatible
                        .iter()
                        .map(|p| p.supported_versions(os).len())
                        .sum(),
                    urls: compatible.iter().map(|p| p.all_urls_for(os).len()).sum(),
                }
            }
        }
    }
}
