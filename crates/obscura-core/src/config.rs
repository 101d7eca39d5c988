//! Optional `config.toml` for tools built on the catalog.
//!
//! ```toml
//! snapshot = "/srv/obscura/apps.json"
//! compress = false
//!
//! [load]
//! skip_empty_artwork = true
//! skip_inline_artwork = false
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::loader::LoadOptions;

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Snapshot location; falls back to [`crate::paths::snapshot_path`].
    pub snapshot: Option<PathBuf>,
    /// Compress snapshots when saving.
    pub compress: bool,
    /// Load-time filters.
    pub load: LoadOptions,
}

impl CatalogConfig {
    /// Read a config file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the config at the default location, if one can be determined.
    ///
    /// # Errors
    ///
    /// See [`CatalogConfig::load`].
    pub fn load_default() -> Result<Self> {
        match crate::paths::config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse config text.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when `text` is not a valid config.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The configured snapshot path, or the default one.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.snapshot.clone().or_else(crate::paths::snapshot_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = CatalogConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, CatalogConfig::default());
    }

    #[test]
    fn test_parse_partial() {
        let config = CatalogConfig::parse(
            r#"
            snapshot = "/srv/apps.json"

            [load]
            skip_inline_artwork = true
            "#,
        )
        .unwrap();
        assert_eq!(config.snapshot, Some(PathBuf::from("/srv/apps.json")));
        assert!(!config.compress);
        assert!(config.load.skip_inline_artwork);
        assert!(!config.load.skip_empty_artwork);
        assert_eq!(config.snapshot_path(), Some(PathBuf::from("/srv/apps.json")));
    }

    #[test]
    fn test_parse_error() {
        assert!(CatalogConfig::parse("compress = \"yes\"").is_err());
    }
}
