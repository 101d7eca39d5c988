//! Filesystem locations.

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the Obscura home directory, or None if the user's home cannot be resolved.
///
/// `OBSCURA_HOME` overrides the default of `~/.obscura`.
pub fn try_obscura_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("OBSCURA_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".obscura"))
}

/// Default snapshot path: ~/.obscura/apps.json
pub fn snapshot_path() -> Option<PathBuf> {
    try_obscura_home().map(|h| h.join("apps.json"))
}

/// Config path: ~/.obscura/config.toml
pub fn config_path() -> Option<PathBuf> {
    try_obscura_home().map(|h| h.join("config.toml"))
}
