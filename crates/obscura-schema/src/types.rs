//! Identity and metadata newtypes shared by the catalog.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

/// A package's bundle identifier (e.g. `com.example.app`).
///
/// Unlike display names, identifiers are compared exactly as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleId(String);

impl BundleId {
    /// Create a bundle identifier from the given string (stored as-is).
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BundleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::ops::Deref for BundleId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for BundleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for BundleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BundleId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BundleId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<&str> for BundleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for BundleId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A metadata value paired with the freshness token it was fetched under.
///
/// The token is an opaque revision tag from the upstream source (for
/// example a store revision id). It is stored and handed back so the
/// ingestion side can decide whether a refresh is stale; the catalog
/// itself never compares tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tagged<T> {
    /// The metadata value.
    pub value: T,
    /// Freshness token, `None` when the source did not provide one.
    pub token: Option<String>,
}

impl<T> Tagged<T> {
    /// Pair a value with its token.
    pub fn new(value: T, token: Option<String>) -> Self {
        Self { value, token }
    }
}

/// Artwork reference: either a remote URI or an inline `data:` URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Artwork(String);

impl Artwork {
    /// Wrap an artwork URI.
    pub fn new(uri: &str) -> Self {
        Self(uri.to_string())
    }

    /// The artwork URI.
    pub fn uri(&self) -> &str {
        &self.0
    }

    /// True when no artwork is known.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the artwork is embedded as a `data:` URI.
    pub fn is_inline(&self) -> bool {
        self.0.starts_with("data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_id_is_case_sensitive() {
        let id = BundleId::new("com.Example.App");
        assert_eq!(id, "com.Example.App");
        assert_ne!(id, "com.example.app");
    }

    #[test]
    fn test_artwork_kinds() {
        assert!(Artwork::default().is_empty());
        assert!(Artwork::new("data:image/png;base64,AAAA").is_inline());
        assert!(!Artwork::new("https://example.com/icon.png").is_inline());
    }
}
