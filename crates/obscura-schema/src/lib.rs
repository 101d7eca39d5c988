//! Shared types and snapshot wire format for the Obscura catalog.

pub mod arch;
pub mod snapshot;
pub mod types;
pub mod version;

// Re-exports
pub use arch::*;
pub use snapshot::{LinkRecord, PackageRecord, SnapshotError, VersionRecord, ZSTD_LEVEL, ZSTD_MAGIC};
pub use types::*;
