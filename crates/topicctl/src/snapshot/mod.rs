//! Snapshot document definitions and file I/O.

pub mod loader;
pub mod types;

// Re-exports for ergonomics
pub use loader::{SnapshotFormat, SnapshotLoader};
pub use types::{SNAPSHOT_FORMAT_VERSION, SnapshotDocument};
