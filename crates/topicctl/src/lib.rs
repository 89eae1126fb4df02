//! Topic configuration export and import for Kafka-compatible clusters.
//!
//! The exporter captures every topic's partition count, replication factor
//! and per-topic configs into a versioned snapshot document; the importer
//! replays a snapshot against a cluster, creating the topics it is missing.
//! Both talk to the cluster through the [`AdminSession`] trait.

pub mod error;
pub mod exporter;
pub mod importer;
pub mod session;
pub mod snapshot;
pub mod telemetry;
pub mod types;

pub use error::SyncError;

// Re-export the pipelines and their options
pub use exporter::{DEFAULT_SNAPSHOT_PATH, ExportOptions, ExportReport, build_snapshot, export};
pub use importer::{ImportOptions, ImportReport, apply_snapshot, import};

// Re-export session traits and the in-memory backend
pub use session::{AdminConnector, AdminSession, InMemoryCluster, SessionConfig};

pub use snapshot::{SNAPSHOT_FORMAT_VERSION, SnapshotDocument, SnapshotLoader};
pub use types::{INTERNAL_TOPIC_PREFIX, TopicDescriptor, TopicSpec};

// Re-export logging macros for consistent usage across the crate
pub use log::{debug, error, info, trace, warn};
