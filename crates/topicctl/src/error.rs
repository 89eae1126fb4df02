//! Error types for topic export and import.

use std::fmt;

/// Main error type for snapshot and cluster administration operations.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncError {
    /// The administrative session could not be established.
    Connection { endpoint: String, reason: String },
    /// The cluster rejected a listing or creation request.
    ClusterQuery { context: String, reason: String },
    /// A topic with the requested name already exists on the cluster.
    TopicAlreadyExists { topic: String },
    /// Snapshot file is missing, unreadable, or not a valid snapshot.
    Parse { context: String, reason: String },
    /// Snapshot file could not be written.
    SnapshotWrite { context: String, reason: String },
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::Connection { endpoint, reason } => {
                write!(f, "Failed to connect to '{endpoint}': {reason}")
            }
            SyncError::ClusterQuery { context, reason } => {
                write!(f, "Cluster request failed in {context}: {reason}")
            }
            SyncError::TopicAlreadyExists { topic } => {
                write!(f, "Topic '{topic}' already exists")
            }
            SyncError::Parse { context, reason } => {
                write!(f, "Invalid snapshot in {context}: {reason}")
            }
            SyncError::SnapshotWrite { context, reason } => {
                write!(f, "Snapshot write error in {context}: {reason}")
            }
        }
    }
}

impl std::error::Error for SyncError {}

impl SyncError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, SyncError::TopicAlreadyExists { .. })
    }

    /// Whether re-running the import with skipping enabled gets past this error.
    pub fn is_retryable_by_rerun(&self) -> bool {
        self.is_already_exists()
    }

    pub fn from_io_error(e: std::io::Error, context: &str) -> Self {
        SyncError::Parse {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }

    pub fn from_parse_error(e: impl std::fmt::Display, context: &str) -> Self {
        SyncError::Parse {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }

    pub fn from_write_error(e: impl std::fmt::Display, context: &str) -> Self {
        SyncError::SnapshotWrite {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }

    pub fn from_connection_error(e: impl std::fmt::Display, endpoint: &str) -> Self {
        SyncError::Connection {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        }
    }

    pub fn from_cluster_error(e: impl std::fmt::Display, context: &str) -> Self {
        SyncError::ClusterQuery {
            context: context.to_string(),
            reason: e.to_string(),
        }
    }
}
