//! Administrative session trait definitions.

use crate::{
    SyncError,
    types::{TopicDescriptor, TopicSpec},
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Default bound on establishing an administrative session.
pub const DEFAULT_ADMIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how to open an administrative session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Cluster entry point as `host:port`.
    pub bootstrap: String,
    /// Upper bound on connection negotiation.
    pub timeout: Duration,
}

impl SessionConfig {
    pub fn new(bootstrap: impl Into<String>) -> Self {
        Self {
            bootstrap: bootstrap.into(),
            timeout: DEFAULT_ADMIN_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Control-plane operations against a single cluster.
///
/// A session is owned by one export or import run and is never shared.
#[async_trait]
pub trait AdminSession: Send + Sync {
    /// Enumerate every topic on the cluster, internal topics included.
    async fn list_topics(&self) -> Result<HashMap<String, TopicDescriptor>, SyncError>;

    /// Create one topic.
    ///
    /// Fails with `SyncError::TopicAlreadyExists` on a name collision and
    /// `SyncError::ClusterQuery` for any other rejection.
    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), SyncError>;

    /// Release the session. Further calls on a closed session fail.
    async fn close(&mut self);
}

/// Opens administrative sessions.
#[async_trait]
pub trait AdminConnector: Send + Sync {
    type Session: AdminSession;

    /// Establish a session, failing with `SyncError::Connection`.
    async fn open(&self, config: &SessionConfig) -> Result<Self::Session, SyncError>;
}
