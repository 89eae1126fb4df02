//! In-memory cluster backend.

use crate::{
    SyncError,
    session::r#trait::{AdminConnector, AdminSession, SessionConfig},
    types::{TopicDescriptor, TopicSpec},
};
use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// In-process cluster that applies the same creation rules as a broker.
///
/// Cloning yields another handle to the same cluster, so a test can seed
/// topics, hand the cluster to an exporter or importer as its connector,
/// and inspect the result afterwards. Fault injection covers unreachable
/// entry points, listing failures, and per-topic creation failures.
#[derive(Debug, Clone)]
pub struct InMemoryCluster {
    state: Arc<RwLock<ClusterState>>,
}

/// Internal representation of cluster state
#[derive(Debug)]
struct ClusterState {
    /// Number of live brokers, bounds the replication factor
    broker_count: i16,
    /// Topic descriptors indexed by topic name
    topics: HashMap<String, TopicDescriptor>,
    /// Names passed to create_topic, in call order
    create_attempts: Vec<String>,
    unreachable: bool,
    list_failure: Option<String>,
    /// Injected creation failures indexed by topic name
    create_failures: HashMap<String, String>,
    active_sessions: usize,
    close_calls: usize,
}

impl ClusterState {
    fn new(broker_count: i16) -> Self {
        Self {
            broker_count,
            topics: HashMap::new(),
            create_attempts: Vec::new(),
            unreachable: false,
            list_failure: None,
            create_failures: HashMap::new(),
            active_sessions: 0,
            close_calls: 0,
        }
    }

    fn create_topic(&mut self, spec: &TopicSpec) -> Result<(), SyncError> {
        self.create_attempts.push(spec.name.clone());
        let context = format!("create topic '{}'", spec.name);

        if let Some(reason) = self.create_failures.get(&spec.name) {
            return Err(SyncError::from_cluster_error(reason, &context));
        }
        if spec.name.is_empty() {
            return Err(SyncError::from_cluster_error("invalid topic name", &context));
        }
        if self.topics.contains_key(&spec.name) {
            return Err(SyncError::TopicAlreadyExists {
                topic: spec.name.clone(),
            });
        }
        if spec.partitions <= 0 {
            return Err(SyncError::from_cluster_error(
                format!("invalid partition count {}", spec.partitions),
                &context,
            ));
        }
        if spec.replication_factor <= 0 || spec.replication_factor > self.broker_count {
            return Err(SyncError::from_cluster_error(
                format!(
                    "replication factor {} is invalid with {} available brokers",
                    spec.replication_factor, self.broker_count
                ),
                &context,
            ));
        }

        self.topics.insert(spec.name.clone(), spec.to_descriptor());
        Ok(())
    }
}

impl InMemoryCluster {
    /// Create an empty cluster with the given number of live brokers.
    pub fn new(broker_count: i16) -> Self {
        Self {
            state: Arc::new(RwLock::new(ClusterState::new(broker_count))),
        }
    }

    /// Seed a topic directly, bypassing creation rules.
    pub fn with_topic(self, name: impl Into<String>, descriptor: TopicDescriptor) -> Self {
        self.insert_topic(name, descriptor);
        self
    }

    pub fn insert_topic(&self, name: impl Into<String>, descriptor: TopicDescriptor) {
        self.state.write().topics.insert(name.into(), descriptor);
    }

    pub fn topic(&self, name: &str) -> Option<TopicDescriptor> {
        self.state.read().topics.get(name).cloned()
    }

    /// All topic names, sorted.
    pub fn topic_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().topics.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn topics(&self) -> HashMap<String, TopicDescriptor> {
        self.state.read().topics.clone()
    }

    /// Topic names passed to `create_topic`, in call order, including failures.
    pub fn create_attempts(&self) -> Vec<String> {
        self.state.read().create_attempts.clone()
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.write().unreachable = unreachable;
    }

    pub fn fail_listing(&self, reason: impl Into<String>) {
        self.state.write().list_failure = Some(reason.into());
    }

    pub fn fail_create(&self, topic: impl Into<String>, reason: impl Into<String>) {
        self.state
            .write()
            .create_failures
            .insert(topic.into(), reason.into());
    }

    /// Sessions opened and not yet closed or dropped.
    pub fn active_sessions(&self) -> usize {
        self.state.read().active_sessions
    }

    /// Number of explicit `close` calls across all sessions.
    pub fn close_calls(&self) -> usize {
        self.state.read().close_calls
    }
}

impl Default for InMemoryCluster {
    fn default() -> Self {
        Self::new(3)
    }
}

#[async_trait]
impl AdminConnector for InMemoryCluster {
    type Session = InMemorySession;

    async fn open(&self, config: &SessionConfig) -> Result<InMemorySession, SyncError> {
        let mut state = self.state.write();
        if config.bootstrap.is_empty() {
            return Err(SyncError::from_connection_error(
                "no bootstrap address given",
                &config.bootstrap,
            ));
        }
        if state.unreachable {
            return Err(SyncError::from_connection_error(
                "connection refused",
                &config.bootstrap,
            ));
        }

        state.active_sessions += 1;
        debug!("Opened in-memory session for {}", config.bootstrap);
        Ok(InMemorySession {
            state: Arc::clone(&self.state),
            closed: false,
        })
    }
}

/// Session handle onto an [`InMemoryCluster`].
#[derive(Debug)]
pub struct InMemorySession {
    state: Arc<RwLock<ClusterState>>,
    closed: bool,
}

impl InMemorySession {
    fn ensure_open(&self, context: &str) -> Result<(), SyncError> {
        if self.closed {
            return Err(SyncError::from_cluster_error("session is closed", context));
        }
        Ok(())
    }

    fn release(&mut self) {
        if !self.closed {
            self.closed = true;
            let mut state = self.state.write();
            state.active_sessions = state.active_sessions.saturating_sub(1);
        }
    }
}

#[async_trait]
impl AdminSession for InMemorySession {
    async fn list_topics(&self) -> Result<HashMap<String, TopicDescriptor>, SyncError> {
        self.ensure_open("list topics")?;
        let state = self.state.read();
        if let Some(reason) = &state.list_failure {
            return Err(SyncError::from_cluster_error(reason, "list topics"));
        }
        Ok(state.topics.clone())
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), SyncError> {
        self.ensure_open("create topic")?;
        self.state.write().create_topic(spec)
    }

    async fn close(&mut self) {
        if !self.closed {
            self.state.write().close_calls += 1;
        }
        self.release();
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.release();
    }
}
