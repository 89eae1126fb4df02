//! Administrative session over a live Kafka cluster.

use crate::error::{connection_error, create_topic_error, create_topic_result, list_topics_error};
use async_trait::async_trait;
use rdkafka::ClientConfig;
use rdkafka::admin::{
    AdminClient, AdminOptions, ConfigResourceResult, NewTopic, OwnedResourceSpecifier,
    ResourceSpecifier, TopicReplication,
};
use rdkafka::client::DefaultClientContext;
use rdkafka::metadata::Metadata;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use topicctl::{AdminConnector, AdminSession, SessionConfig, SyncError, TopicDescriptor, TopicSpec};
use tracing::debug;

type Admin = AdminClient<DefaultClientContext>;

/// Opens [`KafkaSession`]s against a single bootstrap broker.
#[derive(Debug, Clone, Copy, Default)]
pub struct KafkaConnector;

impl KafkaConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AdminConnector for KafkaConnector {
    type Session = KafkaSession;

    async fn open(&self, config: &SessionConfig) -> Result<KafkaSession, SyncError> {
        let timeout_ms = config.timeout.as_millis().to_string();
        let admin: Admin = ClientConfig::new()
            .set("bootstrap.servers", &config.bootstrap)
            .set("socket.connection.setup.timeout.ms", &timeout_ms)
            .create()
            .map_err(|e| connection_error(e, &config.bootstrap))?;
        let admin = Arc::new(admin);

        // client creation is lazy, a metadata round trip proves the broker answers
        fetch_metadata(Arc::clone(&admin), config.timeout)
            .await
            .map_err(|e| connection_error(e, &config.bootstrap))?;

        debug!(bootstrap = %config.bootstrap, "Opened Kafka admin session");
        Ok(KafkaSession {
            admin: Some(admin),
            bootstrap: config.bootstrap.clone(),
            request_timeout: config.timeout,
        })
    }
}

/// Session backed by an `rdkafka` admin client.
pub struct KafkaSession {
    admin: Option<Arc<Admin>>,
    bootstrap: String,
    request_timeout: Duration,
}

impl KafkaSession {
    fn admin(&self, context: &str) -> Result<&Arc<Admin>, SyncError> {
        self.admin
            .as_ref()
            .ok_or_else(|| SyncError::from_cluster_error("session is closed", context))
    }

    fn admin_options(&self) -> AdminOptions {
        AdminOptions::new()
            .request_timeout(Some(self.request_timeout))
            .operation_timeout(Some(self.request_timeout))
    }
}

impl std::fmt::Debug for KafkaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaSession")
            .field("bootstrap", &self.bootstrap)
            .field("open", &self.admin.is_some())
            .finish()
    }
}

#[async_trait]
impl AdminSession for KafkaSession {
    async fn list_topics(&self) -> Result<HashMap<String, TopicDescriptor>, SyncError> {
        let admin = self.admin("list topics")?;

        // a full metadata request, internal topics included
        let metadata = fetch_metadata(Arc::clone(admin), self.request_timeout)
            .await
            .map_err(list_topics_error)?;

        let mut topics = HashMap::new();
        for topic in metadata.topics() {
            if let Some(code) = topic.error() {
                return Err(SyncError::from_cluster_error(
                    format!("{code:?}"),
                    &format!("describe topic '{}'", topic.name()),
                ));
            }
            let descriptor = describe_partitions(
                topic
                    .partitions()
                    .iter()
                    .map(|partition| partition.replicas().len()),
            );
            topics.insert(topic.name().to_string(), descriptor);
        }
        debug!(count = topics.len(), "Listed topics");

        if topics.is_empty() {
            return Ok(topics);
        }

        let names: Vec<String> = topics.keys().cloned().collect();
        let resources: Vec<ResourceSpecifier<'_>> = names
            .iter()
            .map(|name| ResourceSpecifier::Topic(name.as_str()))
            .collect();
        let results = admin
            .describe_configs(&resources, &self.admin_options())
            .await
            .map_err(|e| SyncError::from_cluster_error(e, "describe topic configs"))?;

        apply_config_results(&mut topics, results)?;
        Ok(topics)
    }

    async fn create_topic(&self, spec: &TopicSpec) -> Result<(), SyncError> {
        let admin = self.admin(&format!("create topic '{}'", spec.name))?;

        let mut new_topic = NewTopic::new(
            spec.name.as_str(),
            spec.partitions,
            TopicReplication::Fixed(i32::from(spec.replication_factor)),
        );
        for (key, value) in &spec.configs {
            new_topic = new_topic.set(key.as_str(), value.as_str());
        }

        let mut results = admin
            .create_topics(&[new_topic], &self.admin_options())
            .await
            .map_err(|e| create_topic_error(e, &spec.name))?;

        match results.pop() {
            Some(result) => create_topic_result(result, &spec.name),
            None => Err(SyncError::from_cluster_error(
                "empty response",
                &format!("create topic '{}'", spec.name),
            )),
        }
    }

    async fn close(&mut self) {
        if self.admin.take().is_some() {
            debug!(bootstrap = %self.bootstrap, "Closed Kafka admin session");
        }
    }
}

/// Run the blocking metadata call off the async runtime.
async fn fetch_metadata(admin: Arc<Admin>, timeout: Duration) -> Result<Metadata, String> {
    tokio::task::spawn_blocking(move || admin.inner().fetch_metadata(None, timeout))
        .await
        .map_err(|e| e.to_string())?
        .map_err(|e| e.to_string())
}

/// Descriptor from per-partition replica counts.
///
/// The replication factor is the largest replica set across partitions.
fn describe_partitions(replica_counts: impl Iterator<Item = usize>) -> TopicDescriptor {
    let mut partitions = 0usize;
    let mut replication_factor = 0usize;
    for replicas in replica_counts {
        partitions += 1;
        replication_factor = replication_factor.max(replicas);
    }

    TopicDescriptor::new(
        i32::try_from(partitions).unwrap_or(i32::MAX),
        i16::try_from(replication_factor).unwrap_or(i16::MAX),
    )
}

/// Attach topic-level config overrides to their descriptors.
///
/// Broker defaults and sensitive entries are left out, so only settings
/// that were set on the topic itself end up in a snapshot.
fn apply_config_results(
    topics: &mut HashMap<String, TopicDescriptor>,
    results: Vec<ConfigResourceResult>,
) -> Result<(), SyncError> {
    for result in results {
        let resource = result.map_err(|code| {
            SyncError::from_cluster_error(code, "describe topic configs")
        })?;
        let OwnedResourceSpecifier::Topic(name) = resource.specifier else {
            continue;
        };
        let Some(descriptor) = topics.get_mut(&name) else {
            continue;
        };
        for entry in resource.entries {
            if entry.is_default || entry.is_sensitive {
                continue;
            }
            descriptor.configs.insert(entry.name, entry.value);
        }
    }
    Ok(())
}
