//! Snapshot document data structures.

use crate::{SyncError, types::TopicSpec};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Cluster software baseline recorded in every snapshot this tool writes.
pub const SNAPSHOT_FORMAT_VERSION: &str = "2.4.0";

/// Portable capture of a cluster's topic configuration.
///
/// `topics` is sorted by name when produced by an export, and imports
/// process topics in document order. A missing or null `topics` reads as
/// an empty list; `export_time` is informational and may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(rename = "kafka_version")]
    pub format_version: String,
    #[serde(
        rename = "export_time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "nullable_topics")]
    pub topics: Vec<TopicSpec>,
}

fn nullable_topics<'de, D>(deserializer: D) -> Result<Vec<TopicSpec>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TopicSpec>>::deserialize(deserializer)?.unwrap_or_default())
}

impl SnapshotDocument {
    /// Create a document stamped with the current format version.
    ///
    /// Topics are sorted by name; the timestamp is truncated to whole seconds.
    pub fn new(mut topics: Vec<TopicSpec>, generated_at: DateTime<Utc>) -> Self {
        topics.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            format_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            generated_at: Some(generated_at.trunc_subsecs(0)),
            topics,
        }
    }

    pub fn topic_names(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|topic| topic.name.as_str())
    }

    pub fn get_topic(&self, name: &str) -> Option<&TopicSpec> {
        self.topics.iter().find(|topic| topic.name == name)
    }

    /// Check the structural rules every topic entry must satisfy.
    pub fn validate(&self) -> Result<(), SyncError> {
        for (index, topic) in self.topics.iter().enumerate() {
            if topic.name.is_empty() {
                return Err(SyncError::Parse {
                    context: format!("topic entry {index}"),
                    reason: "topic name must not be empty".to_string(),
                });
            }
            if topic.partitions <= 0 {
                return Err(SyncError::Parse {
                    context: format!("topic '{}'", topic.name),
                    reason: format!("partitions must be positive, got {}", topic.partitions),
                });
            }
            if topic.replication_factor <= 0 {
                return Err(SyncError::Parse {
                    context: format!("topic '{}'", topic.name),
                    reason: format!(
                        "replication_factor must be positive, got {}",
                        topic.replication_factor
                    ),
                });
            }
        }
        Ok(())
    }
}
