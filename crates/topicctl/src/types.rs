//! Core types describing topic configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Name prefix the broker reserves for its own internal topics.
pub const INTERNAL_TOPIC_PREFIX: &str = "__";

/// Returns true when the topic name carries the internal topic prefix.
pub fn is_internal_topic(name: &str) -> bool {
    name.starts_with(INTERNAL_TOPIC_PREFIX)
}

/// Declarative state of a single topic.
///
/// Entries missing from `configs` fall back to the cluster default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicSpec {
    pub name: String,
    pub partitions: i32,
    pub replication_factor: i16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configs: BTreeMap<String, String>,
}

impl TopicSpec {
    pub fn new(name: impl Into<String>, partitions: i32, replication_factor: i16) -> Self {
        Self {
            name: name.into(),
            partitions,
            replication_factor,
            configs: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.configs.insert(key.into(), value.into());
        self
    }

    /// Build a spec from a cluster-reported descriptor.
    ///
    /// Config entries reported without a value become empty strings.
    pub fn from_descriptor(name: impl Into<String>, descriptor: &TopicDescriptor) -> Self {
        let configs = descriptor
            .configs
            .iter()
            .map(|(key, value)| (key.clone(), value.clone().unwrap_or_default()))
            .collect();

        Self {
            name: name.into(),
            partitions: descriptor.partitions,
            replication_factor: descriptor.replication_factor,
            configs,
        }
    }

    /// The descriptor a cluster would report after creating this topic.
    pub fn to_descriptor(&self) -> TopicDescriptor {
        TopicDescriptor {
            partitions: self.partitions,
            replication_factor: self.replication_factor,
            configs: self
                .configs
                .iter()
                .map(|(key, value)| (key.clone(), Some(value.clone())))
                .collect(),
        }
    }
}

impl fmt::Display for TopicSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (partitions={}, replication_factor={}, configs={})",
            self.name,
            self.partitions,
            self.replication_factor,
            self.configs.len()
        )
    }
}

/// Topic details as reported by the cluster's administrative API.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicDescriptor {
    pub partitions: i32,
    pub replication_factor: i16,
    /// A config may be reported as present without a value.
    pub configs: BTreeMap<String, Option<String>>,
}

impl TopicDescriptor {
    pub fn new(partitions: i32, replication_factor: i16) -> Self {
        Self {
            partitions,
            replication_factor,
            configs: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Option<&str>) -> Self {
        self.configs.insert(key.into(), value.map(str::to_string));
        self
    }
}
