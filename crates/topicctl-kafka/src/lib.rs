//! Kafka backend for topicctl administrative sessions.
//!
//! This crate adapts an `rdkafka` admin client to the [`topicctl::AdminSession`]
//! trait so the exporter and importer can run against a live cluster.

pub mod error;
pub mod session;

pub use session::{KafkaConnector, KafkaSession};
