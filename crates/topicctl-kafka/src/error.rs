//! Conversion of Kafka client errors into [`SyncError`].

use rdkafka::admin::TopicResult;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use topicctl::SyncError;

/// Map the per-topic outcome of a CreateTopics request.
///
/// `TOPIC_ALREADY_EXISTS` becomes [`SyncError::TopicAlreadyExists`]; every
/// other failure is a cluster query error.
pub fn create_topic_result(result: TopicResult, topic: &str) -> Result<(), SyncError> {
    match result {
        Ok(_) => Ok(()),
        Err((_, RDKafkaErrorCode::TopicAlreadyExists)) => Err(SyncError::TopicAlreadyExists {
            topic: topic.to_string(),
        }),
        Err((_, code)) => Err(SyncError::from_cluster_error(
            code,
            &format!("create topic '{topic}'"),
        )),
    }
}

/// Map a request-level failure, before any per-topic result exists.
pub fn create_topic_error(e: KafkaError, topic: &str) -> SyncError {
    match e.rdkafka_error_code() {
        Some(RDKafkaErrorCode::TopicAlreadyExists) => SyncError::TopicAlreadyExists {
            topic: topic.to_string(),
        },
        _ => SyncError::from_cluster_error(e, &format!("create topic '{topic}'")),
    }
}

pub fn list_topics_error(e: impl std::fmt::Display) -> SyncError {
    SyncError::from_cluster_error(e, "list topics")
}

pub fn connection_error(e: impl std::fmt::Display, bootstrap: &str) -> SyncError {
    SyncError::from_connection_error(e, bootstrap)
}
