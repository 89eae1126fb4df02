//! Integration tests for importing snapshot files into a cluster.

use crate::test_utilities::{THREE_TOPIC_SNAPSHOT, TestWorkspace, test_session_config};
use test_log::test;
use topicctl::{ImportOptions, InMemoryCluster, SyncError, TopicDescriptor, import};

fn options(workspace: &TestWorkspace, skip_if_exists: bool) -> ImportOptions {
    ImportOptions {
        input: workspace.write("topics.json", THREE_TOPIC_SNAPSHOT),
        skip_if_exists,
    }
}

#[test(tokio::test)]
async fn test_import_into_empty_cluster() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);

    let report = import(&cluster, &test_session_config(), &options(&workspace, false))
        .await
        .unwrap();

    assert_eq!(report.created, vec!["audit", "orders", "payments"]);
    assert!(report.skipped.is_empty());

    let orders = cluster.topic("orders").unwrap();
    assert_eq!(orders.partitions, 6);
    assert_eq!(orders.replication_factor, 3);
    assert_eq!(
        orders.configs.get("retention.ms"),
        Some(&Some("604800000".to_string()))
    );
    assert_eq!(cluster.close_calls(), 1);
}

#[test(tokio::test)]
async fn test_import_fails_fast_on_existing_topic() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3).with_topic("orders", TopicDescriptor::new(1, 1));

    let result = import(&cluster, &test_session_config(), &options(&workspace, false)).await;

    match result {
        Err(SyncError::TopicAlreadyExists { topic }) => assert_eq!(topic, "orders"),
        other => panic!("Unexpected result: {other:?}"),
    }
    // created before the conflict, and never attempted after it
    assert!(cluster.topic("audit").is_some());
    assert!(cluster.topic("payments").is_none());
    assert_eq!(cluster.create_attempts(), vec!["audit", "orders"]);
    assert_eq!(cluster.active_sessions(), 0);
}

#[test(tokio::test)]
async fn test_import_skips_existing_topic_and_continues() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3).with_topic("orders", TopicDescriptor::new(1, 1));

    let report = import(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    assert_eq!(report.created, vec!["audit", "payments"]);
    assert_eq!(report.skipped, vec!["orders"]);
    // the existing topic keeps its own configuration
    let orders = cluster.topic("orders").unwrap();
    assert_eq!(orders.partitions, 1);
    assert!(orders.configs.is_empty());
}

#[test(tokio::test)]
async fn test_import_is_idempotent_when_skipping() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    let options = options(&workspace, true);

    let first = import(&cluster, &test_session_config(), &options)
        .await
        .unwrap();
    let after_first = cluster.topics();

    let second = import(&cluster, &test_session_config(), &options)
        .await
        .unwrap();

    assert_eq!(first.created.len(), 3);
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, vec!["audit", "orders", "payments"]);
    assert_eq!(cluster.topics(), after_first);
}

#[test(tokio::test)]
async fn test_import_aborts_on_cluster_rejection() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    cluster.fail_create("orders", "TOPIC_AUTHORIZATION_FAILED");

    let result = import(&cluster, &test_session_config(), &options(&workspace, true)).await;

    assert!(matches!(result, Err(SyncError::ClusterQuery { .. })));
    assert!(cluster.topic("audit").is_some());
    assert!(cluster.topic("payments").is_none());
}

#[test(tokio::test)]
async fn test_import_rejects_replication_beyond_brokers() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(2);

    let result = import(&cluster, &test_session_config(), &options(&workspace, true)).await;

    // orders asks for rf 3 on a two-broker cluster
    assert!(matches!(result, Err(SyncError::ClusterQuery { .. })));
    assert_eq!(cluster.topic_names(), vec!["audit"]);
}

#[test(tokio::test)]
async fn test_import_malformed_snapshot_makes_no_cluster_call() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    let options = ImportOptions {
        input: workspace.write("topics.json", r#"{"kafka_version": "2.4.0", "topics": ["#),
        skip_if_exists: true,
    };

    let result = import(&cluster, &test_session_config(), &options).await;

    assert!(matches!(result, Err(SyncError::Parse { .. })));
    assert!(cluster.create_attempts().is_empty());
    assert_eq!(cluster.close_calls(), 0);
}

#[test(tokio::test)]
async fn test_import_missing_snapshot() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    let options = ImportOptions {
        input: workspace.path("absent.json"),
        skip_if_exists: true,
    };

    let result = import(&cluster, &test_session_config(), &options).await;

    assert!(matches!(result, Err(SyncError::Parse { .. })));
    assert!(cluster.create_attempts().is_empty());
}

#[test(tokio::test)]
async fn test_import_invalid_topic_entry_makes_no_cluster_call() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    let snapshot = r#"{
      "kafka_version": "2.4.0",
      "export_time": "2024-05-01T12:30:00Z",
      "topics": [
        { "name": "audit", "partitions": 1, "replication_factor": 1 },
        { "name": "orders", "partitions": 0, "replication_factor": 1 }
      ]
    }"#;
    let options = ImportOptions {
        input: workspace.write("topics.json", snapshot),
        skip_if_exists: true,
    };

    let result = import(&cluster, &test_session_config(), &options).await;

    assert!(matches!(result, Err(SyncError::Parse { .. })));
    assert!(cluster.create_attempts().is_empty());
}

#[test(tokio::test)]
async fn test_import_connection_failure() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(3);
    cluster.set_unreachable(true);

    let result = import(&cluster, &test_session_config(), &options(&workspace, true)).await;

    assert!(matches!(result, Err(SyncError::Connection { .. })));
    assert!(cluster.create_attempts().is_empty());
}
