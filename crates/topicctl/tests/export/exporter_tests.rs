//! Integration tests for exporting cluster topics to snapshot files.

use crate::test_utilities::{TestWorkspace, create_source_cluster, test_session_config};
use serde_json::Value;
use test_log::test;
use topicctl::{
    ExportOptions, InMemoryCluster, SNAPSHOT_FORMAT_VERSION, SnapshotLoader, SyncError,
    TopicDescriptor, export,
};

fn options(workspace: &TestWorkspace, exclude_internal: bool) -> ExportOptions {
    ExportOptions {
        output: workspace.path("topics.json"),
        exclude_internal,
    }
}

#[test(tokio::test)]
async fn test_export_sorts_topics_by_name() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::new(1)
        .with_topic("zeta", TopicDescriptor::new(1, 1))
        .with_topic("alpha", TopicDescriptor::new(1, 1))
        .with_topic("mid", TopicDescriptor::new(1, 1));

    let report = export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();
    assert_eq!(report.exported, 3);

    let document = SnapshotLoader::from_path(workspace.path("topics.json")).unwrap();
    let names: Vec<&str> = document.topic_names().collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);
}

#[test(tokio::test)]
async fn test_export_excludes_internal_topics() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();

    let report = export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    assert_eq!(report.exported, 3);
    assert_eq!(report.excluded_internal, 1);
    let document = SnapshotLoader::from_path(&report.output).unwrap();
    assert!(document.get_topic("__consumer_offsets").is_none());
}

#[test(tokio::test)]
async fn test_export_includes_internal_topics_when_requested() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();

    let report = export(&cluster, &test_session_config(), &options(&workspace, false))
        .await
        .unwrap();

    assert_eq!(report.exported, 4);
    assert_eq!(report.excluded_internal, 0);
    let document = SnapshotLoader::from_path(&report.output).unwrap();
    let names: Vec<&str> = document.topic_names().collect();
    assert_eq!(names, vec!["__consumer_offsets", "audit", "orders", "payments"]);
}

#[test(tokio::test)]
async fn test_export_document_shape() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();

    export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    let content = std::fs::read_to_string(workspace.path("topics.json")).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();

    assert_eq!(value["kafka_version"], SNAPSHOT_FORMAT_VERSION);
    let export_time = value["export_time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(export_time).is_ok());

    let topics = value["topics"].as_array().unwrap();
    assert_eq!(topics[0]["name"], "audit");
    // audit has no configs, so the key is omitted entirely
    assert!(topics[0].get("configs").is_none());

    assert_eq!(topics[1]["name"], "orders");
    assert_eq!(topics[1]["partitions"], 6);
    assert_eq!(topics[1]["replication_factor"], 3);
    assert_eq!(topics[1]["configs"]["retention.ms"], "604800000");
    assert_eq!(topics[1]["configs"]["cleanup.policy"], "delete");
}

#[test(tokio::test)]
async fn test_export_normalizes_valueless_configs() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();

    export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    let content = std::fs::read_to_string(workspace.path("topics.json")).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    let payments = &value["topics"][2];

    assert_eq!(payments["name"], "payments");
    assert_eq!(payments["configs"]["segment.bytes"], "");
    assert_eq!(payments["configs"]["min.insync.replicas"], "2");
}

#[test(tokio::test)]
async fn test_export_is_stable_for_identical_state() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();
    let config = test_session_config();

    let first = ExportOptions {
        output: workspace.path("first.json"),
        exclude_internal: true,
    };
    let second = ExportOptions {
        output: workspace.path("second.json"),
        exclude_internal: true,
    };
    export(&cluster, &config, &first).await.unwrap();
    export(&cluster, &config, &second).await.unwrap();

    let first = SnapshotLoader::from_path(&first.output).unwrap();
    let second = SnapshotLoader::from_path(&second.output).unwrap();
    assert_eq!(first.topics, second.topics);
}

#[test(tokio::test)]
async fn test_export_connection_failure_leaves_output_untouched() {
    let workspace = TestWorkspace::new();
    let existing = workspace.write("topics.json", "previous snapshot");
    let cluster = create_source_cluster();
    cluster.set_unreachable(true);

    let result = export(&cluster, &test_session_config(), &options(&workspace, true)).await;

    assert!(matches!(result, Err(SyncError::Connection { .. })));
    assert_eq!(std::fs::read_to_string(existing).unwrap(), "previous snapshot");
}

#[test(tokio::test)]
async fn test_export_listing_failure_closes_session() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();
    cluster.fail_listing("not authorized");

    let result = export(&cluster, &test_session_config(), &options(&workspace, true)).await;

    assert!(matches!(result, Err(SyncError::ClusterQuery { .. })));
    assert!(!workspace.path("topics.json").exists());
    assert_eq!(cluster.close_calls(), 1);
    assert_eq!(cluster.active_sessions(), 0);
}

#[test(tokio::test)]
async fn test_export_write_failure_is_reported() {
    let workspace = TestWorkspace::new();
    let cluster = create_source_cluster();
    let options = ExportOptions {
        output: workspace.path("missing-dir").join("topics.json"),
        exclude_internal: true,
    };

    let result = export(&cluster, &test_session_config(), &options).await;

    assert!(matches!(result, Err(SyncError::SnapshotWrite { .. })));
    assert_eq!(cluster.close_calls(), 1);
}

#[test(tokio::test)]
async fn test_export_replaces_existing_snapshot() {
    let workspace = TestWorkspace::new();
    workspace.write("topics.json", "{}");
    let cluster = create_source_cluster();

    export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    let document = SnapshotLoader::from_path(workspace.path("topics.json")).unwrap();
    assert_eq!(document.topics.len(), 3);
}

#[test(tokio::test)]
async fn test_export_empty_cluster() {
    let workspace = TestWorkspace::new();
    let cluster = InMemoryCluster::default();

    let report = export(&cluster, &test_session_config(), &options(&workspace, true))
        .await
        .unwrap();

    assert_eq!(report.exported, 0);
    let document = SnapshotLoader::from_path(&report.output).unwrap();
    assert!(document.topics.is_empty());
}
