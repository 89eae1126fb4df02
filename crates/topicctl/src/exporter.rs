//! Export of live cluster topic configuration into a snapshot file.

use crate::{
    SyncError,
    session::{AdminConnector, AdminSession, SessionConfig},
    snapshot::{SnapshotDocument, SnapshotLoader},
    types::{TopicDescriptor, TopicSpec, is_internal_topic},
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;
use std::path::PathBuf;

/// Default snapshot location for both export and import.
pub const DEFAULT_SNAPSHOT_PATH: &str = "topics.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub output: PathBuf,
    /// Drop topics carrying the internal topic prefix.
    pub exclude_internal: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            exclude_internal: true,
        }
    }
}

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub output: PathBuf,
    pub exported: usize,
    pub excluded_internal: usize,
}

/// Filter, normalize and sort cluster descriptors into a snapshot.
pub fn build_snapshot(
    descriptors: &HashMap<String, TopicDescriptor>,
    exclude_internal: bool,
    generated_at: DateTime<Utc>,
) -> SnapshotDocument {
    let topics = descriptors
        .iter()
        .filter(|(name, _)| !(exclude_internal && is_internal_topic(name)))
        .map(|(name, descriptor)| TopicSpec::from_descriptor(name.as_str(), descriptor))
        .collect();

    SnapshotDocument::new(topics, generated_at)
}

/// Export every topic of the cluster behind `connector` to `options.output`.
///
/// The output file is untouched when the session cannot be opened or the
/// cluster cannot be listed.
pub async fn export<C: AdminConnector>(
    connector: &C,
    config: &SessionConfig,
    options: &ExportOptions,
) -> Result<ExportReport, SyncError> {
    let mut session = connector.open(config).await?;
    let result = export_with_session(&session, options).await;
    session.close().await;
    result
}

/// Export using an already opened session. The caller keeps ownership of it.
pub async fn export_with_session<S: AdminSession + ?Sized>(
    session: &S,
    options: &ExportOptions,
) -> Result<ExportReport, SyncError> {
    let descriptors = session.list_topics().await?;
    debug!("Cluster reported {} topics", descriptors.len());

    let document = build_snapshot(&descriptors, options.exclude_internal, Utc::now());
    let excluded_internal = descriptors.len() - document.topics.len();

    SnapshotLoader::write_to_path(&document, &options.output)?;
    info!(
        "Exported {} topics to {} ({} internal topics excluded)",
        document.topics.len(),
        options.output.display(),
        excluded_internal
    );

    Ok(ExportReport {
        output: options.output.clone(),
        exported: document.topics.len(),
        excluded_internal,
    })
}
