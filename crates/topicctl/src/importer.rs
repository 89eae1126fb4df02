//! Replay of a snapshot onto a live cluster.
//!
//! Topics are created one at a time in document order. Creation is not
//! transactional: a failed run leaves earlier creations in place, and a
//! re-run with `skip_if_exists` picks up where it stopped.

use crate::{
    SyncError,
    exporter::DEFAULT_SNAPSHOT_PATH,
    session::{AdminConnector, AdminSession, SessionConfig},
    snapshot::{SnapshotDocument, SnapshotLoader},
};
use log::{debug, info, warn};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub input: PathBuf,
    /// Skip topics that already exist instead of aborting.
    pub skip_if_exists: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
            skip_if_exists: true,
        }
    }
}

/// Outcome of a successful import, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len()
    }
}

/// Import the snapshot at `options.input` into the cluster behind `connector`.
///
/// The snapshot is parsed before any session is opened, so malformed input
/// never reaches the cluster.
pub async fn import<C: AdminConnector>(
    connector: &C,
    config: &SessionConfig,
    options: &ImportOptions,
) -> Result<ImportReport, SyncError> {
    let document = SnapshotLoader::from_path(&options.input)?;
    debug!(
        "Importing {} topics from {} (exported {}, format version {})",
        document.topics.len(),
        options.input.display(),
        document
            .generated_at
            .map_or_else(|| "unknown".to_string(), |time| time.to_rfc3339()),
        document.format_version
    );

    let mut session = connector.open(config).await?;
    let result = apply_snapshot(&session, &document, options.skip_if_exists).await;
    session.close().await;
    result
}

/// Create every topic of `document` through `session`.
///
/// Any error other than an already-existing topic aborts immediately, as
/// does an existing topic when `skip_if_exists` is false.
pub async fn apply_snapshot<S: AdminSession + ?Sized>(
    session: &S,
    document: &SnapshotDocument,
    skip_if_exists: bool,
) -> Result<ImportReport, SyncError> {
    let mut report = ImportReport::default();

    for topic in &document.topics {
        match session.create_topic(topic).await {
            Ok(()) => {
                info!("Created topic {topic}");
                report.created.push(topic.name.clone());
            }
            Err(e) if e.is_already_exists() && skip_if_exists => {
                warn!("Skipping existing topic '{}'", topic.name);
                report.skipped.push(topic.name.clone());
            }
            Err(e) => {
                if !report.created.is_empty() {
                    warn!(
                        "Import aborted at '{}' after creating {} topics",
                        topic.name,
                        report.created.len()
                    );
                }
                return Err(e);
            }
        }
    }

    Ok(report)
}
