//! Snapshot loading and file I/O operations.

use super::types::SnapshotDocument;
use crate::SyncError;
use log::debug;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// On-disk encoding of a snapshot, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.yaml` and `.yml` select YAML; everything else is JSON.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => SnapshotFormat::Yaml,
            _ => SnapshotFormat::Json,
        }
    }
}

/// Snapshot loader with file I/O operations.
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load and validate a snapshot from a file path.
    ///
    /// `.json` files are parsed as JSON, `.yaml`/`.yml` as YAML. Other
    /// extensions try JSON first and fall back to YAML.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<SnapshotDocument, SyncError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SyncError::from_io_error(e, &format!("reading {}", path.display())))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let document = match extension.as_str() {
            "json" => Self::from_json(&content)?,
            "yaml" | "yml" => Self::from_yaml(&content)?,
            _ => serde_json::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .map_err(|e| {
                    SyncError::from_parse_error(e, "snapshot parsing (tried both JSON and YAML)")
                })?,
        };

        document.validate()?;
        debug!(
            "Loaded snapshot from {} with {} topics (format version {})",
            path.display(),
            document.topics.len(),
            document.format_version
        );
        Ok(document)
    }

    pub fn from_json(content: &str) -> Result<SnapshotDocument, SyncError> {
        serde_json::from_str(content)
            .map_err(|e| SyncError::from_parse_error(e, "JSON snapshot parsing"))
    }

    pub fn from_yaml(content: &str) -> Result<SnapshotDocument, SyncError> {
        serde_yaml::from_str(content)
            .map_err(|e| SyncError::from_parse_error(e, "YAML snapshot parsing"))
    }

    /// Render a snapshot in the given format.
    pub fn render(
        document: &SnapshotDocument,
        format: SnapshotFormat,
    ) -> Result<String, SyncError> {
        match format {
            SnapshotFormat::Json => serde_json::to_string_pretty(document)
                .map_err(|e| SyncError::from_write_error(e, "JSON snapshot encoding")),
            SnapshotFormat::Yaml => serde_yaml::to_string(document)
                .map_err(|e| SyncError::from_write_error(e, "YAML snapshot encoding")),
        }
    }

    /// Write a snapshot to `path`, replacing any existing file.
    ///
    /// Content goes to a temporary file in the destination directory first
    /// and is renamed into place, so an existing snapshot is never left
    /// truncated by a failed write.
    pub fn write_to_path<P: AsRef<Path>>(
        document: &SnapshotDocument,
        path: P,
    ) -> Result<(), SyncError> {
        let path = path.as_ref();
        let content = Self::render(document, SnapshotFormat::from_path(path))?;

        let parent = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent)
            .map_err(|e| SyncError::from_write_error(e, "create temporary snapshot file"))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| SyncError::from_write_error(e, "write temporary snapshot file"))?;
        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| SyncError::from_write_error(e, "sync temporary snapshot file"))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            temp_file
                .as_file()
                .set_permissions(std::fs::Permissions::from_mode(0o644))
                .map_err(|e| SyncError::from_write_error(e, "set snapshot permissions"))?;
        }

        temp_file
            .persist(path)
            .map_err(|e| SyncError::from_write_error(e.error, "replace snapshot file"))?;

        debug!("Snapshot written to {}", path.display());
        Ok(())
    }
}
