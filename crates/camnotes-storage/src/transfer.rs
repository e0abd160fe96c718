//! Backup export and import.
//!
//! Backups are the photo collection as a pretty-printed JSON array. Where a
//! backup goes is platform-specific and lives behind [`ExportCollaborator`],
//! chosen once at startup.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use camnotes_core::error::CamNotesError;
use camnotes_core::media::is_valid_photo;
use camnotes_core::types::Photo;

/// Serialize `photos` as a pretty-printed JSON array.
pub fn export_json(photos: &[Photo]) -> Result<String, CamNotesError> {
    Ok(serde_json::to_string_pretty(photos)?)
}

/// Parse a backup payload into photo records.
///
/// The payload must be a JSON array of records, each with a non-empty `id`
/// and `path` and a valid `timestamp`. Tags are recomputed from captions.
pub fn parse_import(json: &str) -> Result<Vec<Photo>, CamNotesError> {
    let mut photos: Vec<Photo> = serde_json::from_str(json)
        .map_err(|e| CamNotesError::InvalidImport(format!("Not a photo array: {}", e)))?;

    if let Some(index) = photos.iter().position(|p| !is_valid_photo(p)) {
        return Err(CamNotesError::InvalidImport(format!(
            "Record {} is missing an id or path",
            index
        )));
    }

    for photo in &mut photos {
        photo.refresh_tags();
    }
    Ok(photos)
}

/// `<prefix>_<unix-millis>.json`
pub fn backup_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.json", prefix, now.timestamp_millis())
}

/// Destination for exported backups.
#[async_trait]
pub trait ExportCollaborator: Send + Sync {
    /// Deliver `contents` under `filename`, returning a human-readable
    /// location for the result.
    async fn deliver(&self, filename: &str, contents: &str) -> Result<String, CamNotesError>;
}

/// Writes backups into a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    dir: PathBuf,
}

impl DirectoryExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ExportCollaborator for DirectoryExporter {
    async fn deliver(&self, filename: &str, contents: &str) -> Result<String, CamNotesError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(filename);
        tokio::fs::write(&path, contents).await?;
        info!(path = %path.display(), bytes = contents.len(), "Backup written");
        Ok(path.display().to_string())
    }
}

/// Keeps delivered backups in memory, for ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryExporter {
    deliveries: Mutex<Vec<(String, String)>>,
}

impl MemoryExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(filename, contents)` delivered so far, oldest first.
    pub fn deliveries(&self) -> Result<Vec<(String, String)>, CamNotesError> {
        let deliveries = self
            .deliveries
            .lock()
            .map_err(|e| CamNotesError::PersistenceRead(format!("Exporter lock poisoned: {}", e)))?;
        Ok(deliveries.clone())
    }
}

#[async_trait]
impl ExportCollaborator for MemoryExporter {
    async fn deliver(&self, filename: &str, contents: &str) -> Result<String, CamNotesError> {
        let mut deliveries = self
            .deliveries
            .lock()
            .map_err(|e| CamNotesError::PersistenceWrite(format!("Exporter lock poisoned: {}", e)))?;
        deliveries.push((filename.to_string(), contents.to_string()));
        Ok(format!("memory:{}", filename))
    }
}
