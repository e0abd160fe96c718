//! Session wiring: one photo store, one settings store and one exporter,
//! opened together from an [`AppConfig`].

use std::sync::Arc;

use tracing::info;

use camnotes_core::config::{resolve_dir, AppConfig};
use camnotes_core::error::CamNotesError;

use crate::kv::{FileStore, KeyValueStore, MemoryStore};
use crate::photos::PhotoStore;
use crate::settings::SettingsStore;
use crate::transfer::{DirectoryExporter, ExportCollaborator, MemoryExporter};

/// Everything the UI layer needs for one process lifetime.
pub struct Journal {
    pub photos: PhotoStore,
    pub settings: SettingsStore,
    exporter: Arc<dyn ExportCollaborator>,
    file_prefix: String,
}

impl Journal {
    /// Open the on-disk journal described by `config`.
    pub async fn open(config: &AppConfig) -> Result<Self, CamNotesError> {
        let data_dir = resolve_dir(&config.general.data_dir);
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&data_dir).await?);
        let exporter = Arc::new(DirectoryExporter::new(resolve_dir(&config.export.backup_dir)));

        let journal = Self::with_store(kv, exporter, config).await?;
        info!(
            data_dir = %data_dir.display(),
            photos = journal.photos.len(),
            "Journal opened"
        );
        Ok(journal)
    }

    /// A journal backed by memory only, with default configuration.
    pub async fn in_memory() -> Result<Self, CamNotesError> {
        Self::with_store(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryExporter::new()),
            &AppConfig::default(),
        )
        .await
    }

    /// Build a journal over caller-supplied collaborators.
    pub async fn with_store(
        kv: Arc<dyn KeyValueStore>,
        exporter: Arc<dyn ExportCollaborator>,
        config: &AppConfig,
    ) -> Result<Self, CamNotesError> {
        let photos = PhotoStore::open(Arc::clone(&kv), config.storage.photos_key.as_str()).await?;
        let settings = SettingsStore::open(kv, config.storage.settings_key.as_str()).await?;

        Ok(Self {
            photos,
            settings,
            exporter,
            file_prefix: config.export.file_prefix.clone(),
        })
    }

    /// Export a backup through the configured exporter.
    pub async fn export_backup(&self) -> Result<String, CamNotesError> {
        self.photos
            .export_to(self.exporter.as_ref(), &self.file_prefix)
            .await
    }

    /// Import a backup payload ahead of the existing photos.
    pub async fn import_backup(&mut self, json: &str) -> Result<usize, CamNotesError> {
        self.photos.import_json(json).await
    }
}

impl std::fmt::Debug for Journal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Journal")
            .field("photos", &self.photos)
            .field("settings", &self.settings)
            .finish()
    }
}
