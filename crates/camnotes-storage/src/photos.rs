//! The authoritative photo collection and its write-through persistence.
//!
//! Storage order is newest-first by insertion (new captures and imports are
//! prepended), independent of any display sort.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use camnotes_core::error::CamNotesError;
use camnotes_core::types::{Photo, PhotoPatch};

use crate::kv::KeyValueStore;
use crate::transfer::{self, ExportCollaborator};

/// Owns the photo collection for one process.
pub struct PhotoStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    photos: Vec<Photo>,
}

impl PhotoStore {
    /// Create an empty store over `kv`. Call [`PhotoStore::load`] before use.
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            photos: Vec::new(),
        }
    }

    /// Create a store and load the persisted collection.
    pub async fn open(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, CamNotesError> {
        let mut store = Self::new(kv, key);
        store.load().await?;
        Ok(store)
    }

    /// Read the persisted collection, replacing the in-memory copy.
    ///
    /// Nothing persisted yields an empty collection. A value that is not a
    /// valid photo array is a `PersistenceRead` error and leaves the
    /// in-memory copy untouched. Tags are recomputed from captions.
    pub async fn load(&mut self) -> Result<&[Photo], CamNotesError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            info!(key = %self.key, "No persisted photos, starting empty");
            self.photos.clear();
            return Ok(&self.photos);
        };

        let mut photos: Vec<Photo> = serde_json::from_str(&raw).map_err(|e| {
            CamNotesError::PersistenceRead(format!("Corrupt photo collection: {}", e))
        })?;
        for photo in &mut photos {
            photo.refresh_tags();
        }

        info!(count = photos.len(), "Photos loaded");
        self.photos = photos;
        Ok(&self.photos)
    }

    /// The current collection in storage order.
    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn get(&self, id: &str) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Save a newly captured photo at the front of the collection.
    pub async fn add(&mut self, photo_uri: &str, caption: &str) -> Result<Photo, CamNotesError> {
        let photo = Photo::capture(photo_uri, caption, Utc::now());

        let mut next = Vec::with_capacity(self.photos.len() + 1);
        next.push(photo.clone());
        next.extend(self.photos.iter().cloned());
        self.commit(next).await?;

        debug!(id = %photo.id, tags = photo.tags.len(), "Photo added");
        Ok(photo)
    }

    /// Apply `patch` to the photo with `id`. Tags follow the new caption.
    pub async fn update(&mut self, id: &str, patch: &PhotoPatch) -> Result<(), CamNotesError> {
        let Some(index) = self.position(id) else {
            warn!(id, "Update for unknown photo");
            return Err(CamNotesError::not_found(id));
        };

        let mut next = self.photos.clone();
        next[index].apply(patch);
        self.commit(next).await?;

        debug!(id, "Photo updated");
        Ok(())
    }

    /// Flip the favorite flag of the photo with `id`.
    pub async fn toggle_favorite(&mut self, id: &str) -> Result<(), CamNotesError> {
        let Some(index) = self.position(id) else {
            warn!(id, "Favorite toggle for unknown photo");
            return Err(CamNotesError::not_found(id));
        };

        let mut next = self.photos.clone();
        next[index].favorite = !next[index].favorite;
        self.commit(next).await?;

        debug!(id, favorite = self.photos[index].favorite, "Favorite toggled");
        Ok(())
    }

    /// Delete the photo with `id`. Unknown ids are ignored.
    pub async fn remove(&mut self, id: &str) -> Result<(), CamNotesError> {
        self.remove_many(&[id]).await
    }

    /// Delete every photo whose id is in `ids`. Unknown ids are ignored and
    /// nothing is written when no photo matches.
    pub async fn remove_many<S: AsRef<str>>(&mut self, ids: &[S]) -> Result<(), CamNotesError> {
        let doomed: HashSet<&str> = ids.iter().map(|s| s.as_ref()).collect();
        let next: Vec<Photo> = self
            .photos
            .iter()
            .filter(|p| !doomed.contains(p.id.as_str()))
            .cloned()
            .collect();

        let removed = self.photos.len() - next.len();
        if removed == 0 {
            debug!(requested = ids.len(), "Nothing to remove");
            return Ok(());
        }

        self.commit(next).await?;
        debug!(removed, "Photos removed");
        Ok(())
    }

    /// Persist an empty collection.
    pub async fn clear(&mut self) -> Result<(), CamNotesError> {
        let previous = self.photos.len();
        self.commit(Vec::new()).await?;
        info!(removed = previous, "All photos cleared");
        Ok(())
    }

    /// Put `imported` ahead of the existing photos.
    ///
    /// Ids are not deduplicated: importing the same backup twice yields two
    /// copies of each record.
    pub async fn import_merge(&mut self, imported: Vec<Photo>) -> Result<(), CamNotesError> {
        let count = imported.len();
        let mut next = imported;
        for photo in &mut next {
            photo.refresh_tags();
        }
        next.extend(self.photos.iter().cloned());
        self.commit(next).await?;

        info!(imported = count, total = self.photos.len(), "Photos imported");
        Ok(())
    }

    /// Parse a backup payload and merge it. Returns how many records were
    /// imported. A malformed payload is `InvalidImport` and changes nothing.
    pub async fn import_json(&mut self, json: &str) -> Result<usize, CamNotesError> {
        let imported = transfer::parse_import(json)?;
        let count = imported.len();
        self.import_merge(imported).await?;
        Ok(count)
    }

    /// The full collection as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, CamNotesError> {
        transfer::export_json(&self.photos)
    }

    /// Hand a backup of the collection to `exporter`, returning where it
    /// ended up.
    pub async fn export_to(
        &self,
        exporter: &dyn ExportCollaborator,
        file_prefix: &str,
    ) -> Result<String, CamNotesError> {
        let contents = self.export_json()?;
        let filename = transfer::backup_filename(file_prefix, Utc::now());
        let location = exporter.deliver(&filename, &contents).await?;
        info!(count = self.photos.len(), location = %location, "Backup exported");
        Ok(location)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.photos.iter().position(|p| p.id == id)
    }

    /// Persist `next` and only then make it the in-memory collection.
    async fn commit(&mut self, next: Vec<Photo>) -> Result<(), CamNotesError> {
        let json = serde_json::to_string(&next).map_err(|e| {
            CamNotesError::PersistenceWrite(format!("Failed to serialize photos: {}", e))
        })?;

        if let Err(e) = self.kv.set(&self.key, &json).await {
            warn!(error = %e, "Photo collection write failed");
            return Err(e);
        }

        self.photos = next;
        Ok(())
    }
}

impl std::fmt::Debug for PhotoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoStore")
            .field("key", &self.key)
            .field("photos", &self.photos.len())
            .finish()
    }
}
