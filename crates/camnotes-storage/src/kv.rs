//! Durable key-value collaborators.
//!
//! The journal needs only `get` and `set` of whole string values. Two
//! implementations are provided: an in-process map and a directory with one
//! JSON file per key.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{debug, info};

use camnotes_core::error::CamNotesError;

/// Device storage holding string values under string keys.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`; `Ok(None)` when nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, CamNotesError>;

    /// Replace the value for `key`. On error the previous value remains.
    async fn set(&self, key: &str, value: &str) -> Result<(), CamNotesError>;
}

/// In-process store. Values live only as long as the instance.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CamNotesError> {
        let values = self
            .values
            .lock()
            .map_err(|e| CamNotesError::PersistenceRead(format!("Store lock poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CamNotesError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| CamNotesError::PersistenceWrite(format!("Store lock poisoned: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed store: each key is a `<key>.json` file.
///
/// Key characters outside `[A-Za-z0-9_-]` are replaced with `_`, so
/// `@camera_notes_photos` lives in `_camera_notes_photos.json`. Writes go to
/// a temporary file that is then renamed over the old one.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (or create) a store rooted at `dir`.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, CamNotesError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        info!("File store opened at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", name))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CamNotesError> {
        let path = self.path_for(key);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CamNotesError::PersistenceRead(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CamNotesError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        tokio::fs::write(&tmp, value).await.map_err(|e| {
            CamNotesError::PersistenceWrite(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| {
            CamNotesError::PersistenceWrite(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!(key, bytes = value.len(), "Value persisted");
        Ok(())
    }
}
