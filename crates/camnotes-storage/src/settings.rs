//! Persisted user settings with defaults merged under stored values.

use std::sync::Arc;

use tracing::{debug, info, warn};

use camnotes_core::error::CamNotesError;
use camnotes_core::types::{Settings, SettingsPatch};

use crate::kv::KeyValueStore;

/// Owns the current [`Settings`] and writes every change through.
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    settings: Settings,
}

impl SettingsStore {
    /// A store holding defaults. Call [`SettingsStore::load`] before use.
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            settings: Settings::default(),
        }
    }

    pub async fn open(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Result<Self, CamNotesError> {
        let mut store = Self::new(kv, key);
        store.load().await?;
        Ok(store)
    }

    /// Read persisted settings and merge them over the defaults.
    ///
    /// Missing fields take their default, unknown fields are dropped, and an
    /// out-of-range `gridColumns` is clamped. A value that is not a settings
    /// object is a `PersistenceRead` error.
    pub async fn load(&mut self) -> Result<Settings, CamNotesError> {
        let Some(raw) = self.kv.get(&self.key).await? else {
            info!("No persisted settings, using defaults");
            self.settings = Settings::default();
            return Ok(self.settings.clone());
        };

        let patch: SettingsPatch = serde_json::from_str(&raw)
            .map_err(|e| CamNotesError::PersistenceRead(format!("Corrupt settings: {}", e)))?;
        self.settings = Settings::default().merged(&patch);

        info!(settings = ?self.settings, "Settings loaded");
        Ok(self.settings.clone())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge `patch` into the current settings and persist the result.
    pub async fn update(&mut self, patch: &SettingsPatch) -> Result<Settings, CamNotesError> {
        let next = self.settings.merged(patch);
        self.commit(next).await?;
        debug!(patch = ?patch, "Settings updated");
        Ok(self.settings.clone())
    }

    /// Persist and return the defaults.
    pub async fn reset(&mut self) -> Result<Settings, CamNotesError> {
        self.commit(Settings::default()).await?;
        info!("Settings reset to defaults");
        Ok(self.settings.clone())
    }

    /// Set the gallery column count, clamped to 1..=4.
    pub async fn set_grid_columns(&mut self, columns: i64) -> Result<Settings, CamNotesError> {
        self.update(&SettingsPatch {
            grid_columns: Some(columns),
            ..SettingsPatch::default()
        })
        .await
    }

    pub async fn toggle_dark_mode(&mut self) -> Result<Settings, CamNotesError> {
        let dark_mode = !self.settings.dark_mode;
        self.update(&SettingsPatch {
            dark_mode: Some(dark_mode),
            ..SettingsPatch::default()
        })
        .await
    }

    pub async fn toggle_show_date(&mut self) -> Result<Settings, CamNotesError> {
        let show_date = !self.settings.show_date;
        self.update(&SettingsPatch {
            show_date: Some(show_date),
            ..SettingsPatch::default()
        })
        .await
    }

    pub async fn toggle_auto_save(&mut self) -> Result<Settings, CamNotesError> {
        let auto_save = !self.settings.auto_save;
        self.update(&SettingsPatch {
            auto_save: Some(auto_save),
            ..SettingsPatch::default()
        })
        .await
    }

    async fn commit(&mut self, next: Settings) -> Result<(), CamNotesError> {
        let json = serde_json::to_string(&next).map_err(|e| {
            CamNotesError::PersistenceWrite(format!("Failed to serialize settings: {}", e))
        })?;

        if let Err(e) = self.kv.set(&self.key, &json).await {
            warn!(error = %e, "Settings write failed");
            return Err(e);
        }

        self.settings = next;
        Ok(())
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("key", &self.key)
            .field("settings", &self.settings)
            .finish()
    }
}
