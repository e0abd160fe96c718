use std::convert::Infallible;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::media::generate_photo_id;
use crate::tags::extract_tags;

// =============================================================================
// Photo records
// =============================================================================

/// One captured image plus its caption and metadata.
///
/// `tags` is derived from `caption` and must only change through
/// [`Photo::set_caption`] or [`Photo::refresh_tags`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    /// Unique, time-derived identifier.
    pub id: String,
    /// URI of the image data. The image itself is owned elsewhere.
    pub path: String,
    /// Free-text caption; may be absent or empty.
    #[serde(default)]
    pub caption: Option<String>,
    /// Creation time, immutable after capture.
    pub timestamp: DateTime<Utc>,
    /// Lowercase, deduplicated hashtags extracted from the caption.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub favorite: bool,
}

impl Photo {
    /// Build a new record for a freshly captured image.
    ///
    /// The timestamp is truncated to milliseconds so the persisted form
    /// matches what other clients of the same store write.
    pub fn capture(path: impl Into<String>, caption: impl Into<String>, now: DateTime<Utc>) -> Self {
        let caption = caption.into();
        let tags = extract_tags(caption.as_str());
        Self {
            id: generate_photo_id(now),
            path: path.into(),
            caption: Some(caption),
            timestamp: now.trunc_subsecs(3),
            tags,
            favorite: false,
        }
    }

    /// The caption, or `""` when absent.
    pub fn caption_str(&self) -> &str {
        self.caption.as_deref().unwrap_or_default()
    }

    /// True when the caption is present and non-empty.
    pub fn has_caption(&self) -> bool {
        !self.caption_str().is_empty()
    }

    /// Replace the caption and recompute tags from it.
    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = Some(caption.into());
        self.refresh_tags();
    }

    /// Recompute `tags` from the current caption.
    pub fn refresh_tags(&mut self) {
        self.tags = extract_tags(self.caption.as_deref());
    }

    /// Apply a caller-supplied patch. Identity and creation time never change.
    pub fn apply(&mut self, patch: &PhotoPatch) {
        if let Some(ref path) = patch.path {
            self.path = path.clone();
        }
        if let Some(ref caption) = patch.caption {
            self.set_caption(caption.clone());
        }
        if let Some(favorite) = patch.favorite {
            self.favorite = favorite;
        }
    }
}

/// Partial update for a photo record.
///
/// Has no `tags` field. Tags always follow the caption, and a `tags` key in
/// a JSON patch is ignored on decode.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PhotoPatch {
    pub caption: Option<String>,
    pub path: Option<String>,
    pub favorite: Option<bool>,
}

impl PhotoPatch {
    pub fn caption(caption: impl Into<String>) -> Self {
        Self {
            caption: Some(caption.into()),
            ..Self::default()
        }
    }

    pub fn favorite(favorite: bool) -> Self {
        Self {
            favorite: Some(favorite),
            ..Self::default()
        }
    }
}

// =============================================================================
// Settings
// =============================================================================

pub const MIN_GRID_COLUMNS: u8 = 1;
pub const MAX_GRID_COLUMNS: u8 = 4;

/// Clamp a requested grid column count to the supported range.
pub fn clamp_grid_columns(columns: i64) -> u8 {
    columns.clamp(MIN_GRID_COLUMNS as i64, MAX_GRID_COLUMNS as i64) as u8
}

/// User preferences for the journal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub auto_save: bool,
    pub show_date: bool,
    pub dark_mode: bool,
    /// Gallery columns, always within 1..=4.
    pub grid_columns: u8,
    pub enable_haptic: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_save: true,
            show_date: true,
            dark_mode: false,
            grid_columns: 2,
            enable_haptic: true,
        }
    }
}

impl Settings {
    /// Return a copy with every field present in `patch` overriding `self`.
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            auto_save: patch.auto_save.unwrap_or(self.auto_save),
            show_date: patch.show_date.unwrap_or(self.show_date),
            dark_mode: patch.dark_mode.unwrap_or(self.dark_mode),
            grid_columns: patch
                .grid_columns
                .map(clamp_grid_columns)
                .unwrap_or(self.grid_columns),
            enable_haptic: patch.enable_haptic.unwrap_or(self.enable_haptic),
        }
    }
}

/// Partial settings, used both for updates and for decoding persisted
/// values written by older or newer versions. Unknown keys are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_save: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_date: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_columns: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_haptic: Option<bool>,
}

// =============================================================================
// Query types
// =============================================================================

/// Display ordering for a photo collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Descending timestamp.
    #[default]
    Newest,
    /// Ascending timestamp.
    Oldest,
    /// Ascending caption, missing captions sort as empty.
    Caption,
    /// Favorites first, then descending timestamp.
    Favorites,
    /// Input order is kept.
    #[serde(other)]
    Unsorted,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Newest => "newest",
            SortOrder::Oldest => "oldest",
            SortOrder::Caption => "caption",
            SortOrder::Favorites => "favorites",
            SortOrder::Unsorted => "unsorted",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Infallible;

    /// Unknown criteria map to [`SortOrder::Unsorted`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "newest" => SortOrder::Newest,
            "oldest" => SortOrder::Oldest,
            "caption" => SortOrder::Caption,
            "favorites" => SortOrder::Favorites,
            _ => SortOrder::Unsorted,
        })
    }
}

impl From<&str> for SortOrder {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(order) => order,
            Err(never) => match never {},
        }
    }
}

/// Aggregate figures over a photo collection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoStatistics {
    pub total: usize,
    pub with_captions: usize,
    pub without_captions: usize,
    pub favorites: usize,
    /// Tag occurrences across all photos, duplicates across photos counted.
    pub total_tags: usize,
    pub unique_tag_count: usize,
    /// Mean caption length in characters over captioned photos, rounded.
    pub average_caption_length: usize,
    pub oldest_timestamp: Option<DateTime<Utc>>,
    pub newest_timestamp: Option<DateTime<Utc>>,
}

/// A tag and how many photos carry it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 6, 14, 30, 0).unwrap()
    }

    #[test]
    fn test_capture_derives_tags_and_defaults() {
        let photo = Photo::capture("file:///a.jpg", "Lunch #Food #food", fixed_now());
        assert!(photo.id.starts_with("photo_"));
        assert_eq!(photo.path, "file:///a.jpg");
        assert_eq!(photo.caption.as_deref(), Some("Lunch #Food #food"));
        assert_eq!(photo.tags, vec!["#food"]);
        assert!(!photo.favorite);
        assert_eq!(photo.timestamp, fixed_now());
    }

    #[test]
    fn test_apply_patch_recomputes_tags() {
        let mut photo = Photo::capture("file:///a.jpg", "#old", fixed_now());
        let id = photo.id.clone();
        photo.apply(&PhotoPatch::caption("now #new"));
        assert_eq!(photo.tags, vec!["#new"]);
        assert_eq!(photo.id, id);
        assert_eq!(photo.timestamp, fixed_now());
    }

    #[test]
    fn test_apply_patch_empty_caption_clears_tags() {
        let mut photo = Photo::capture("file:///a.jpg", "#old", fixed_now());
        photo.apply(&PhotoPatch::caption(""));
        assert!(photo.tags.is_empty());
        assert!(!photo.has_caption());
    }

    #[test]
    fn test_patch_ignores_tags_key() {
        let patch: PhotoPatch =
            serde_json::from_str(r##"{"caption": "x #real", "tags": ["#fake"]}"##).unwrap();
        let mut photo = Photo::capture("file:///a.jpg", "", fixed_now());
        photo.apply(&patch);
        assert_eq!(photo.tags, vec!["#real"]);
    }

    #[test]
    fn test_photo_deserializes_legacy_record() {
        let json = r##"{
            "id": "1728210000000",
            "path": "data:image/jpeg;base64,AAAA",
            "caption": "Hồ Gươm #HàNội",
            "timestamp": "2025-10-06T10:20:00.000Z",
            "tags": ["#hànội"],
            "favorite": true
        }"##;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.id, "1728210000000");
        assert!(photo.favorite);
        assert_eq!(photo.tags, vec!["#hànội"]);
    }

    #[test]
    fn test_photo_missing_optional_fields() {
        let json = r#"{"id": "a", "path": "p", "timestamp": "2025-10-06T10:20:00Z"}"#;
        let photo: Photo = serde_json::from_str(json).unwrap();
        assert_eq!(photo.caption, None);
        assert!(photo.tags.is_empty());
        assert!(!photo.favorite);
    }

    #[test]
    fn test_settings_merge_and_clamp() {
        let base = Settings::default();
        let patch = SettingsPatch {
            dark_mode: Some(true),
            grid_columns: Some(9),
            ..SettingsPatch::default()
        };
        let merged = base.merged(&patch);
        assert!(merged.dark_mode);
        assert_eq!(merged.grid_columns, MAX_GRID_COLUMNS);
        assert_eq!(merged.auto_save, base.auto_save);
    }

    #[test]
    fn test_clamp_grid_columns() {
        assert_eq!(clamp_grid_columns(-3), 1);
        assert_eq!(clamp_grid_columns(0), 1);
        assert_eq!(clamp_grid_columns(3), 3);
        assert_eq!(clamp_grid_columns(i64::MAX), 4);
    }

    #[test]
    fn test_settings_patch_ignores_unknown_keys() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"darkMode": true, "language": "vi"}"#).unwrap();
        assert_eq!(patch.dark_mode, Some(true));
        assert_eq!(patch.auto_save, None);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["gridColumns"], 2);
        assert_eq!(value["enableHaptic"], true);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!(SortOrder::from("newest"), SortOrder::Newest);
        assert_eq!(SortOrder::from("Oldest"), SortOrder::Oldest);
        assert_eq!(SortOrder::from("caption"), SortOrder::Caption);
        assert_eq!(SortOrder::from("favorites"), SortOrder::Favorites);
        assert_eq!(SortOrder::from("size"), SortOrder::Unsorted);
    }

    #[test]
    fn test_sort_order_serde_unknown_is_unsorted() {
        let order: SortOrder = serde_json::from_str(r#""random""#).unwrap();
        assert_eq!(order, SortOrder::Unsorted);
    }
}
