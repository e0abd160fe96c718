//! End-to-end journal lifecycle over a file-backed store.
//!
//! Each test gets its own temporary data directory and reopens the journal
//! to check what actually reached disk.

use camnotes_core::config::AppConfig;
use camnotes_core::error::CamNotesError;
use camnotes_core::query::{compute_statistics, filter_and_sort, popular_tags};
use camnotes_core::tags::extract_tags;
use camnotes_core::types::{PhotoPatch, SettingsPatch, SortOrder};
use camnotes_storage::Journal;

// =============================================================================
// Helpers
// =============================================================================

fn config_in(dir: &std::path::Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.general.data_dir = dir.join("data").display().to_string();
    config.export.backup_dir = dir.join("backups").display().to_string();
    config
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_add_then_reload_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let added = {
        let mut journal = Journal::open(&config).await.unwrap();
        journal
            .photos
            .add("file:///photos/1.jpg", "Phở sáng #HàNội #food #food")
            .await
            .unwrap()
    };

    let reopened = Journal::open(&config).await.unwrap();
    let loaded = reopened.photos.get(&added.id).unwrap();
    assert_eq!(loaded, &added);
    assert_eq!(loaded.tags, extract_tags(loaded.caption.as_deref()));
    assert_eq!(loaded.tags, vec!["#hànội", "#food"]);
}

#[tokio::test]
async fn test_sequential_edits_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    {
        let mut journal = Journal::open(&config).await.unwrap();
        let a = journal.photos.add("file:///a.jpg", "beach #sea").await.unwrap();
        let b = journal.photos.add("file:///b.jpg", "mountain #hike").await.unwrap();
        let c = journal.photos.add("file:///c.jpg", "lake #hike").await.unwrap();

        journal
            .photos
            .update(&a.id, &PhotoPatch::caption("sunny beach #sea #sun"))
            .await
            .unwrap();
        journal.photos.toggle_favorite(&b.id).await.unwrap();
        journal.photos.remove(&c.id).await.unwrap();
        journal.photos.remove(&c.id).await.unwrap();

        let err = journal
            .photos
            .update(&c.id, &PhotoPatch::caption("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, CamNotesError::NotFound { .. }));
    }

    let journal = Journal::open(&config).await.unwrap();
    let photos = journal.photos.photos();
    assert_eq!(photos.len(), 2);

    let stats = compute_statistics(photos);
    assert_eq!(stats.total, 2);
    assert_eq!(stats.favorites, 1);
    assert_eq!(stats.unique_tag_count, 3);

    let by_favorite = filter_and_sort(photos, "", SortOrder::Favorites);
    assert!(by_favorite[0].favorite);
    assert_eq!(by_favorite[0].caption.as_deref(), Some("mountain #hike"));

    let beach = filter_and_sort(photos, "BEACH", SortOrder::Newest);
    assert_eq!(beach.len(), 1);
    assert_eq!(beach[0].tags, vec!["#sea", "#sun"]);
}

#[tokio::test]
async fn test_filter_and_sort_blank_query_is_newest_first() {
    let mut journal = Journal::in_memory().await.unwrap();
    for i in 0..5 {
        journal
            .photos
            .add(&format!("file:///{}.jpg", i), &format!("photo {}", i))
            .await
            .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }

    let sorted = filter_and_sort(journal.photos.photos(), "", SortOrder::Newest);
    assert_eq!(sorted.len(), 5);
    assert!(sorted.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert_eq!(sorted[0].caption.as_deref(), Some("photo 4"));
}

#[tokio::test]
async fn test_export_import_duplicates_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let mut journal = Journal::open(&config).await.unwrap();

    journal.photos.add("file:///a.jpg", "#trip day one").await.unwrap();
    journal.photos.add("file:///b.jpg", "#trip day two").await.unwrap();

    let location = journal.export_backup().await.unwrap();
    let backup = std::fs::read_to_string(&location).unwrap();
    assert!(location.contains("camera_notes_backup_"));

    assert_eq!(journal.import_backup(&backup).await.unwrap(), 2);
    assert_eq!(journal.import_backup(&backup).await.unwrap(), 2);
    assert_eq!(journal.photos.len(), 6);

    let top = popular_tags(journal.photos.photos(), 1);
    assert_eq!(top[0].tag, "#trip");
    assert_eq!(top[0].count, 6);

    let reopened = Journal::open(&config).await.unwrap();
    assert_eq!(reopened.photos.len(), 6);
}

#[tokio::test]
async fn test_malformed_import_is_reported() {
    let mut journal = Journal::in_memory().await.unwrap();
    journal.photos.add("file:///a.jpg", "keep").await.unwrap();

    let err = journal.import_backup("not json at all").await.unwrap_err();
    assert!(matches!(err, CamNotesError::InvalidImport(_)));
    assert_eq!(journal.photos.len(), 1);
}

#[tokio::test]
async fn test_corrupt_collection_fails_open() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(
        dir.path().join("data").join("_camera_notes_photos.json"),
        "[{\"id\": broken",
    )
    .unwrap();

    let err = Journal::open(&config).await.unwrap_err();
    assert!(matches!(err, CamNotesError::PersistenceRead(_)));
}

#[tokio::test]
async fn test_settings_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    {
        let mut journal = Journal::open(&config).await.unwrap();
        journal
            .settings
            .update(&SettingsPatch {
                dark_mode: Some(true),
                grid_columns: Some(7),
                ..SettingsPatch::default()
            })
            .await
            .unwrap();
    }

    let mut journal = Journal::open(&config).await.unwrap();
    assert!(journal.settings.settings().dark_mode);
    assert_eq!(journal.settings.settings().grid_columns, 4);

    journal.settings.reset().await.unwrap();
    let journal = Journal::open(&config).await.unwrap();
    assert!(!journal.settings.settings().dark_mode);
}
