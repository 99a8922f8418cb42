use super::*;
use crate::config::CatalogSettings;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

fn audio(owner: i64, id: u64, artist: &str, title: &str) -> Audio {
    Audio {
        id,
        owner_id: owner,
        artist: artist.into(),
        title: title.into(),
        duration: None,
        url: format!("https://audio.example/{owner}/{id}"),
        cache_file: None,
        display: compose_display(artist, title, " - "),
    }
}

#[test]
fn key_combines_owner_and_id() {
    assert_eq!(audio(42, 7, "A", "B").key(), "42_7");
    assert_eq!(audio(-3, 100, "A", "B").key(), "-3_100");
}

#[test]
fn is_cached_follows_cache_file() {
    let mut a = audio(1, 1, "A", "B");
    assert!(!a.is_cached());
    a.cache_file = Some(std::path::PathBuf::from("/tmp/1_1.mp3"));
    assert!(a.is_cached());
}

#[test]
fn compose_display_skips_blank_parts() {
    assert_eq!(compose_display("Artist", "Song", " - "), "Artist - Song");
    assert_eq!(compose_display("  Artist  ", "Song", " - "), "Artist - Song");
    assert_eq!(compose_display("", "Song", " - "), "Song");
    assert_eq!(compose_display("Artist", "   ", " - "), "Artist");
    assert_eq!(compose_display("  ", "", " - "), "<untitled>");
}

#[test]
fn load_snapshot_parses_records_in_stored_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(
        &path,
        r#"[
            {"id": 2, "owner_id": 10, "artist": "Beta", "title": "Second", "duration_secs": 181, "url": "https://a/2"},
            {"id": 1, "owner_id": 10, "artist": "Alpha", "title": "First", "url": "https://a/1"}
        ]"#,
    )
    .unwrap();

    let tracks = load_snapshot(&path, &CatalogSettings::default()).unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].key(), "10_2");
    assert_eq!(tracks[0].duration, Some(Duration::from_secs(181)));
    assert_eq!(tracks[0].display, "Beta - Second");
    assert_eq!(tracks[1].key(), "10_1");
    assert_eq!(tracks[1].duration, None);
    assert!(tracks.iter().all(|t| !t.is_cached()));
}

#[test]
fn load_snapshot_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(load_snapshot(&path, &CatalogSettings::default()).is_err());
}
