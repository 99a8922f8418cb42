use super::*;
use crate::catalog::{Audio, compose_display};
use crate::config::CacheSettings;
use crate::session::{TokenEvent, TokenTracker};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
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

fn exts() -> Vec<String> {
    CacheSettings::default().extensions
}

/// Source that "fetches" by writing fixed bytes, for worker tests.
struct LocalSource {
    payload: &'static [u8],
}

impl AudioSource for LocalSource {
    fn fetch(&self, _request: &DownloadRequest, dest: &Path) -> Result<u64, FetchError> {
        fs::write(dest, self.payload)?;
        Ok(self.payload.len() as u64)
    }
}

struct FailingSource {
    error: fn() -> FetchError,
}

impl AudioSource for FailingSource {
    fn fetch(&self, _request: &DownloadRequest, _dest: &Path) -> Result<u64, FetchError> {
        Err((self.error)())
    }
}

#[test]
fn cache_path_is_keyed_mp3() {
    assert_eq!(
        cache_path(Path::new("/tmp/cache"), "10_2"),
        PathBuf::from("/tmp/cache/10_2.mp3")
    );
}

#[test]
fn find_cached_checks_every_recognized_extension() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("10_2.ogg"), b"x").unwrap();

    assert_eq!(
        find_cached(dir.path(), "10_2", &exts()),
        Some(dir.path().join("10_2.ogg"))
    );
    assert_eq!(find_cached(dir.path(), "10_3", &exts()), None);
}

#[test]
fn attach_cached_fills_in_files_found_on_disk() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1_1.mp3"), b"x").unwrap();

    let mut tracks = vec![audio(1, 1, "A", "One"), audio(1, 2, "B", "Two")];
    attach_cached(&mut tracks, dir.path(), &exts());

    assert!(tracks[0].is_cached());
    assert_eq!(tracks[0].cache_file, Some(dir.path().join("1_1.mp3")));
    assert!(!tracks[1].is_cached());
}

#[test]
fn remove_cached_deletes_only_the_keyed_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1_1.mp3"), b"x").unwrap();
    fs::write(dir.path().join("1_2.mp3"), b"y").unwrap();

    assert!(remove_cached(dir.path(), "1_1", &exts()).unwrap());
    assert!(!dir.path().join("1_1.mp3").exists());
    assert!(dir.path().join("1_2.mp3").exists());

    // Removing an uncached key is a no-op, not an error.
    assert!(!remove_cached(dir.path(), "1_1", &exts()).unwrap());
}

#[test]
fn offline_library_reads_keyed_files_and_skips_foreign_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("7_1.mp3"), b"not a real mp3").unwrap();
    fs::write(dir.path().join("notes.txt"), b"ignore").unwrap();
    fs::write(dir.path().join("stray.mp3"), b"no key").unwrap();

    let tracks = offline_library(dir.path(), &CacheSettings::default(), " - ");

    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].key(), "7_1");
    assert!(tracks[0].is_cached());
    // Unreadable tags fall back to the file stem.
    assert_eq!(tracks[0].title, "7_1");
}

#[test]
fn worker_download_emits_finished_and_writes_the_cache_file() {
    let dir = tempdir().unwrap();
    let (events_tx, events_rx) = mpsc::channel();
    let tracker = TokenTracker::new();

    let service = DownloadService::spawn(
        Box::new(LocalSource { payload: b"audio" }),
        dir.path().to_path_buf(),
        exts(),
        events_tx,
        tracker.notifier(),
    );

    let track = audio(5, 9, "Artist", "Song");
    service
        .send(DownloadCmd::Download(vec![DownloadRequest::from_audio(
            &track,
        )]))
        .unwrap();

    let ev = events_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    let expected = dir.path().join("5_9.mp3");
    assert_eq!(
        ev,
        DownloadEvent::Finished {
            key: "5_9".into(),
            cache_file: expected.clone(),
        }
    );
    assert_eq!(fs::read(expected).unwrap(), b"audio");
}

#[test]
fn worker_reports_existing_copy_without_refetching() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("5_9.mp3"), b"already here").unwrap();

    let (events_tx, events_rx) = mpsc::channel();
    let tracker = TokenTracker::new();

    // A failing source proves fetch is never attempted.
    let service = DownloadService::spawn(
        Box::new(FailingSource {
            error: || FetchError::Http("should not run".into()),
        }),
        dir.path().to_path_buf(),
        exts(),
        events_tx,
        tracker.notifier(),
    );

    let track = audio(5, 9, "Artist", "Song");
    service
        .send(DownloadCmd::Download(vec![DownloadRequest::from_audio(
            &track,
        )]))
        .unwrap();

    let ev = events_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(
        ev,
        DownloadEvent::Finished {
            key: "5_9".into(),
            cache_file: dir.path().join("5_9.mp3"),
        }
    );
}

#[test]
fn worker_failure_emits_failed_with_reason() {
    let dir = tempdir().unwrap();
    let (events_tx, events_rx) = mpsc::channel();
    let tracker = TokenTracker::new();

    let service = DownloadService::spawn(
        Box::new(FailingSource {
            error: || FetchError::Http("boom".into()),
        }),
        dir.path().to_path_buf(),
        exts(),
        events_tx,
        tracker.notifier(),
    );

    let track = audio(1, 2, "Artist", "Song");
    service
        .send(DownloadCmd::Download(vec![DownloadRequest::from_audio(
            &track,
        )]))
        .unwrap();

    match events_rx.recv_timeout(Duration::from_secs(2)).unwrap() {
        DownloadEvent::Failed { key, reason } => {
            assert_eq!(key, "1_2");
            assert!(reason.contains("boom"));
        }
        other => panic!("expected Failed, got {other:?}"),
    }
    assert_eq!(tracker.try_recv(), None);
}

#[test]
fn unauthorized_fetch_reports_token_invalidation() {
    let dir = tempdir().unwrap();
    let (events_tx, events_rx) = mpsc::channel();
    let tracker = TokenTracker::new();

    let service = DownloadService::spawn(
        Box::new(FailingSource {
            error: || FetchError::Unauthorized,
        }),
        dir.path().to_path_buf(),
        exts(),
        events_tx,
        tracker.notifier(),
    );

    let track = audio(1, 2, "Artist", "Song");
    service
        .send(DownloadCmd::Download(vec![DownloadRequest::from_audio(
            &track,
        )]))
        .unwrap();

    match events_rx.recv_timeout(Duration::from_secs(2)).unwrap() {
        DownloadEvent::Failed { key, .. } => assert_eq!(key, "1_2"),
        other => panic!("expected Failed, got {other:?}"),
    }
    // The worker runs on its own thread; the notification is already
    // queued once the Failed event arrived.
    assert_eq!(tracker.try_recv(), Some(TokenEvent::Invalidated));
}

#[test]
fn worker_remove_emits_removed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("3_4.mp3"), b"x").unwrap();

    let (events_tx, events_rx) = mpsc::channel();
    let tracker = TokenTracker::new();

    let service = DownloadService::spawn(
        Box::new(LocalSource { payload: b"" }),
        dir.path().to_path_buf(),
        exts(),
        events_tx,
        tracker.notifier(),
    );

    let track = audio(3, 4, "Artist", "Song");
    service
        .send(DownloadCmd::Remove(vec![DownloadRequest::from_audio(
            &track,
        )]))
        .unwrap();

    let ev = events_rx.recv_timeout(Duration::from_secs(2)).unwrap();
    assert_eq!(ev, DownloadEvent::Removed { key: "3_4".into() });
    assert!(!dir.path().join("3_4.mp3").exists());
}
