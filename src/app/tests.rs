use super::*;
use crate::catalog::{Audio, compose_display};
use crate::downloads::DownloadEvent;
use crate::player::{PlaybackHandle, PlaybackInfo};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

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

fn app_with_tracks() -> App {
    App::new(vec![
        audio(1, 1, "Alpha", "First"),
        audio(1, 2, "Beta", "Second"),
        audio(1, 3, "Gamma", "Third"),
    ])
}

fn playing(app: &mut App, index: usize) -> PlaybackHandle {
    let handle: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo {
        index: Some(index),
        elapsed: std::time::Duration::ZERO,
        playing: true,
    }));
    app.set_playback_handle(handle.clone());
    handle
}

#[test]
fn set_cache_action_before_menu_creation_is_a_noop() {
    let mut app = app_with_tracks();
    assert!(app.menu.is_none());

    app.set_cache_action(true);
    app.set_cache_action(false);
    assert!(app.menu.is_none());
    assert_eq!(app.cache_action(), None);
}

#[test]
fn set_cache_action_shows_exactly_one_action() {
    let mut app = app_with_tracks();
    app.open_now_playing();

    for cached in [true, false, true] {
        app.set_cache_action(cached);
        let menu = app.menu.unwrap();
        assert_eq!(menu.remove_visible, cached);
        assert_eq!(menu.cache_visible, !cached);
        assert_ne!(menu.cache_visible, menu.remove_visible);
    }
}

#[test]
fn set_cache_action_is_idempotent() {
    let mut app = app_with_tracks();
    app.open_now_playing();

    app.set_cache_action(true);
    let first = app.menu.unwrap();
    app.set_cache_action(true);
    assert_eq!(app.menu.unwrap(), first);
}

#[test]
fn menu_created_while_cached_track_plays_shows_remove() {
    let mut app = app_with_tracks();
    app.tracks[1].cache_file = Some(PathBuf::from("/tmp/1_2.mp3"));
    playing(&mut app, 1);

    app.open_now_playing();
    let menu = app.menu.unwrap();
    assert!(menu.remove_visible);
    assert!(!menu.cache_visible);
}

#[test]
fn menu_created_while_uncached_track_plays_shows_cache() {
    let mut app = app_with_tracks();
    playing(&mut app, 0);

    app.open_now_playing();
    let menu = app.menu.unwrap();
    assert!(menu.cache_visible);
    assert!(!menu.remove_visible);
}

#[test]
fn menu_created_with_nothing_playing_defaults_to_cache() {
    let mut app = app_with_tracks();
    app.open_now_playing();

    let menu = app.menu.unwrap();
    assert!(menu.cache_visible);
    assert!(!menu.remove_visible);
}

#[test]
fn remove_success_event_flips_menu_to_cache() {
    let mut app = app_with_tracks();
    app.tracks[1].cache_file = Some(PathBuf::from("/tmp/1_2.mp3"));
    playing(&mut app, 1);
    app.open_now_playing();
    assert_eq!(app.cache_action(), Some(CacheAction::Remove));

    app.on_download_event(DownloadEvent::Removed { key: "1_2".into() });

    assert_eq!(app.cache_action(), Some(CacheAction::Download));
    assert!(!app.tracks[1].is_cached());
}

#[test]
fn download_finished_for_playing_track_updates_menu_and_track() {
    let mut app = app_with_tracks();
    playing(&mut app, 1);
    app.open_now_playing();
    assert_eq!(app.cache_action(), Some(CacheAction::Download));

    app.on_download_event(DownloadEvent::Finished {
        key: "1_2".into(),
        cache_file: PathBuf::from("/tmp/1_2.mp3"),
    });

    assert_eq!(app.cache_action(), Some(CacheAction::Remove));
    assert_eq!(app.tracks[1].cache_file, Some(PathBuf::from("/tmp/1_2.mp3")));
}

#[test]
fn download_finished_for_another_track_leaves_menu_alone() {
    let mut app = app_with_tracks();
    playing(&mut app, 0);
    app.open_now_playing();
    assert_eq!(app.cache_action(), Some(CacheAction::Download));

    app.on_download_event(DownloadEvent::Finished {
        key: "1_3".into(),
        cache_file: PathBuf::from("/tmp/1_3.mp3"),
    });

    // The other track still gets its file attached.
    assert_eq!(app.cache_action(), Some(CacheAction::Download));
    assert!(app.tracks[2].is_cached());
}

#[test]
fn failed_event_keeps_menu_state_and_sets_status() {
    let mut app = app_with_tracks();
    app.tracks[1].cache_file = Some(PathBuf::from("/tmp/1_2.mp3"));
    playing(&mut app, 1);
    app.open_now_playing();

    app.on_download_event(DownloadEvent::Failed {
        key: "1_2".into(),
        reason: "connection reset".into(),
    });

    // State unknown: do not assume removed.
    assert_eq!(app.cache_action(), Some(CacheAction::Remove));
    let status = app.status_message.as_deref().unwrap();
    assert!(status.contains("connection reset"));
    assert!(status.contains("retry"));
}

#[test]
fn closing_the_panel_destroys_the_menu() {
    let mut app = app_with_tracks();
    app.open_now_playing();
    assert!(app.now_playing_open());

    app.close_now_playing();
    assert!(!app.now_playing_open());
    assert_eq!(app.cache_action(), None);
}

#[test]
fn display_indices_filter_by_case_insensitive_substring() {
    let mut app = app_with_tracks();
    assert_eq!(app.display_indices(), vec![0, 1, 2]);

    app.filter_query = "beta".into();
    assert_eq!(app.display_indices(), vec![1]);

    app.filter_query = "NOPE".into();
    assert!(app.display_indices().is_empty());
}

#[test]
fn selection_wraps_within_the_filtered_view() {
    let mut app = app_with_tracks();
    app.filter_query = "a - ".into(); // matches all three displays

    app.set_selected(2);
    app.next();
    assert_eq!(app.selected, 0);
    app.prev();
    assert_eq!(app.selected, 2);
}

#[test]
fn filter_edits_mark_the_queue_dirty() {
    let mut app = app_with_tracks();
    assert!(app.queue_dirty);
    app.clear_queue_dirty();

    app.push_filter_char('x');
    assert!(app.queue_dirty);
    app.clear_queue_dirty();

    app.pop_filter_char();
    assert!(app.queue_dirty);
}

#[test]
fn cycle_loop_mode_cycles_three_states() {
    let mut app = app_with_tracks();
    assert_eq!(app.loop_mode, crate::player::LoopMode::LoopAll);

    app.cycle_loop_mode();
    assert_eq!(app.loop_mode, crate::player::LoopMode::LoopOne);
    app.cycle_loop_mode();
    assert_eq!(app.loop_mode, crate::player::LoopMode::NoLoop);
    app.cycle_loop_mode();
    assert_eq!(app.loop_mode, crate::player::LoopMode::LoopAll);
}

#[test]
fn entering_login_closes_the_panel_and_clears_the_token() {
    let mut app = app_with_tracks();
    app.open_now_playing();
    app.push_token_char('x');

    app.enter_login();
    assert_eq!(app.screen, Screen::Login);
    assert!(!app.now_playing_open());
    assert!(app.token_input.is_empty());

    app.push_token_char('t');
    app.push_token_char('k');
    app.enter_library();
    assert_eq!(app.screen, Screen::Library);
    assert!(app.token_input.is_empty());
}
