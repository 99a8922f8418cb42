use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, CacheAction, PlaybackState, Screen};
use crate::downloads::{DownloadCmd, DownloadRequest};
use crate::player::{PlayerCmd, PlayerEvent};
use crate::remote::ControlCmd;
use crate::session::{Session, TokenEvent};
use crate::ui;

use super::{Wiring, remote_sync};

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Last playing index as published to the remote surface.
    pub last_remote_index: Option<usize>,
    /// Last playback state as published to the remote surface.
    pub last_remote_playback: PlaybackState,
}

impl EventLoopState {
    pub fn new(app: &App) -> Self {
        Self {
            last_remote_index: None,
            last_remote_playback: app.playback,
        }
    }
}

/// Main terminal event loop: drains service events into the model,
/// keeps the playback service and remote surface in sync, draws, and
/// dispatches input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    wiring: &Wiring,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        // Session lifecycle first: it can change the active screen.
        while let Some(ev) = wiring.tracker.try_recv() {
            match ev {
                TokenEvent::Invalidated => {
                    let _ = wiring.session_store.clear();
                    app.enter_login();
                    app.status_message = Some("Session expired, sign in again".to_string());
                }
                TokenEvent::Confirmed => {
                    if app.screen == Screen::Login {
                        app.enter_library();
                    }
                }
            }
        }

        while let Ok(ev) = wiring.player_rx.try_recv() {
            match ev {
                PlayerEvent::Connected => app.player_connected = true,
                PlayerEvent::Disconnected => {
                    app.player_connected = false;
                    app.playback = PlaybackState::Stopped;
                    app.status_message = Some("Playback service disconnected".to_string());
                }
            }
        }

        // Download results mutate menu and tracks on this thread only.
        while let Ok(ev) = wiring.download_rx.try_recv() {
            app.on_download_event(ev);
        }

        // Keep the playback service's queue in sync with the visible list.
        if app.queue_dirty {
            let _ = wiring
                .binding
                .send(PlayerCmd::SetQueue(app.display_indices()));
            app.clear_queue_dirty();
        }

        // Sync the playback snapshot; optionally follow now-playing.
        let mut playing_snapshot: Option<usize> = None;
        if let Some(handle) = app.playback_handle.as_ref().cloned() {
            if let Ok(info) = handle.lock() {
                let index = info.index;
                let is_playing = info.playing;
                drop(info);

                playing_snapshot = index;
                if let Some(idx) = index {
                    if app.follow_playback && !app.filter_mode && app.selected != idx {
                        app.set_selected(idx);
                    }
                }
                app.playback = match (index, is_playing) {
                    (None, _) => PlaybackState::Stopped,
                    (Some(_), true) => PlaybackState::Playing,
                    (Some(_), false) => PlaybackState::Paused,
                };
            }
        }

        // Republish remote metadata when track or state changed, also
        // for changes that came from auto-advance or media keys.
        if playing_snapshot != state.last_remote_index
            || app.playback != state.last_remote_playback
        {
            remote_sync::update_remote(&wiring.remote, app, &wiring.art_dir);
            state.last_remote_index = playing_snapshot;
            state.last_remote_playback = app.playback;
        }

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &wiring.settings.ui))?;

        while let Ok(cmd) = wiring.control_rx.try_recv() {
            if handle_control_cmd(cmd, app, wiring) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, wiring) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Transport commands from the remote surface (and forwarded keys).
/// Returns true when shutdown was requested.
fn handle_control_cmd(cmd: ControlCmd, app: &mut App, wiring: &Wiring) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => match app.playback {
            PlaybackState::Paused => {
                follow_again(app);
                let _ = wiring.binding.send(PlayerCmd::TogglePause);
                app.playback = PlaybackState::Playing;
            }
            PlaybackState::Stopped | PlaybackState::Playing => {
                if app.has_tracks() {
                    follow_again(app);
                    let _ = wiring.binding.send(PlayerCmd::Play(app.selected));
                    app.playback = PlaybackState::Playing;
                }
            }
        },
        ControlCmd::Pause => {
            if app.playback == PlaybackState::Playing {
                let _ = wiring.binding.send(PlayerCmd::TogglePause);
                app.playback = PlaybackState::Paused;
            }
        }
        ControlCmd::PlayPause => {
            follow_again(app);
            match app.playback {
                PlaybackState::Stopped => {
                    if app.has_tracks() {
                        let _ = wiring.binding.send(PlayerCmd::Play(app.selected));
                        app.playback = PlaybackState::Playing;
                    }
                }
                PlaybackState::Playing => {
                    let _ = wiring.binding.send(PlayerCmd::TogglePause);
                    app.playback = PlaybackState::Paused;
                }
                PlaybackState::Paused => {
                    let _ = wiring.binding.send(PlayerCmd::TogglePause);
                    app.playback = PlaybackState::Playing;
                }
            }
        }
        ControlCmd::Stop => {
            let _ = wiring.binding.send(PlayerCmd::Stop);
            app.playback = PlaybackState::Stopped;
        }
        ControlCmd::Next => {
            if app.has_tracks() {
                follow_again(app);
                let _ = wiring.binding.send(PlayerCmd::Next);
                app.playback = PlaybackState::Playing;
            }
        }
        ControlCmd::Prev => {
            if app.has_tracks() {
                follow_again(app);
                let _ = wiring.binding.send(PlayerCmd::Prev);
                app.playback = PlaybackState::Playing;
            }
        }
    }

    false
}

fn follow_again(app: &mut App) {
    if !app.filter_mode {
        app.follow_playback = true;
    }
}

/// Returns true when the app should quit.
fn handle_key_event(key: KeyEvent, app: &mut App, wiring: &Wiring) -> bool {
    match app.screen {
        Screen::Login => handle_login_key(key, app, wiring),
        Screen::Library => handle_library_key(key, app, wiring),
    }
}

fn handle_login_key(key: KeyEvent, app: &mut App, wiring: &Wiring) -> bool {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return true,
        KeyCode::Enter => submit_login(app, wiring),
        KeyCode::Backspace => app.pop_token_char(),
        KeyCode::Esc => app.token_input.clear(),
        KeyCode::Char(c) => {
            if !c.is_control() {
                app.push_token_char(c);
            }
        }
        _ => {}
    }

    false
}

fn submit_login(app: &mut App, wiring: &Wiring) {
    let token = app.token_input.trim().to_string();
    if token.is_empty() {
        app.status_message = Some("Token must not be empty".to_string());
        return;
    }

    let session = Session {
        token,
        user_id: None,
    };
    match wiring.session_store.save(&session) {
        Ok(()) => {
            app.enter_library();
        }
        Err(e) => {
            app.status_message = Some(format!("Could not store session: {e}"));
        }
    }
}

fn handle_library_key(key: KeyEvent, app: &mut App, wiring: &Wiring) -> bool {
    if app.filter_mode {
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Down => {
                app.follow_playback = false;
                app.next();
            }
            KeyCode::Up => {
                app.follow_playback = false;
                app.prev();
            }
            KeyCode::Enter => {
                if !app.display_indices().is_empty() {
                    app.exit_filter_mode();
                    app.follow_playback = true;
                    let _ = wiring.binding.send(PlayerCmd::Play(app.selected));
                    app.playback = PlaybackState::Playing;
                }
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            _ => {}
        }

        return false;
    }

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('Q') => {
            match wiring.session_store.clear() {
                Ok(()) => {
                    app.enter_login();
                    app.status_message = Some("Signed out".to_string());
                }
                Err(e) => {
                    app.status_message = Some(format!("Could not sign out: {e}"));
                }
            }
        }
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Char('s') => {
            app.toggle_shuffle();
            let _ = wiring.binding.send(PlayerCmd::ToggleShuffle);
        }
        KeyCode::Char('r') => {
            app.cycle_loop_mode();
            let _ = wiring.binding.send(PlayerCmd::SetLoopMode(app.loop_mode));
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback = false;
            app.prev();
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                app.follow_playback = true;
                let _ = wiring.binding.send(PlayerCmd::Play(app.selected));
                app.playback = PlaybackState::Playing;
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            let _ = wiring.control_tx.send(ControlCmd::PlayPause);
        }
        KeyCode::Char('l') => {
            let _ = wiring.control_tx.send(ControlCmd::Next);
        }
        KeyCode::Char('h') => {
            let _ = wiring.control_tx.send(ControlCmd::Prev);
        }
        KeyCode::Char('m') => {
            // The panel closes the way it opened.
            if app.now_playing_open() {
                app.close_now_playing();
            } else {
                app.open_now_playing();
            }
        }
        KeyCode::Esc => {
            if app.now_playing_open() {
                app.close_now_playing();
            }
        }
        KeyCode::Char('c') => dispatch_cache_action(app, wiring),
        _ => {}
    }

    false
}

/// Fire the currently visible cache action for the playing track.
fn dispatch_cache_action(app: &mut App, wiring: &Wiring) {
    let Some(action) = app.cache_action() else {
        return;
    };
    let Some(request) = app.playing_track().map(DownloadRequest::from_audio) else {
        return;
    };
    let display = request.display.clone();

    match action {
        CacheAction::Download => {
            let _ = wiring
                .downloads
                .send(DownloadCmd::Download(vec![request]));
            app.status_message = Some(format!("Caching: {display}"));
        }
        CacheAction::Remove => {
            // The menu only flips on the Removed event; a missing
            // callback leaves the cached state as unknown.
            let _ = wiring.downloads.send(DownloadCmd::Remove(vec![request]));
            app.status_message = Some(format!("Removing from cache: {display}"));
        }
    }
}
