use crate::catalog::Audio;
use crate::downloads::DownloadEvent;
use crate::player::{LoopMode, PlaybackHandle};

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Which screen owns input right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    Login,
    Library,
}

/// The two mutually exclusive now-playing actions. Once the menu
/// exists, exactly one of them is visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ActionMenu {
    pub cache_visible: bool,
    pub remove_visible: bool,
}

impl Default for ActionMenu {
    fn default() -> Self {
        // A fresh menu assumes un-cached until told otherwise.
        Self {
            cache_visible: true,
            remove_visible: false,
        }
    }
}

/// What pressing the cache-action key should do right now.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CacheAction {
    Download,
    Remove,
}

/// The main application model.
pub struct App {
    pub screen: Screen,
    pub tracks: Vec<Audio>,
    pub selected: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    /// The now-playing action menu; `Some` only while the panel is open.
    pub menu: Option<ActionMenu>,

    pub follow_playback: bool,
    pub loop_mode: LoopMode,
    pub shuffle: bool,
    pub queue_dirty: bool,

    pub filter_mode: bool,
    pub filter_query: String,

    /// Transient message rendered in the status line.
    pub status_message: Option<String>,

    /// Token being typed on the login screen.
    pub token_input: String,

    pub player_connected: bool,
}

impl App {
    /// Create a new `App` showing the provided catalog.
    pub fn new(tracks: Vec<Audio>) -> Self {
        Self {
            screen: Screen::Library,
            tracks,
            selected: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            menu: None,
            follow_playback: true,
            loop_mode: LoopMode::LoopAll,
            shuffle: false,
            queue_dirty: true,
            filter_mode: false,
            filter_query: String::new(),
            status_message: None,
            token_input: String::new(),
            player_connected: false,
        }
    }

    /// Attach the `PlaybackHandle` used to observe the playback service.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Catalog index of the currently playing track, if any.
    pub fn playing_index(&self) -> Option<usize> {
        let handle = self.playback_handle.as_ref()?;
        handle.lock().ok().and_then(|info| info.index)
    }

    pub fn playing_track(&self) -> Option<&Audio> {
        self.playing_index().and_then(|i| self.tracks.get(i))
    }

    /// Open the now-playing panel: creates the action menu and, when a
    /// track is playing, initializes it from that track's cached state.
    pub fn open_now_playing(&mut self) {
        self.menu = Some(ActionMenu::default());
        if let Some(cached) = self.playing_track().map(Audio::is_cached) {
            self.set_cache_action(cached);
        }
    }

    /// Close the panel; the menu ceases to exist with it.
    pub fn close_now_playing(&mut self) {
        self.menu = None;
    }

    pub fn now_playing_open(&self) -> bool {
        self.menu.is_some()
    }

    /// Show exactly one of the two cache actions. Idempotent, and a
    /// no-op until the menu has been created.
    pub fn set_cache_action(&mut self, is_cached: bool) {
        if let Some(menu) = &mut self.menu {
            menu.remove_visible = is_cached;
            menu.cache_visible = !is_cached;
        }
    }

    /// The action the visible menu entry stands for, if a menu exists.
    pub fn cache_action(&self) -> Option<CacheAction> {
        self.menu.map(|m| {
            if m.remove_visible {
                CacheAction::Remove
            } else {
                CacheAction::Download
            }
        })
    }

    /// Fold one download-service result into the model. Runs on the
    /// event-loop thread, so the menu flip and the cache-file update
    /// are one step as far as the renderer is concerned.
    pub fn on_download_event(&mut self, event: DownloadEvent) {
        let playing_key = self.playing_track().map(Audio::key);

        match event {
            DownloadEvent::Finished { key, cache_file } => {
                let mut display = None;
                if let Some(track) = self.track_by_key_mut(&key) {
                    track.cache_file = Some(cache_file);
                    display = Some(track.display.clone());
                }
                if let Some(display) = display {
                    self.status_message = Some(format!("Saved offline: {display}"));
                }
                if playing_key.as_deref() == Some(key.as_str()) {
                    self.set_cache_action(true);
                }
            }
            DownloadEvent::Removed { key } => {
                let mut display = None;
                if let Some(track) = self.track_by_key_mut(&key) {
                    track.cache_file = None;
                    display = Some(track.display.clone());
                }
                if let Some(display) = display {
                    self.status_message = Some(format!("Removed from cache: {display}"));
                }
                if playing_key.as_deref() == Some(key.as_str()) {
                    self.set_cache_action(false);
                }
            }
            DownloadEvent::Failed { key, reason } => {
                // Cache state is unknown here; leave the menu alone
                // and offer a retry instead.
                let display = self
                    .track_by_key(&key)
                    .map(|t| t.display.clone())
                    .unwrap_or(key);
                self.status_message =
                    Some(format!("{display}: {reason} (press c to retry)"));
            }
        }
    }

    fn track_by_key(&self, key: &str) -> Option<&Audio> {
        self.tracks.iter().find(|t| t.key() == key)
    }

    fn track_by_key_mut(&mut self, key: &str) -> Option<&mut Audio> {
        self.tracks.iter_mut().find(|t| t.key() == key)
    }

    /// Return the display order of catalog indices under the current
    /// filter. Shuffle only changes advance order inside the player;
    /// the list keeps the catalog order.
    pub fn display_indices(&self) -> Vec<usize> {
        let query = self.filter_query.trim().to_lowercase();
        (0..self.tracks.len())
            .filter(|&i| {
                query.is_empty() || self.tracks[i].display.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Set the selected track index and ensure it is visible.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx;
        self.ensure_selected_visible();
    }

    fn ensure_selected_visible(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            self.selected = 0;
            return;
        }
        if !display.contains(&self.selected) {
            self.selected = display[0];
        }
    }

    /// Move selection to the next visible track, wrapping around.
    pub fn next(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let pos = display.iter().position(|&i| i == self.selected);
        self.selected = match pos {
            Some(p) => display[(p + 1) % display.len()],
            None => display[0],
        };
    }

    /// Move selection to the previous visible track, wrapping around.
    pub fn prev(&mut self) {
        let display = self.display_indices();
        if display.is_empty() {
            return;
        }
        let pos = display.iter().position(|&i| i == self.selected);
        self.selected = match pos {
            Some(0) | None => display[display.len() - 1],
            Some(p) => display[p - 1],
        };
    }

    pub fn mark_queue_dirty(&mut self) {
        self.queue_dirty = true;
    }

    pub fn clear_queue_dirty(&mut self) {
        self.queue_dirty = false;
    }

    /// Cycle `loop_mode` through `NoLoop -> LoopAll -> LoopOne`.
    pub fn cycle_loop_mode(&mut self) {
        self.loop_mode = match self.loop_mode {
            LoopMode::NoLoop => LoopMode::LoopAll,
            LoopMode::LoopAll => LoopMode::LoopOne,
            LoopMode::LoopOne => LoopMode::NoLoop,
        };
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
        self.follow_playback = false;
        self.mark_queue_dirty();
        self.ensure_selected_visible();
    }

    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
        self.mark_queue_dirty();
    }

    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.mark_queue_dirty();
        self.ensure_selected_visible();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.mark_queue_dirty();
        self.ensure_selected_visible();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.mark_queue_dirty();
        self.ensure_selected_visible();
    }

    pub fn push_token_char(&mut self, c: char) {
        self.token_input.push(c);
    }

    pub fn pop_token_char(&mut self) {
        self.token_input.pop();
    }

    /// Leave the login screen for the library, dropping the typed
    /// token from memory.
    pub fn enter_library(&mut self) {
        self.screen = Screen::Library;
        self.token_input.clear();
        self.status_message = None;
    }

    /// Return to the login screen, closing the now-playing panel.
    pub fn enter_login(&mut self) {
        self.screen = Screen::Login;
        self.close_now_playing();
        self.token_input.clear();
    }
}
