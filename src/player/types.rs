//! Playback-related small types and handles.

use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopMode {
    /// Do not wrap at the end of the current queue.
    NoLoop,
    /// Wrap around to the start of the current queue.
    LoopAll,
    /// Repeat the current track when it ends.
    LoopOne,
}

impl Default for LoopMode {
    fn default() -> Self {
        Self::LoopAll
    }
}

#[derive(Debug)]
pub enum PlayerCmd {
    /// Start playing the track at the given catalog index.
    Play(usize),
    /// Stop playback immediately.
    Stop,
    /// Toggle pause/resume.
    TogglePause,
    /// Reshuffle (or restore) the advance order of the queue.
    ToggleShuffle,
    /// Replace the queue with the provided catalog indices.
    SetQueue(Vec<usize>),
    /// Set the loop mode used when a track ends.
    SetLoopMode(LoopMode),
    /// Skip to the next track in the queue.
    Next,
    /// Go to the previous track in the queue.
    Prev,
    /// Shut the worker down.
    Quit,
}

/// Connection lifecycle of the service, as observed by the screen
/// controller. `Connected` arrives once the worker is up; the handle
/// is valid until `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    Connected,
    Disconnected,
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    /// Currently playing catalog index (if any).
    pub index: Option<usize>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Whether playback is currently active.
    pub playing: bool,
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            index: None,
            elapsed: Duration::ZERO,
            playing: false,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
