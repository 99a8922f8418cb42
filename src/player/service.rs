use std::sync::mpsc::{self, SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use super::thread::spawn_player_thread;
use super::types::{PlaybackHandle, PlaybackInfo, PlayerCmd, PlayerEvent};

pub struct PlayerService;

impl PlayerService {
    /// Start the playback worker and return the connection handle.
    ///
    /// `durations` are the per-track lengths from catalog metadata,
    /// indexed like the catalog; they drive the playback clock and
    /// auto-advance. `PlayerEvent::Connected` is emitted on `events`
    /// once the worker runs.
    pub fn bind(
        durations: Vec<Option<std::time::Duration>>,
        events: Sender<PlayerEvent>,
    ) -> Binding {
        let (tx, rx) = mpsc::channel::<PlayerCmd>();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_player_thread(durations, rx, playback.clone(), events);

        Binding {
            tx,
            playback,
            join: Some(join),
        }
    }
}

/// A live connection to the playback service.
///
/// Valid between `Connected` and `Disconnected`. Release happens
/// exactly once: `unbind` consumes the binding, and dropping an
/// unreleased binding releases it as a fallback.
pub struct Binding {
    tx: Sender<PlayerCmd>,
    playback: PlaybackHandle,
    join: Option<JoinHandle<()>>,
}

impl Binding {
    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: PlayerCmd) -> Result<(), SendError<PlayerCmd>> {
        self.tx.send(cmd)
    }

    /// Disconnect from the service and wait for the worker to exit.
    pub fn unbind(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.tx.send(PlayerCmd::Quit);
            let _ = join.join();
        }
    }
}

impl Drop for Binding {
    fn drop(&mut self) {
        self.release();
    }
}
