use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;

use super::types::{LoopMode, PlaybackHandle, PlayerCmd, PlayerEvent};

/// How often the worker wakes up to advance the playback clock when no
/// command is pending.
const TICK: Duration = Duration::from_millis(200);

pub(super) fn spawn_player_thread(
    durations: Vec<Option<Duration>>,
    rx: Receiver<PlayerCmd>,
    playback: PlaybackHandle,
    events: Sender<PlayerEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let _ = events.send(PlayerEvent::Connected);

        let mut state = PlayerState::new(durations, playback);

        loop {
            match rx.recv_timeout(TICK) {
                Ok(PlayerCmd::Quit) => break,
                Ok(cmd) => state.handle(cmd),
                Err(RecvTimeoutError::Timeout) => state.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        state.halt();
        let _ = events.send(PlayerEvent::Disconnected);
    })
}

/// All state owned by the worker. The UI only ever sees the snapshot
/// published into the shared `PlaybackHandle`.
struct PlayerState {
    durations: Vec<Option<Duration>>,
    queue: Vec<usize>,
    queue_pos: usize,
    shuffle: bool,
    loop_mode: LoopMode,
    index: Option<usize>,
    playing: bool,
    started_at: Option<Instant>,
    accumulated: Duration,
    playback: PlaybackHandle,
}

impl PlayerState {
    fn new(durations: Vec<Option<Duration>>, playback: PlaybackHandle) -> Self {
        let queue: Vec<usize> = (0..durations.len()).collect();
        Self {
            durations,
            queue,
            queue_pos: 0,
            shuffle: false,
            loop_mode: LoopMode::default(),
            index: None,
            playing: false,
            started_at: None,
            accumulated: Duration::ZERO,
            playback,
        }
    }

    fn handle(&mut self, cmd: PlayerCmd) {
        match cmd {
            PlayerCmd::Play(i) => self.start(i),
            PlayerCmd::Stop => self.halt(),
            PlayerCmd::TogglePause => self.toggle_pause(),
            PlayerCmd::ToggleShuffle => self.toggle_shuffle(),
            PlayerCmd::SetQueue(q) => self.set_queue(q),
            PlayerCmd::SetLoopMode(m) => self.loop_mode = m,
            PlayerCmd::Next => self.step(1),
            PlayerCmd::Prev => self.step(-1),
            // Handled by the worker loop.
            PlayerCmd::Quit => {}
        }
    }

    fn start(&mut self, i: usize) {
        if i >= self.durations.len() {
            return;
        }

        match self.queue.iter().position(|&x| x == i) {
            Some(pos) => self.queue_pos = pos,
            None => {
                // Playing something outside the queue narrows the
                // queue to it, like a direct pick from a filtered list.
                self.queue = vec![i];
                self.queue_pos = 0;
            }
        }

        self.index = Some(i);
        self.playing = true;
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    fn halt(&mut self) {
        self.index = None;
        self.playing = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        self.publish();
    }

    fn toggle_pause(&mut self) {
        if self.index.is_none() {
            return;
        }

        if self.playing {
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.playing = false;
        } else {
            self.started_at = Some(Instant::now());
            self.playing = true;
        }
        self.publish();
    }

    fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        if self.shuffle {
            self.queue.shuffle(&mut rand::rng());
        } else {
            self.queue.sort_unstable();
        }
        self.resync_queue_pos();
    }

    fn set_queue(&mut self, mut queue: Vec<usize>) {
        queue.retain(|&i| i < self.durations.len());
        if self.shuffle {
            queue.shuffle(&mut rand::rng());
        }
        self.queue = queue;
        self.resync_queue_pos();
    }

    fn resync_queue_pos(&mut self) {
        self.queue_pos = self
            .index
            .and_then(|i| self.queue.iter().position(|&x| x == i))
            .unwrap_or(0);
    }

    /// Manual next/prev. Respects `LoopAll` wrap but never repeat-one.
    fn step(&mut self, dir: i32) {
        if self.queue.is_empty() {
            return;
        }

        let len = self.queue.len();
        let cur = if self.index.is_some() { self.queue_pos } else { 0 };

        let next = if dir > 0 {
            match (cur + 1 < len, self.loop_mode) {
                (true, _) => cur + 1,
                (false, LoopMode::LoopAll) => 0,
                (false, _) => return,
            }
        } else {
            match (cur > 0, self.loop_mode) {
                (true, _) => cur - 1,
                (false, LoopMode::LoopAll) => len - 1,
                (false, _) => return,
            }
        };

        self.start(self.queue[next]);
    }

    fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(st) if self.playing => self.accumulated + st.elapsed(),
            _ => self.accumulated,
        }
    }

    /// Periodic clock update and metadata-driven auto-advance. Tracks
    /// without a known duration never auto-advance.
    fn tick(&mut self) {
        if !self.playing {
            return;
        }

        self.publish();

        let Some(i) = self.index else { return };
        let Some(Some(total)) = self.durations.get(i).copied() else {
            return;
        };
        if self.elapsed() < total {
            return;
        }

        match self.loop_mode {
            LoopMode::LoopOne => self.start(i),
            LoopMode::LoopAll => {
                if self.queue.is_empty() {
                    self.halt();
                } else {
                    let next = (self.queue_pos + 1) % self.queue.len();
                    self.start(self.queue[next]);
                }
            }
            LoopMode::NoLoop => {
                if self.queue_pos + 1 < self.queue.len() {
                    let next = self.queue_pos + 1;
                    self.start(self.queue[next]);
                } else {
                    self.halt();
                }
            }
        }
    }

    fn publish(&self) {
        if let Ok(mut info) = self.playback.lock() {
            info.index = self.index;
            info.elapsed = self.elapsed();
            info.playing = self.playing;
        }
    }
}
