use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config::Settings;
use crate::downloads::{self, DownloadEvent, DownloadService, HttpSource};
use crate::player::{Binding, PlayerEvent, PlayerService};
use crate::remote::{ControlCmd, RemoteHandle, spawn_remote};
use crate::session::{self, Route, SessionStore, TokenTracker};

mod event_loop;
mod remote_sync;
mod settings;
mod startup;

/// Everything the event loop talks to: services, channels and the
/// session machinery. Built once in `run`, torn down once after it.
pub(crate) struct Wiring {
    pub settings: Settings,
    pub session_store: SessionStore,
    pub tracker: TokenTracker,
    pub binding: Binding,
    pub downloads: DownloadService,
    pub remote: RemoteHandle,
    pub control_tx: Sender<ControlCmd>,
    pub control_rx: Receiver<ControlCmd>,
    pub download_rx: Receiver<DownloadEvent>,
    pub player_rx: Receiver<PlayerEvent>,
    pub art_dir: PathBuf,
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let session_store = SessionStore::default_path()
        .map(SessionStore::at)
        .ok_or("cannot resolve a config directory (is HOME set?)")?;

    let cache_dir = downloads::resolve_cache_dir(&settings.cache)
        .ok_or("cannot resolve a cache directory (is HOME set?)")?;

    let mut app = App::new(startup::load_catalog(&settings, &cache_dir));
    app.follow_playback = settings.ui.follow_playback;
    match session::route(&session_store) {
        Route::Library(_) => app.enter_library(),
        Route::Login => app.enter_login(),
    }

    let tracker = TokenTracker::new();

    let (player_tx, player_rx) = mpsc::channel::<PlayerEvent>();
    let durations = app.tracks.iter().map(|t| t.duration).collect();
    let binding = PlayerService::bind(durations, player_tx);
    app.set_playback_handle(binding.playback_handle());

    let (download_tx, download_rx) = mpsc::channel::<DownloadEvent>();
    let source = HttpSource::new(Duration::from_secs(settings.downloads.request_timeout_secs))?;
    let downloads_service = DownloadService::spawn(
        Box::new(source),
        cache_dir.clone(),
        settings.cache.extensions.clone(),
        download_tx,
        tracker.notifier(),
    );

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let remote = spawn_remote(control_tx.clone());

    let wiring = Wiring {
        settings,
        session_store,
        tracker,
        binding,
        downloads: downloads_service,
        remote,
        control_tx,
        control_rx,
        download_rx,
        player_rx,
        art_dir: cache_dir.join("art"),
    };

    startup::apply_playback_defaults(&mut app, &wiring);
    remote_sync::update_remote(&wiring.remote, &app, &wiring.art_dir);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(&mut terminal, &mut app, &wiring, &mut state)
    })();

    // The exit path mirrors the enter path, also when the loop failed.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Release the service connections exactly once.
    let Wiring {
        binding, downloads, ..
    } = wiring;
    binding.unbind();
    drop(downloads);

    run_result
}
