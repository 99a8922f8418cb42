use std::path::PathBuf;
use std::sync::mpsc::{self, SendError, Sender};
use std::thread::JoinHandle;

use crate::session::TokenNotifier;

use super::fetch::AudioSource;
use super::worker::{DownloadCmd, DownloadEvent, spawn_download_worker};

/// Handle to the download worker. Commands are fire-and-forget; all
/// results come back as `DownloadEvent`s on the channel given at spawn.
pub struct DownloadService {
    tx: Sender<DownloadCmd>,
    join: Option<JoinHandle<()>>,
}

impl DownloadService {
    pub fn spawn(
        source: Box<dyn AudioSource>,
        cache_dir: PathBuf,
        extensions: Vec<String>,
        events: Sender<DownloadEvent>,
        notifier: TokenNotifier,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<DownloadCmd>();
        let join = spawn_download_worker(source, cache_dir, extensions, rx, events, notifier);

        Self {
            tx,
            join: Some(join),
        }
    }

    pub fn send(&self, cmd: DownloadCmd) -> Result<(), SendError<DownloadCmd>> {
        self.tx.send(cmd)
    }
}

impl Drop for DownloadService {
    fn drop(&mut self) {
        if let Some(join) = self.join.take() {
            let _ = self.tx.send(DownloadCmd::Quit);
            let _ = join.join();
        }
    }
}
