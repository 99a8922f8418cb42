use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::session::TokenNotifier;

use super::cache::{cache_path, find_cached, remove_cached};
use super::fetch::{AudioSource, DownloadRequest, FetchError};

#[derive(Debug)]
pub enum DownloadCmd {
    /// Fetch every listed track into the cache, in order.
    Download(Vec<DownloadRequest>),
    /// Delete the cached copies of the listed tracks.
    Remove(Vec<DownloadRequest>),
    /// Shut the worker down.
    Quit,
}

/// Results delivered back to the screen controller's thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadEvent {
    Finished { key: String, cache_file: PathBuf },
    Removed { key: String },
    Failed { key: String, reason: String },
}

pub(super) fn spawn_download_worker(
    source: Box<dyn AudioSource>,
    cache_dir: PathBuf,
    extensions: Vec<String>,
    rx: Receiver<DownloadCmd>,
    events: Sender<DownloadEvent>,
    notifier: TokenNotifier,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = rx.recv() {
            match cmd {
                DownloadCmd::Download(requests) => {
                    for request in requests {
                        download_one(
                            source.as_ref(),
                            &cache_dir,
                            &extensions,
                            &request,
                            &events,
                            &notifier,
                        );
                    }
                }
                DownloadCmd::Remove(requests) => {
                    for request in requests {
                        match remove_cached(&cache_dir, &request.key, &extensions) {
                            Ok(_) => {
                                let _ = events.send(DownloadEvent::Removed {
                                    key: request.key,
                                });
                            }
                            Err(e) => {
                                let _ = events.send(DownloadEvent::Failed {
                                    key: request.key,
                                    reason: e.to_string(),
                                });
                            }
                        }
                    }
                }
                DownloadCmd::Quit => break,
            }
        }
    })
}

fn download_one(
    source: &dyn AudioSource,
    cache_dir: &std::path::Path,
    extensions: &[String],
    request: &DownloadRequest,
    events: &Sender<DownloadEvent>,
    notifier: &TokenNotifier,
) {
    // Already cached: report the existing copy instead of refetching.
    if let Some(existing) = find_cached(cache_dir, &request.key, extensions) {
        let _ = events.send(DownloadEvent::Finished {
            key: request.key.clone(),
            cache_file: existing,
        });
        return;
    }

    if let Err(e) = std::fs::create_dir_all(cache_dir) {
        let _ = events.send(DownloadEvent::Failed {
            key: request.key.clone(),
            reason: e.to_string(),
        });
        return;
    }

    let dest = cache_path(cache_dir, &request.key);
    match source.fetch(request, &dest) {
        Ok(_) => {
            let _ = events.send(DownloadEvent::Finished {
                key: request.key.clone(),
                cache_file: dest,
            });
        }
        Err(e) => {
            if matches!(e, FetchError::Unauthorized) {
                notifier.report_invalidated();
            }
            let _ = events.send(DownloadEvent::Failed {
                key: request.key.clone(),
                reason: e.to_string(),
            });
        }
    }
}
