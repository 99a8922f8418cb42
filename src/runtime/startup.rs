use std::path::{Path, PathBuf};

use crate::app::App;
use crate::catalog::{self, Audio};
use crate::config::{self, Settings, data_home};
use crate::downloads::{attach_cached, offline_library};
use crate::player::{LoopMode, PlayerCmd};

use super::Wiring;

/// Load the catalog snapshot and reconcile it with the cache dir.
/// Without a usable snapshot, whatever is cached is still playable.
pub fn load_catalog(settings: &Settings, cache_dir: &Path) -> Vec<Audio> {
    let snapshot_path = settings
        .catalog
        .snapshot_path
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| data_home().map(|d| d.join("attacca").join("catalog.json")));

    if let Some(path) = snapshot_path {
        if path.is_file() {
            match catalog::load_snapshot(&path, &settings.catalog) {
                Ok(mut tracks) => {
                    attach_cached(&mut tracks, cache_dir, &settings.cache.extensions);
                    return tracks;
                }
                Err(e) => {
                    eprintln!("attacca: unreadable catalog snapshot, going offline: {e}");
                }
            }
        }
    }

    offline_library(
        cache_dir,
        &settings.cache,
        &settings.catalog.display_separator,
    )
}

/// Push the configured playback defaults into the model and the
/// freshly bound playback service.
pub fn apply_playback_defaults(app: &mut App, wiring: &Wiring) {
    app.shuffle = wiring.settings.playback.shuffle;
    app.loop_mode = match wiring.settings.playback.loop_mode {
        config::LoopModeSetting::NoLoop => LoopMode::NoLoop,
        config::LoopModeSetting::LoopAll => LoopMode::LoopAll,
        config::LoopModeSetting::LoopOne => LoopMode::LoopOne,
    };

    if app.shuffle {
        let _ = wiring.binding.send(PlayerCmd::ToggleShuffle);
    }
    let _ = wiring.binding.send(PlayerCmd::SetLoopMode(app.loop_mode));
    let _ = wiring.binding.send(PlayerCmd::SetQueue(app.display_indices()));
    app.clear_queue_dirty();
}
