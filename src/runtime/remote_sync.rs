use std::fs;
use std::path::Path;

use crate::app::App;
use crate::catalog::Audio;
use crate::cover::{self, CoverArt};
use crate::remote::RemoteHandle;

/// Publish the current playback snapshot to the remote-control surface.
pub fn update_remote(remote: &RemoteHandle, app: &App, art_dir: &Path) {
    let index = app.playing_index();
    let track = index.and_then(|i| app.tracks.get(i));
    let art_url = track.and_then(|t| placeholder_art_url(t, art_dir));

    remote.set_track_metadata(index, track, art_url);
    remote.set_playback(app.playback);
}

/// Export the placeholder badge once per track and hand back its URL.
/// Art is cosmetic; any failure just drops the URL from the metadata.
fn placeholder_art_url(track: &Audio, art_dir: &Path) -> Option<String> {
    let path = art_dir.join(format!("{}.png", track.key()));

    if !path.is_file() {
        let badge = cover::badge_from_audio(track).ok()?;
        fs::create_dir_all(art_dir).ok()?;
        CoverArt::Badge(badge).export_png(&path).ok()?;
    }

    Some(format!("file://{}", path.display()))
}
