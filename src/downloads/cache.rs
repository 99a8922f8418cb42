use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{AudioFile, ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::catalog::{Audio, compose_display};
use crate::config::{CacheSettings, data_home};

/// `$XDG_DATA_HOME/attacca/cache` or `~/.local/share/attacca/cache`.
pub fn default_cache_dir() -> Option<PathBuf> {
    data_home().map(|d| d.join("attacca").join("cache"))
}

/// Resolve the cache dir from settings, falling back to the XDG default.
pub fn resolve_cache_dir(settings: &CacheSettings) -> Option<PathBuf> {
    settings
        .dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(default_cache_dir)
}

/// Where a freshly downloaded track lands. The platform serves mp3;
/// the key keeps cache names collision-free without an index file.
pub fn cache_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.mp3"))
}

/// Find an existing cached copy for `key` under any recognized
/// extension (the download worker writes mp3, but files placed in the
/// cache by other means still count).
pub fn find_cached(dir: &Path, key: &str, extensions: &[String]) -> Option<PathBuf> {
    for ext in normalized(extensions) {
        let candidate = dir.join(format!("{key}.{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Reconcile the in-memory catalog with the cache directory: every
/// track with a file on disk gets its `cache_file` attached.
pub fn attach_cached(tracks: &mut [Audio], dir: &Path, extensions: &[String]) {
    for track in tracks.iter_mut() {
        if let Some(path) = find_cached(dir, &track.key(), extensions) {
            track.cache_file = Some(path);
        }
    }
}

/// Delete the cached copy for `key`. Returns whether a file was
/// actually removed; removing an uncached track is not an error.
pub fn remove_cached(dir: &Path, key: &str, extensions: &[String]) -> io::Result<bool> {
    match find_cached(dir, key, extensions) {
        Some(path) => {
            std::fs::remove_file(path)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn normalized(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn is_cached_audio_file(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            normalized(extensions).iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

/// Parse the `{owner_id}_{id}` cache file stem back into identity.
fn parse_key(stem: &str) -> Option<(i64, u64)> {
    let (owner, id) = stem.rsplit_once('_')?;
    Some((owner.parse().ok()?, id.parse().ok()?))
}

/// Build a library from the cache directory alone, for running
/// without a catalog snapshot. Foreign file names are skipped; track
/// metadata comes from the files' tags where present.
pub fn offline_library(dir: &Path, settings: &CacheSettings, display_sep: &str) -> Vec<Audio> {
    let mut tracks: Vec<Audio> = Vec::new();

    for entry in WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() || !is_cached_audio_file(path, &settings.extensions) {
            continue;
        }

        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some((owner_id, id)) = parse_key(stem) else {
            continue;
        };

        let mut title = stem.to_string();
        let mut artist = String::new();
        let mut duration: Option<Duration> = None;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = Some(tagged.properties().duration());

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = v.to_string();
                    }
                }
            }
        }

        let display = compose_display(&artist, &title, display_sep);

        tracks.push(Audio {
            id,
            owner_id,
            artist,
            title,
            duration,
            url: String::new(),
            cache_file: Some(path.to_path_buf()),
            display,
        });
    }

    tracks.sort_by(|a, b| a.display.to_lowercase().cmp(&b.display.to_lowercase()));
    tracks
}
