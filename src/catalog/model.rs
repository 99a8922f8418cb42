use std::path::PathBuf;
use std::time::Duration;

/// One playable track of the remote catalog.
#[derive(Clone, Debug)]
pub struct Audio {
    pub id: u64,
    pub owner_id: i64,
    pub artist: String,
    pub title: String,
    pub duration: Option<Duration>,
    /// Remote source of the audio data.
    pub url: String,
    /// Local copy of the audio data, present once the track is cached.
    pub cache_file: Option<PathBuf>,
    pub display: String,
}

impl Audio {
    /// Stable identity of the track, unique within the catalog.
    /// Doubles as the cache file stem and the download event key.
    pub fn key(&self) -> String {
        format!("{}_{}", self.owner_id, self.id)
    }

    /// Whether a local cached copy exists. Derived from `cache_file`
    /// so the cached flag and the file reference cannot disagree.
    pub fn is_cached(&self) -> bool {
        self.cache_file.is_some()
    }
}
