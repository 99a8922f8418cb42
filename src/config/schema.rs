use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/attacca/config.toml` or `~/.config/attacca/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `ATTACCA__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ui: UiSettings,
    pub playback: PlaybackSettings,
    pub catalog: CatalogSettings,
    pub cache: CacheSettings,
    pub downloads: DownloadSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ui: UiSettings::default(),
            playback: PlaybackSettings::default(),
            catalog: CatalogSettings::default(),
            cache: CacheSettings::default(),
            downloads: DownloadSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the cursor starts in "follow playback" mode.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ attacca: no pause between movements ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Default loop mode.
    pub loop_mode: LoopModeSetting,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            shuffle: false,
            loop_mode: LoopModeSetting::LoopAll,
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoopModeSetting {
    #[serde(alias = "no_loop", alias = "no-loop")]
    NoLoop,
    #[serde(alias = "loopall", alias = "loop_all", alias = "loop-around")]
    LoopAll,
    #[serde(alias = "loopone", alias = "loop_one", alias = "repeat-one")]
    LoopOne,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Path to the catalog snapshot file. When unset, the default
    /// `$XDG_DATA_HOME/attacca/catalog.json` location is used.
    pub snapshot_path: Option<String>,

    /// Separator used between artist and title in list lines.
    pub display_separator: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            display_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Cache directory. When unset, `$XDG_DATA_HOME/attacca/cache` is used.
    pub dir: Option<String>,

    /// File extensions recognized when scanning the cache for offline
    /// tracks (case-insensitive, without dot).
    pub extensions: Vec<String>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            dir: None,
            extensions: vec!["mp3".into(), "ogg".into()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadSettings {
    /// Per-request timeout for fetching a track (seconds).
    pub request_timeout_secs: u64,
}

impl Default for DownloadSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 120,
        }
    }
}
