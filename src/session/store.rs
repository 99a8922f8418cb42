use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::config_home;

/// Credentials proving an authenticated user session with the platform.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    /// Account id when the platform reported one; a freshly pasted
    /// token arrives without it.
    #[serde(default)]
    pub user_id: Option<i64>,
}

impl Session {
    /// A session is usable only with a non-blank token.
    pub fn is_valid(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

/// Where to go after inspecting the stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Library(Session),
}

/// On-disk session persistence (`session.toml` under the config dir).
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// `$XDG_CONFIG_HOME/attacca/session.toml` or `~/.config/attacca/session.toml`.
    pub fn default_path() -> Option<PathBuf> {
        config_home().map(|d| d.join("attacca").join("session.toml"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Read the stored session. A missing, unreadable or malformed
    /// file all mean "not logged in".
    pub fn load(&self) -> Option<Session> {
        let text = fs::read_to_string(&self.path).ok()?;
        toml::from_str::<Session>(&text).ok().filter(Session::is_valid)
    }

    pub fn save(&self, session: &Session) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string(session)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }

    /// Forget the stored session. Clearing an already-absent session
    /// is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Decide the first screen from the stored session. This never stays
/// on screen itself; it runs once before the first frame.
pub fn route(store: &SessionStore) -> Route {
    match store.load() {
        Some(session) => Route::Library(session),
        None => Route::Login,
    }
}
