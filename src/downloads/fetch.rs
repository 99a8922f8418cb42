use std::fmt;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::time::Duration;

use crate::catalog::Audio;

/// What the worker needs to know about one track transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub key: String,
    pub url: String,
    pub display: String,
}

impl DownloadRequest {
    pub fn from_audio(audio: &Audio) -> Self {
        Self {
            key: audio.key(),
            url: audio.url.clone(),
            display: audio.display.clone(),
        }
    }
}

#[derive(Debug)]
pub enum FetchError {
    /// The platform rejected the session; the token is gone.
    Unauthorized,
    Http(String),
    Io(io::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Unauthorized => write!(f, "authorization rejected"),
            FetchError::Http(msg) => write!(f, "transfer failed: {msg}"),
            FetchError::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        FetchError::Io(e)
    }
}

/// Capability to bring one track's audio data to a local path.
pub trait AudioSource: Send {
    fn fetch(&self, request: &DownloadRequest, dest: &Path) -> Result<u64, FetchError>;
}

/// Fetches over HTTP with a blocking client; the one real source.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, Box<dyn std::error::Error>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl AudioSource for HttpSource {
    fn fetch(&self, request: &DownloadRequest, dest: &Path) -> Result<u64, FetchError> {
        let response = self
            .client
            .get(&request.url)
            .send()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized);
        }
        let mut response = response
            .error_for_status()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        // Stream into a sibling temp file; the final name only ever
        // names a complete download.
        let partial = dest.with_extension("part");
        let written = {
            let mut file = File::create(&partial)?;
            response
                .copy_to(&mut file)
                .map_err(|e| FetchError::Http(e.to_string()))?
        };
        fs::rename(&partial, dest)?;

        Ok(written)
    }
}
