//! Playback service: a worker thread behind a command channel.
//!
//! Screens never touch playback state directly; they bind to the
//! service, send typed commands and observe the shared now-playing
//! snapshot. Connection events mirror the bind/unbind lifecycle.
//! Decoding and audio output are outside the scope of this crate;
//! the worker advances a metadata-driven playback clock.

mod service;
mod thread;
mod types;

pub use service::*;
pub use types::*;

#[cfg(test)]
mod tests;
