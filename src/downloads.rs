//! Download/cache service: fetches tracks into the local cache and
//! removes them, reporting results over a typed event channel.
//!
//! The worker owns all file transfer; the screen controller only sends
//! commands and consumes events on its own thread. Completion of an
//! in-flight transfer after the receiver is gone lands in the cache
//! directory and its event is discarded with the channel.

mod cache;
mod fetch;
mod service;
mod worker;

pub use cache::*;
pub use fetch::*;
pub use service::*;
pub use worker::*;

#[cfg(test)]
mod tests;
