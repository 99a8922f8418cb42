//! Catalog module: the `Audio` track model and the snapshot store.
//!
//! Tracks come from a locally stored snapshot of the user's remote
//! audio catalog. Cached copies found on disk are attached to the
//! in-memory tracks by the downloads module at startup.

mod display;
mod model;
mod store;

pub use display::*;
pub use model::*;
pub use store::*;

#[cfg(test)]
mod tests;
