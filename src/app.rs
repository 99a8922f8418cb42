//! Application module: exposes the screen-controller model.
//!
//! The `App` model owns everything the renderer reads: the catalog,
//! selection, playback snapshot, the now-playing action menu and the
//! status line. All mutation happens on the event-loop thread.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
