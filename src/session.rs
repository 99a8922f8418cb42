//! Session module: token persistence and the session router.
//!
//! The router is a one-shot decision made before the first frame:
//! a stored, well-formed token goes to the library, everything else
//! goes to the login screen. During runtime, token invalidation is
//! reported over the tracker channel and routes back to login.

mod store;
mod tracker;

pub use store::*;
pub use tracker::*;

#[cfg(test)]
mod tests;
