//! Client state
//!
//! The tracker state container and the store it syncs with.

mod store;
mod tracker;

pub use store::{SqliteStore, TrackerStore};
pub use tracker::{Account, Tracker, TrackerError, TrackerResult};
