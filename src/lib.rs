//! Calorie Tracker Library
//!
//! Energy balance formulas, daily aggregation of meals and workouts, and the
//! state container that keeps a user's profile and logs in sync with storage.

pub mod analysis;
pub mod build_info;
pub mod config;
pub mod db;
pub mod energy;
pub mod mcp;
pub mod models;
pub mod state;
pub mod summary;
pub mod tools;
