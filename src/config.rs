//! Runtime configuration
//!
//! Everything is read from environment variables.

use std::path::PathBuf;

/// Overrides the SQLite database location
pub const DATABASE_PATH_VAR: &str = "CALORIE_TRACKER_DATABASE_PATH";

/// Optional user id to sign in as soon as the server starts
pub const USER_ID_VAR: &str = "CALORIE_TRACKER_USER_ID";

const DEFAULT_DATABASE_FILE: &str = "calorie_tracker.db";

/// Resolved process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub user_id: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let user_id = std::env::var(USER_ID_VAR)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            database_path: database_path(),
            user_id,
        }
    }
}

/// Get the database path from environment or use `data/calorie_tracker.db`
/// under the project root
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push(DEFAULT_DATABASE_FILE);
            path
        })
}
