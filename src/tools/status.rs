//! Status Tool
//!
//! Runtime status of the service, and usage instructions for assistants.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::db::{migrations, Database, DbResult};

/// Logging instructions for AI assistants
pub const TRACKING_INSTRUCTIONS: &str = r#"
# Calorie Tracker Instructions

## Session

1. Call `sign_in` with the user's id. The response says whether the user is onboarded.
2. If `is_onboarded` is false, ask for name, age, weight (kg), height (cm), sex,
   activity level (sedentary, light, moderate, active) and goal (loss, maintain, gain),
   then call `complete_onboarding`.

BMR and the daily calorie goal are always computed by the server. Never send them.

## Logging

- `log_meal` for meals the user describes. Estimate calories and macros in grams.
- `log_analyzed_meal` for the JSON answer of a photo analysis, passed through unchanged.
- `log_workout` with a `workout_type` id from `list_workout_types` and a duration in
  minutes. Leave `calories_burned` empty to estimate it from the user's weight.
  Unknown workout types are logged with 0 kcal.

## Dates

Dates are `YYYY-MM-DD` and default to today. A record belongs to the day its
timestamp starts with.

## Reviewing

- `get_daily_stats` for one day, including remaining calories against the goal.
- `get_history` for the last N days (7 for a week), with totals and averages.
"#;

/// Service status
#[derive(Debug, Serialize)]
pub struct TrackerStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub schema_version: Option<i32>,
    pub record_counts: Option<RecordCounts>,
    pub signed_in_user: Option<String>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

#[derive(Debug, Serialize)]
pub struct RecordCounts {
    pub profiles: i64,
    pub meals: i64,
    pub workouts: i64,
}

impl RecordCounts {
    pub fn load(database: &Database) -> DbResult<Self> {
        database.with_conn(|conn| {
            let count = |table: &str| -> DbResult<i64> {
                Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?)
            };
            Ok(Self {
                profiles: count("profiles")?,
                meals: count("meals")?,
                workouts: count("workouts")?,
            })
        })
    }
}

/// Tracks service uptime and where the database lives
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    pub fn get_status(&self, database: &Database, signed_in_user: Option<String>) -> TrackerStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let schema_version = database
            .with_conn(migrations::get_schema_version)
            .map_err(|e| tracing::warn!(error = %e, "could not read schema version"))
            .ok();
        let record_counts = RecordCounts::load(database)
            .map_err(|e| tracing::warn!(error = %e, "could not count records"))
            .ok();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        TrackerStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            schema_version,
            record_counts,
            signed_in_user,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}
