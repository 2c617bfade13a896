//! Data models
//!
//! Rust structs representing database entities.

mod meal;
mod profile;
mod workout;

pub use meal::{Macros, Meal, MealCreate, MealType, Micros};
pub use profile::{ProfileInput, ProfileUpdate, UserProfile};
pub use workout::{Workout, WorkoutCreate};

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat};

/// Current local time as RFC 3339 with offset, e.g. `2024-03-05T23:59:00+01:00`.
///
/// Local rather than UTC so the leading `YYYY-MM-DD` is the user's calendar day.
pub fn local_timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Check a caller-supplied timestamp. Accepts RFC 3339 (`2024-03-05T08:00:00+01:00`)
/// or a local date-time without offset (`2024-03-05T08:00:00`), so the leading
/// `YYYY-MM-DD` always names a real day.
pub fn validate_timestamp(timestamp: &str) -> Result<(), String> {
    let valid = DateTime::parse_from_rfc3339(timestamp).is_ok()
        || NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f").is_ok();
    if valid {
        Ok(())
    } else {
        Err(format!(
            "Invalid timestamp '{}', expected ISO-8601 like 2024-03-05T08:00:00+01:00",
            timestamp
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_timestamp() {
        assert!(validate_timestamp("2024-03-05T08:00:00Z").is_ok());
        assert!(validate_timestamp("2024-03-05T08:00:00+01:00").is_ok());
        assert!(validate_timestamp("2024-03-05T08:00:00").is_ok());
        assert!(validate_timestamp("2024-03-05T08:00:00.250").is_ok());
        assert!(validate_timestamp(&local_timestamp()).is_ok());

        assert!(validate_timestamp("yesterday").is_err());
        assert!(validate_timestamp("05/03/2024").is_err());
        assert!(validate_timestamp("2024-02-30T08:00:00Z").is_err());
        assert!(validate_timestamp("").is_err());
    }
}
