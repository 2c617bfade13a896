//! Workout model
//!
//! A logged workout session. Calories are fixed at logging time.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::energy::find_workout_type;
use super::{local_timestamp, validate_timestamp};

/// A logged workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub user_id: String,
    pub timestamp: String,
    /// Catalog id, e.g. "cycling"
    pub workout_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
}

/// Data for logging a new workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutCreate {
    pub timestamp: Option<String>,
    pub workout_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
}

impl WorkoutCreate {
    pub fn validate(&self) -> Result<(), String> {
        if self.workout_type.trim().is_empty() {
            return Err("Workout type cannot be empty".to_string());
        }
        if let Some(timestamp) = &self.timestamp {
            validate_timestamp(timestamp)?;
        }
        if !self.duration_minutes.is_finite() || self.duration_minutes <= 0.0 {
            return Err(format!("Duration must be positive, got {}", self.duration_minutes));
        }
        if !self.calories_burned.is_finite() || self.calories_burned < 0.0 {
            return Err(format!("Calories burned must be non-negative, got {}", self.calories_burned));
        }
        Ok(())
    }
}

impl Workout {
    /// Display label from the catalog, or the raw type id when unknown
    pub fn label(&self) -> &str {
        match find_workout_type(&self.workout_type) {
            Some(workout) => workout.label,
            None => &self.workout_type,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            timestamp: row.get("timestamp")?,
            workout_type: row.get("workout_type")?,
            duration_minutes: row.get("duration_minutes")?,
            calories_burned: row.get("calories_burned")?,
        })
    }

    pub fn create(conn: &Connection, user_id: &str, data: &WorkoutCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(local_timestamp);

        conn.execute(
            r#"
            INSERT INTO workouts (user_id, timestamp, workout_type, duration_minutes, calories_burned)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                user_id,
                timestamp,
                data.workout_type,
                data.duration_minutes,
                data.calories_burned,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("workout {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM workouts WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(workout) => Ok(Some(workout)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All workouts of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM workouts WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC",
        )?;
        let workouts = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(workouts)
    }

    pub fn delete_for_user(conn: &Connection, user_id: &str) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM workouts WHERE user_id = ?1", [user_id])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn swim(minutes: f64) -> WorkoutCreate {
        WorkoutCreate {
            timestamp: Some("2024-03-05T18:30:00+00:00".to_string()),
            workout_type: "swimming".to_string(),
            duration_minutes: minutes,
            calories_burned: 245.0,
        }
    }

    #[test]
    fn test_create_and_list() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let workout = Workout::create(&conn, "u1", &swim(30.0)).unwrap();
        assert_eq!(workout.workout_type, "swimming");
        assert_eq!(workout.label(), "Swimming");

        let listed = Workout::list_for_user(&conn, "u1").unwrap();
        assert_eq!(listed, vec![workout]);
        assert!(Workout::list_for_user(&conn, "u2").unwrap().is_empty());
        assert_eq!(Workout::delete_for_user(&conn, "u1").unwrap(), 1);
    }

    #[test]
    fn test_validate_rejects_non_iso_timestamp() {
        assert!(swim(30.0).validate().is_ok());

        let mut workout = swim(30.0);
        workout.timestamp = Some("05/03/2024".to_string());
        assert!(workout.validate().unwrap_err().contains("05/03/2024"));

        workout.timestamp = None;
        assert!(workout.validate().is_ok());
    }

    #[test]
    fn test_label_falls_back_to_type_id() {
        let workout = Workout {
            id: 1,
            user_id: "u1".to_string(),
            timestamp: "2024-03-05T18:30:00+00:00".to_string(),
            workout_type: "parkour".to_string(),
            duration_minutes: 20.0,
            calories_burned: 0.0,
        };
        assert_eq!(workout.label(), "parkour");
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        assert!(swim(30.0).validate().is_ok());
        assert!(swim(0.0).validate().is_err());
        assert!(swim(-5.0).validate().is_err());
    }
}
