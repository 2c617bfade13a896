//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!("applied schema migration v1");
    }

    Ok(())
}

/// Migration v1: profiles, meals and workouts
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- PROFILES
        -- One row per onboarded user. bmr and
        -- daily_calorie_goal are derived from the
        -- other columns and rewritten on every save.
        -- ============================================
        CREATE TABLE profiles (
            id TEXT PRIMARY KEY,                 -- opaque id from the auth provider
            name TEXT NOT NULL,
            age INTEGER NOT NULL CHECK(age >= 0),
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female')),
            activity_level TEXT NOT NULL CHECK(activity_level IN ('sedentary', 'light', 'moderate', 'active')),
            goal TEXT NOT NULL DEFAULT 'maintain' CHECK(goal IN ('loss', 'maintain', 'gain')),
            basal_metabolic_rate REAL NOT NULL,
            daily_calorie_goal INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- MEALS
        -- ============================================
        CREATE TABLE meals (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,             -- RFC 3339, local offset
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            image_url TEXT,
            calories REAL NOT NULL DEFAULT 0 CHECK(calories >= 0),
            macros TEXT NOT NULL DEFAULT '{}',   -- JSON {protein, carbs, fat}
            micros TEXT NOT NULL DEFAULT '{}',   -- JSON string map
            meal_type TEXT NOT NULL CHECK(meal_type IN ('breakfast', 'lunch', 'dinner', 'snack')),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_meals_user ON meals(user_id);
        CREATE INDEX idx_meals_timestamp ON meals(timestamp);

        -- ============================================
        -- WORKOUTS
        -- ============================================
        CREATE TABLE workouts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL,
            timestamp TEXT NOT NULL,
            workout_type TEXT NOT NULL,
            duration_minutes REAL NOT NULL CHECK(duration_minutes > 0),
            calories_burned REAL NOT NULL DEFAULT 0 CHECK(calories_burned >= 0),
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_workouts_user ON workouts(user_id);
        CREATE INDEX idx_workouts_timestamp ON workouts(timestamp);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_migration(&conn).unwrap());

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }
}
