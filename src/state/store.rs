//! Persistence seam for the tracker
//!
//! [`TrackerStore`] is everything the tracker needs from a backend.
//! [`SqliteStore`] implements it on the local database.

use crate::db::{Database, DbResult};
use crate::models::{Meal, MealCreate, UserProfile, Workout, WorkoutCreate};

pub trait TrackerStore {
    fn load_profile(&self, user_id: &str) -> DbResult<Option<UserProfile>>;

    fn insert_profile(&self, profile: &UserProfile) -> DbResult<()>;

    /// Returns false when no profile exists for the id
    fn update_profile(&self, profile: &UserProfile) -> DbResult<bool>;

    /// Newest first
    fn list_meals(&self, user_id: &str) -> DbResult<Vec<Meal>>;

    /// Newest first
    fn list_workouts(&self, user_id: &str) -> DbResult<Vec<Workout>>;

    fn insert_meal(&self, user_id: &str, data: &MealCreate) -> DbResult<Meal>;

    fn insert_workout(&self, user_id: &str, data: &WorkoutCreate) -> DbResult<Workout>;

    /// Remove the user's meals and workouts, returning how many rows went
    fn clear_user_data(&self, user_id: &str) -> DbResult<usize>;
}

/// [`TrackerStore`] backed by the SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    database: Database,
}

impl SqliteStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

impl TrackerStore for SqliteStore {
    fn load_profile(&self, user_id: &str) -> DbResult<Option<UserProfile>> {
        self.database.with_conn(|conn| UserProfile::get(conn, user_id))
    }

    fn insert_profile(&self, profile: &UserProfile) -> DbResult<()> {
        self.database.with_conn(|conn| profile.insert(conn))
    }

    fn update_profile(&self, profile: &UserProfile) -> DbResult<bool> {
        self.database.with_conn(|conn| profile.update(conn))
    }

    fn list_meals(&self, user_id: &str) -> DbResult<Vec<Meal>> {
        self.database.with_conn(|conn| Meal::list_for_user(conn, user_id))
    }

    fn list_workouts(&self, user_id: &str) -> DbResult<Vec<Workout>> {
        self.database.with_conn(|conn| Workout::list_for_user(conn, user_id))
    }

    fn insert_meal(&self, user_id: &str, data: &MealCreate) -> DbResult<Meal> {
        self.database.with_conn(|conn| Meal::create(conn, user_id, data))
    }

    fn insert_workout(&self, user_id: &str, data: &WorkoutCreate) -> DbResult<Workout> {
        self.database.with_conn(|conn| Workout::create(conn, user_id, data))
    }

    fn clear_user_data(&self, user_id: &str) -> DbResult<usize> {
        self.database.with_transaction(|tx| {
            let meals = Meal::delete_for_user(tx, user_id)?;
            let workouts = Workout::delete_for_user(tx, user_id)?;
            Ok(meals + workouts)
        })
    }
}
