//! Profile state manager
//!
//! [`Tracker`] holds the signed-in account and its meals and workouts, keeps
//! them in sync with a [`TrackerStore`], and hands its collections to the
//! aggregator. Callers own the tracker and pass it where it is needed.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use crate::db::DbError;
use crate::energy::calculate_workout_calories;
use crate::models::{
    Meal, MealCreate, ProfileInput, ProfileUpdate, UserProfile, Workout, WorkoutCreate,
};
use crate::summary::{self, DailyStats, DayProgress};

use super::store::TrackerStore;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("No user is signed in")]
    NotSignedIn,

    #[error("Profile not set up yet; complete onboarding first")]
    NotOnboarded,

    #[error("Profile already exists for user {0}")]
    AlreadyOnboarded(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] DbError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// The signed-in identity. Without a profile the user still has to onboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: String,
    pub email: Option<String>,
    pub profile: Option<UserProfile>,
}

impl Account {
    pub fn is_onboarded(&self) -> bool {
        self.profile.is_some()
    }
}

fn validate_body(age: u32, weight_kg: f64, height_cm: f64) -> TrackerResult<()> {
    if !weight_kg.is_finite() || weight_kg <= 0.0 {
        return Err(TrackerError::InvalidInput(format!("Weight must be positive, got {}", weight_kg)));
    }
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Err(TrackerError::InvalidInput(format!("Height must be positive, got {}", height_cm)));
    }
    if age > 150 {
        return Err(TrackerError::InvalidInput(format!("Age out of range: {}", age)));
    }
    Ok(())
}

/// Insert position keeping `timestamp DESC, id DESC`, the order the store lists in.
/// A new record has the highest id, so it goes before equal timestamps.
fn newest_first_position<T>(items: &[T], timestamp: &str, key: impl Fn(&T) -> &String) -> usize {
    items.partition_point(|item| key(item).as_str() > timestamp)
}

pub struct Tracker<S> {
    store: S,
    account: Option<Account>,
    meals: Vec<Meal>,
    workouts: Vec<Workout>,
}

impl<S: TrackerStore> Tracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            account: None,
            meals: Vec::new(),
            workouts: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.account.as_ref().and_then(|a| a.profile.as_ref())
    }

    /// Newest first
    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }

    /// Newest first
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    fn signed_in(&self) -> TrackerResult<&Account> {
        self.account.as_ref().ok_or(TrackerError::NotSignedIn)
    }

    fn onboarded_profile(&self) -> TrackerResult<&UserProfile> {
        self.signed_in()?.profile.as_ref().ok_or(TrackerError::NotOnboarded)
    }

    /// Load a user's state. A missing or unreadable profile leaves the account
    /// in the onboarding state rather than failing.
    pub fn sign_in(&mut self, user_id: &str, email: Option<String>) -> TrackerResult<&Account> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(TrackerError::InvalidInput("User id cannot be empty".to_string()));
        }

        self.meals.clear();
        self.workouts.clear();

        let profile = match self.store.load_profile(user_id) {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(user_id, error = %e, "failed to load profile, falling back to onboarding");
                None
            }
        };

        if profile.is_some() {
            self.load_activity(user_id);
        } else {
            tracing::info!(user_id, "no profile found, user needs onboarding");
        }

        tracing::info!(
            user_id,
            onboarded = profile.is_some(),
            meals = self.meals.len(),
            workouts = self.workouts.len(),
            "signed in"
        );

        Ok(self.account.insert(Account {
            id: user_id.to_string(),
            email,
            profile,
        }))
    }

    /// Load meals and workouts; a failing list leaves that collection empty
    fn load_activity(&mut self, user_id: &str) {
        match self.store.list_meals(user_id) {
            Ok(meals) => self.meals = meals,
            Err(e) => tracing::error!(user_id, error = %e, "failed to load meals"),
        }
        match self.store.list_workouts(user_id) {
            Ok(workouts) => self.workouts = workouts,
            Err(e) => tracing::error!(user_id, error = %e, "failed to load workouts"),
        }
    }

    pub fn sign_out(&mut self) {
        if let Some(account) = self.account.take() {
            tracing::info!(user_id = %account.id, "signed out");
        }
        self.meals.clear();
        self.workouts.clear();
    }

    /// Create the profile for the signed-in account
    pub fn complete_onboarding(&mut self, input: ProfileInput) -> TrackerResult<&UserProfile> {
        let account = self.signed_in()?;
        if account.is_onboarded() {
            return Err(TrackerError::AlreadyOnboarded(account.id.clone()));
        }
        if input.name.trim().is_empty() {
            return Err(TrackerError::InvalidInput("Name cannot be empty".to_string()));
        }
        validate_body(input.age, input.weight_kg, input.height_cm)?;

        let profile = UserProfile::new(account.id.clone(), input);
        self.store.insert_profile(&profile)?;

        tracing::info!(
            user_id = %profile.id,
            bmr = profile.bmr(),
            daily_calorie_goal = profile.daily_calorie_goal(),
            "onboarding complete"
        );

        let account = self.account.as_mut().ok_or(TrackerError::NotSignedIn)?;
        Ok(account.profile.insert(profile))
    }

    /// Change profile fields; BMR and the daily goal follow
    pub fn update_profile(&mut self, update: &ProfileUpdate) -> TrackerResult<&UserProfile> {
        let current = self.onboarded_profile()?;
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(TrackerError::InvalidInput("Name cannot be empty".to_string()));
            }
        }

        let updated = current.apply(update);
        let input = updated.input();
        validate_body(input.age, input.weight_kg, input.height_cm)?;

        if !self.store.update_profile(&updated)? {
            tracing::warn!(user_id = %updated.id, "profile row missing on update");
        }

        tracing::debug!(
            user_id = %updated.id,
            bmr = updated.bmr(),
            daily_calorie_goal = updated.daily_calorie_goal(),
            "profile updated"
        );

        let account = self.account.as_mut().ok_or(TrackerError::NotSignedIn)?;
        Ok(account.profile.insert(updated))
    }

    /// Persist a meal and slot it into the local list by timestamp
    pub fn add_meal(&mut self, data: &MealCreate) -> TrackerResult<&Meal> {
        let user_id = self.signed_in()?.id.clone();
        data.validate().map_err(TrackerError::InvalidInput)?;

        let meal = self.store.insert_meal(&user_id, data)?;
        tracing::info!(user_id = %user_id, meal_id = meal.id, calories = meal.calories, "meal logged");

        let at = newest_first_position(&self.meals, &meal.timestamp, |m| &m.timestamp);
        self.meals.insert(at, meal);
        Ok(&self.meals[at])
    }

    /// Persist a workout and slot it into the local list by timestamp
    pub fn add_workout(&mut self, data: &WorkoutCreate) -> TrackerResult<&Workout> {
        let user_id = self.signed_in()?.id.clone();
        data.validate().map_err(TrackerError::InvalidInput)?;

        let workout = self.store.insert_workout(&user_id, data)?;
        tracing::info!(
            user_id = %user_id,
            workout_id = workout.id,
            calories_burned = workout.calories_burned,
            "workout logged"
        );

        let at = newest_first_position(&self.workouts, &workout.timestamp, |w| &w.timestamp);
        self.workouts.insert(at, workout);
        Ok(&self.workouts[at])
    }

    /// Log a catalog workout, estimating the burn from the profile weight.
    /// Unknown types are logged with 0 kcal.
    pub fn log_workout(
        &mut self,
        workout_type: &str,
        duration_minutes: f64,
        timestamp: Option<String>,
    ) -> TrackerResult<&Workout> {
        let weight_kg = self.onboarded_profile()?.weight_kg();
        let calories = calculate_workout_calories(weight_kg, duration_minutes, workout_type);
        if calories == 0 {
            tracing::warn!(workout_type, duration_minutes, "workout burned 0 kcal, type may be unknown");
        }

        self.add_workout(&WorkoutCreate {
            timestamp,
            workout_type: workout_type.to_string(),
            duration_minutes,
            calories_burned: calories as f64,
        })
    }

    pub fn daily_stats(&self, date: NaiveDate) -> DailyStats {
        summary::get_daily_stats(&self.meals, &self.workouts, date)
    }

    pub fn history(&self, end: NaiveDate, days: u32) -> Vec<DailyStats> {
        summary::history(&self.meals, &self.workouts, end, days)
    }

    pub fn day_progress(&self, date: NaiveDate) -> TrackerResult<DayProgress> {
        let goal = self.onboarded_profile()?.daily_calorie_goal();
        Ok(DayProgress::new(&self.daily_stats(date), goal))
    }

    /// Drop the user's meals and workouts, locally and in the store.
    /// The profile stays.
    pub fn reset(&mut self) -> TrackerResult<usize> {
        let user_id = self.signed_in()?.id.clone();
        let removed = self.store.clear_user_data(&user_id)?;
        self.meals.clear();
        self.workouts.clear();
        tracing::warn!(user_id = %user_id, removed, "user data reset");
        Ok(removed)
    }
}
