//! Meal and Workout logging MCP Tools

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::MealAnalysis;
use crate::models::{Macros, Meal, MealCreate, MealType, Micros, Workout, WorkoutCreate};
use crate::state::{Tracker, TrackerStore};

/// Response for log_meal and log_analyzed_meal
#[derive(Debug, Serialize)]
pub struct LogMealResponse {
    pub meal: Meal,
    pub meals_today: usize,
}

/// Response for log_workout
#[derive(Debug, Serialize)]
pub struct LogWorkoutResponse {
    pub workout: Workout,
    pub label: String,
    /// True when the burn came from the MET catalog rather than the caller
    pub estimated: bool,
}

/// `meals_today` counts meals on the logged meal's own day
fn meal_response<S: TrackerStore>(tracker: &Tracker<S>, meal: Meal) -> LogMealResponse {
    let meals_today = meal
        .timestamp
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
        .map(|day| tracker.daily_stats(day).meals.len())
        .unwrap_or(0);
    LogMealResponse { meal, meals_today }
}

#[allow(clippy::too_many_arguments)]
pub fn log_meal<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    name: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    meal_type: Option<&str>,
    description: Option<&str>,
    micros: Option<Micros>,
    timestamp: Option<&str>,
) -> Result<LogMealResponse, String> {
    let data = MealCreate {
        timestamp: timestamp.map(String::from),
        name: name.trim().to_string(),
        description: description.unwrap_or_default().to_string(),
        image_url: None,
        calories,
        macros: Macros { protein, carbs, fat },
        micros: micros.unwrap_or_default(),
        meal_type: meal_type.map(MealType::from_str).unwrap_or_default(),
    };

    let meal = tracker.add_meal(&data).map_err(|e| e.to_string())?.clone();
    Ok(meal_response(tracker, meal))
}

/// Log a meal from a vision-analysis JSON response
pub fn log_analyzed_meal<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    analysis_json: &str,
    meal_type: Option<&str>,
    image_url: Option<&str>,
) -> Result<LogMealResponse, String> {
    let analysis = MealAnalysis::from_json(analysis_json).map_err(|e| e.to_string())?;
    let data = analysis.into_meal_create(
        meal_type.map(MealType::from_str).unwrap_or(MealType::Lunch),
        image_url.map(String::from),
    );

    let meal = tracker.add_meal(&data).map_err(|e| e.to_string())?.clone();
    Ok(meal_response(tracker, meal))
}

/// Log a workout. Without `calories_burned` the burn is estimated from the
/// catalog and the profile weight.
pub fn log_workout<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    workout_type: &str,
    duration_minutes: f64,
    calories_burned: Option<f64>,
    timestamp: Option<&str>,
) -> Result<LogWorkoutResponse, String> {
    let workout_type = workout_type.trim();
    let timestamp = timestamp.map(String::from);

    let workout = match calories_burned {
        Some(calories) => tracker.add_workout(&WorkoutCreate {
            timestamp,
            workout_type: workout_type.to_string(),
            duration_minutes,
            calories_burned: calories,
        }),
        None => tracker.log_workout(workout_type, duration_minutes, timestamp),
    }
    .map_err(|e| e.to_string())?
    .clone();

    Ok(LogWorkoutResponse {
        label: workout.label().to_string(),
        estimated: calories_burned.is_none(),
        workout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::Database;
    use crate::energy::{ActivityLevel, Goal, Sex};
    use crate::models::ProfileInput;
    use crate::state::SqliteStore;

    fn onboarded() -> Tracker<SqliteStore> {
        let database = Database::in_memory().unwrap();
        database.with_conn(|conn| run_migrations(conn)).unwrap();
        let mut tracker = Tracker::new(SqliteStore::new(database));
        tracker.sign_in("user-1", None).unwrap();
        tracker
            .complete_onboarding(ProfileInput {
                name: "Ana".to_string(),
                age: 30,
                weight_kg: 60.0,
                height_cm: 165.0,
                sex: Sex::Female,
                activity_level: ActivityLevel::Light,
                goal: Goal::Maintain,
            })
            .unwrap();
        tracker
    }

    #[test]
    fn test_log_meal() {
        let mut t = onboarded();
        let resp = log_meal(
            &mut t, "Oatmeal", 320.0, 12.0, 54.0, 6.0, Some("breakfast"), None, None,
            Some("2024-03-05T08:00:00+00:00"),
        )
        .unwrap();
        assert_eq!(resp.meal.meal_type, MealType::Breakfast);
        assert_eq!(resp.meals_today, 1);

        let resp = log_meal(
            &mut t, "Apple", 95.0, 0.5, 25.0, 0.3, None, None, None,
            Some("2024-03-05T10:00:00+00:00"),
        )
        .unwrap();
        assert_eq!(resp.meal.meal_type, MealType::Snack);
        assert_eq!(resp.meals_today, 2);
    }

    #[test]
    fn test_bad_timestamps_are_rejected_and_totals_stay_whole() {
        let mut t = onboarded();
        log_meal(&mut t, "Eggs", 100.0, 12.0, 1.0, 7.0, None, None, None, Some("2024-03-05T08:00:00Z")).unwrap();
        log_meal(&mut t, "Eggs", 200.0, 24.0, 2.0, 14.0, None, None, None, Some("2024-03-06T08:00:00Z")).unwrap();

        let err = log_meal(&mut t, "Pizza", 900.0, 30.0, 100.0, 40.0, None, None, None, Some("yesterday"))
            .unwrap_err();
        assert!(err.contains("yesterday"));
        assert!(log_workout(&mut t, "walking", 30.0, None, Some("05/03/2024")).is_err());
        assert!(log_workout(&mut t, "walking", 30.0, Some(120.0), Some("05/03/2024")).is_err());

        let consumed: f64 = t
            .history(NaiveDate::from_ymd_opt(2024, 3, 6).unwrap(), 90)
            .iter()
            .map(|d| d.calories_consumed)
            .sum();
        assert_eq!(consumed, 300.0);
        assert_eq!(t.meals().len(), 2);
        assert!(t.workouts().is_empty());

        let resp = log_meal(&mut t, "Tea", 5.0, 0.0, 1.0, 0.0, None, None, None, Some("2024-03-06T16:00:00Z"))
            .unwrap();
        assert_eq!(resp.meals_today, 2);
    }

    #[test]
    fn test_log_analyzed_meal() {
        let mut t = onboarded();
        let resp = log_analyzed_meal(
            &mut t,
            r#"{"name": "Pasta", "calories": 610, "macros": {"protein": 21, "carbs": 88, "fat": 17}}"#,
            None,
            Some("meals/pasta.jpg"),
        )
        .unwrap();
        assert_eq!(resp.meal.name, "Pasta");
        assert_eq!(resp.meal.meal_type, MealType::Lunch);
        assert_eq!(resp.meal.image_url.as_deref(), Some("meals/pasta.jpg"));

        let err = log_analyzed_meal(&mut t, r#"{"error": "blurry photo"}"#, None, None).unwrap_err();
        assert!(err.contains("blurry photo"));
        assert_eq!(t.meals().len(), 1);
    }

    #[test]
    fn test_log_workout_estimated_and_manual() {
        let mut t = onboarded();

        // 7.5 MET * 60 kg * 0.5 h
        let resp = log_workout(&mut t, "cycling", 30.0, None, None).unwrap();
        assert!(resp.estimated);
        assert_eq!(resp.workout.calories_burned, 225.0);
        assert_eq!(resp.label, "Cycling");

        let resp = log_workout(&mut t, "rowing", 20.0, Some(180.0), None).unwrap();
        assert!(!resp.estimated);
        assert_eq!(resp.workout.calories_burned, 180.0);
        assert_eq!(resp.label, "rowing");

        assert!(log_workout(&mut t, "cycling", 0.0, None, None).is_err());
        assert_eq!(t.workouts().len(), 2);
    }
}
