//! Daily and Weekly summary MCP Tools

use serde::Serialize;

use crate::state::{Tracker, TrackerStore};
use crate::summary::{DailyStats, DayProgress, WeeklySummary};

use super::parse_date;

/// Longest history window served in one call
pub const MAX_HISTORY_DAYS: u32 = 90;

/// Response for get_daily_stats
#[derive(Debug, Serialize)]
pub struct DailyStatsResponse {
    #[serde(flatten)]
    pub stats: DailyStats,
    /// Only present once the user has a calorie goal
    pub progress: Option<DayProgress>,
}

/// One row of the history view, without the record lists
#[derive(Debug, Serialize)]
pub struct HistoryDay {
    pub date: String,
    pub calories_consumed: f64,
    pub calories_burned: f64,
    pub net_calories: f64,
    pub meal_count: usize,
    pub workout_count: usize,
}

impl From<&DailyStats> for HistoryDay {
    fn from(stats: &DailyStats) -> Self {
        Self {
            date: stats.date.clone(),
            calories_consumed: stats.calories_consumed,
            calories_burned: stats.calories_burned,
            net_calories: stats.net_calories,
            meal_count: stats.meals.len(),
            workout_count: stats.workouts.len(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub days: Vec<HistoryDay>,
    pub summary: WeeklySummary,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub records_removed: usize,
}

pub fn get_daily_stats<S: TrackerStore>(
    tracker: &Tracker<S>,
    date: Option<&str>,
) -> Result<DailyStatsResponse, String> {
    let date = parse_date(date)?;
    if tracker.account().is_none() {
        return Err("No user is signed in".to_string());
    }

    let stats = tracker.daily_stats(date);
    let progress = tracker
        .profile()
        .map(|p| DayProgress::new(&stats, p.daily_calorie_goal()));

    Ok(DailyStatsResponse { stats, progress })
}

/// Per-day totals for the `days` days ending at `end_date`, oldest first
pub fn get_history<S: TrackerStore>(
    tracker: &Tracker<S>,
    end_date: Option<&str>,
    days: u32,
) -> Result<HistoryResponse, String> {
    let end = parse_date(end_date)?;
    if tracker.account().is_none() {
        return Err("No user is signed in".to_string());
    }
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(format!("days must be between 1 and {}", MAX_HISTORY_DAYS));
    }

    let stats = tracker.history(end, days);
    Ok(HistoryResponse {
        days: stats.iter().map(HistoryDay::from).collect(),
        summary: WeeklySummary::from_days(&stats),
    })
}

pub fn reset_data<S: TrackerStore>(tracker: &mut Tracker<S>) -> Result<ResetResponse, String> {
    let removed = tracker.reset().map_err(|e| e.to_string())?;
    Ok(ResetResponse {
        success: true,
        records_removed: removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::Database;
    use crate::models::{Macros, MealCreate};
    use crate::state::SqliteStore;

    fn signed_in() -> Tracker<SqliteStore> {
        let database = Database::in_memory().unwrap();
        database.with_conn(|conn| run_migrations(conn)).unwrap();
        let mut tracker = Tracker::new(SqliteStore::new(database));
        tracker.sign_in("user-1", None).unwrap();
        tracker
    }

    fn snack(timestamp: &str, calories: f64) -> MealCreate {
        MealCreate {
            timestamp: Some(timestamp.to_string()),
            name: "Nuts".to_string(),
            calories,
            macros: Macros { protein: 5.0, carbs: 4.0, fat: 14.0 },
            ..Default::default()
        }
    }

    #[test]
    fn test_daily_stats_without_profile_has_no_progress() {
        let mut t = signed_in();
        t.add_meal(&snack("2024-03-05T16:00:00+00:00", 170.0)).unwrap();

        let resp = get_daily_stats(&t, Some("2024-03-05")).unwrap();
        assert_eq!(resp.stats.calories_consumed, 170.0);
        assert!(resp.progress.is_none());

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["date"], "2024-03-05");
        assert_eq!(json["fat"], 14.0);
    }

    #[test]
    fn test_daily_stats_progress_shows_clamped_remaining() {
        use crate::energy::{ActivityLevel, Goal, Sex};
        use crate::models::ProfileInput;

        let mut t = signed_in();
        t.complete_onboarding(ProfileInput {
            name: "Ana".to_string(),
            age: 30,
            weight_kg: 70.0,
            height_cm: 175.0,
            sex: Sex::Male,
            activity_level: ActivityLevel::Sedentary,
            goal: Goal::Loss,
        })
        .unwrap();
        t.add_meal(&snack("2024-03-05T16:00:00+00:00", 2000.0)).unwrap();

        let json = serde_json::to_value(get_daily_stats(&t, Some("2024-03-05")).unwrap()).unwrap();
        assert_eq!(json["progress"]["daily_goal"], 1682);
        assert_eq!(json["progress"]["remaining_calories"], -318.0);
        assert_eq!(json["progress"]["remaining_display"], 0);
    }

    #[test]
    fn test_requires_sign_in_and_valid_window() {
        let mut t = signed_in();
        assert!(get_history(&t, Some("2024-03-05"), 0).is_err());
        assert!(get_history(&t, Some("2024-03-05"), MAX_HISTORY_DAYS + 1).is_err());
        assert!(get_daily_stats(&t, Some("March 5")).is_err());

        t.sign_out();
        assert!(get_daily_stats(&t, Some("2024-03-05")).is_err());
        assert!(get_history(&t, None, 7).is_err());
    }

    #[test]
    fn test_history_and_reset() {
        let mut t = signed_in();
        t.add_meal(&snack("2024-03-01T16:00:00+00:00", 200.0)).unwrap();
        t.add_meal(&snack("2024-03-05T16:00:00+00:00", 500.0)).unwrap();

        let resp = get_history(&t, Some("2024-03-05"), 7).unwrap();
        assert_eq!(resp.days.len(), 7);
        assert_eq!(resp.days[0].date, "2024-02-28");
        assert_eq!(resp.days[2].calories_consumed, 200.0);
        assert_eq!(resp.days[6].meal_count, 1);
        assert_eq!(resp.summary.total_consumed, 700.0);
        assert_eq!(resp.summary.average_consumed, 100.0);

        let reset = reset_data(&mut t).unwrap();
        assert_eq!(reset.records_removed, 2);
        assert_eq!(get_history(&t, Some("2024-03-05"), 7).unwrap().summary.total_consumed, 0.0);
    }
}
