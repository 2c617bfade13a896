//! Goal progress and weekly rollups
//!
//! Views computed on top of [`DailyStats`].

use serde::Serialize;

use super::daily::DailyStats;

/// Share of the daily goal, in energy, assigned to each macro
pub const PROTEIN_SHARE: f64 = 0.3;
pub const CARBS_SHARE: f64 = 0.4;
pub const FAT_SHARE: f64 = 0.3;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Macro gram targets for a calorie goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroTargets {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl MacroTargets {
    pub fn for_goal(daily_goal: i64) -> Self {
        let goal = daily_goal as f64;
        Self {
            protein: (goal * PROTEIN_SHARE / KCAL_PER_GRAM_PROTEIN).round() as i64,
            carbs: (goal * CARBS_SHARE / KCAL_PER_GRAM_CARBS).round() as i64,
            fat: (goal * FAT_SHARE / KCAL_PER_GRAM_FAT).round() as i64,
        }
    }
}

/// How a day stands against the user's goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayProgress {
    pub date: String,
    pub daily_goal: i64,
    pub net_calories: f64,
    /// `goal - net`; negative once the goal is exceeded
    pub remaining_calories: f64,
    /// Whole kcal left as shown to the user, never below zero
    pub remaining_display: i64,
    /// 0..=100 (can be negative when more was burned than eaten)
    pub progress_percent: f64,
    pub macro_targets: MacroTargets,
}

impl DayProgress {
    pub fn new(stats: &DailyStats, daily_goal: i64) -> Self {
        let goal = daily_goal as f64;
        let remaining = goal - stats.net_calories;
        let progress_percent = if daily_goal > 0 {
            (stats.net_calories / goal * 100.0).min(100.0)
        } else {
            0.0
        };

        Self {
            date: stats.date.clone(),
            daily_goal,
            net_calories: stats.net_calories,
            remaining_calories: remaining,
            remaining_display: remaining.round().max(0.0) as i64,
            progress_percent,
            macro_targets: MacroTargets::for_goal(daily_goal),
        }
    }
}

/// Totals and per-day averages over a run of days
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub days: usize,
    pub total_consumed: f64,
    pub total_burned: f64,
    pub total_net: f64,
    pub average_consumed: f64,
    pub average_burned: f64,
    pub average_net: f64,
}

impl WeeklySummary {
    pub fn from_days(days: &[DailyStats]) -> Self {
        let total_consumed: f64 = days.iter().map(|d| d.calories_consumed).sum();
        let total_burned: f64 = days.iter().map(|d| d.calories_burned).sum();
        let total_net: f64 = days.iter().map(|d| d.net_calories).sum();

        let average = |total: f64| {
            if days.is_empty() {
                0.0
            } else {
                total / days.len() as f64
            }
        };

        Self {
            start_date: days.first().map(|d| d.date.clone()),
            end_date: days.last().map(|d| d.date.clone()),
            days: days.len(),
            total_consumed,
            total_burned,
            total_net,
            average_consumed: average(total_consumed),
            average_burned: average(total_burned),
            average_net: average(total_net),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(date: &str, consumed: f64, burned: f64) -> DailyStats {
        DailyStats {
            date: date.to_string(),
            calories_consumed: consumed,
            calories_burned: burned,
            net_calories: consumed - burned,
            protein: 0.0,
            carbs: 0.0,
            fat: 0.0,
            meals: Vec::new(),
            workouts: Vec::new(),
        }
    }

    #[test]
    fn test_macro_targets() {
        let targets = MacroTargets::for_goal(2000);
        assert_eq!(targets, MacroTargets { protein: 150, carbs: 200, fat: 67 });
    }

    #[test]
    fn test_progress_under_goal() {
        let progress = DayProgress::new(&stats("2024-03-05", 1200.0, 200.0), 2000);
        assert_eq!(progress.remaining_calories, 1000.0);
        assert_eq!(progress.remaining_display, 1000);
        assert!((progress.progress_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_progress_caps_at_100_and_remaining_display_floors_at_zero() {
        let progress = DayProgress::new(&stats("2024-03-05", 2600.0, 0.0), 2000);
        assert_eq!(progress.progress_percent, 100.0);
        assert_eq!(progress.remaining_calories, -600.0);
        assert_eq!(progress.remaining_display, 0);
    }

    #[test]
    fn test_progress_with_zero_goal() {
        let progress = DayProgress::new(&stats("2024-03-05", 500.0, 0.0), 0);
        assert_eq!(progress.progress_percent, 0.0);
    }

    #[test]
    fn test_weekly_summary() {
        let days = vec![
            stats("2024-03-01", 2000.0, 300.0),
            stats("2024-03-02", 1800.0, 0.0),
            stats("2024-03-03", 2200.0, 600.0),
        ];
        let summary = WeeklySummary::from_days(&days);
        assert_eq!(summary.days, 3);
        assert_eq!(summary.start_date.as_deref(), Some("2024-03-01"));
        assert_eq!(summary.end_date.as_deref(), Some("2024-03-03"));
        assert_eq!(summary.total_consumed, 6000.0);
        assert_eq!(summary.total_burned, 900.0);
        assert_eq!(summary.total_net, 5100.0);
        assert_eq!(summary.average_consumed, 2000.0);
        assert_eq!(summary.average_net, 1700.0);

        let empty = WeeklySummary::from_days(&[]);
        assert_eq!(empty.average_net, 0.0);
        assert!(empty.start_date.is_none());
    }
}
