//! Daily aggregation
//!
//! Joins meals and workouts into per-day totals. Everything here is a pure
//! function of its arguments.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{Meal, Workout};

/// Totals for one calendar day. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: String,
    pub calories_consumed: f64,
    pub calories_burned: f64,
    /// Consumed minus burned, may be negative
    pub net_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meals: Vec<Meal>,
    pub workouts: Vec<Workout>,
}

/// `YYYY-MM-DD` key for a calendar day
pub fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Two timestamps fall on the same day iff they share the `YYYY-MM-DD` prefix.
/// No timezone conversion happens here.
fn is_same_day(timestamp: &str, key: &str) -> bool {
    timestamp.starts_with(key)
}

/// Aggregate the meals and workouts logged on `date`.
///
/// Matching records keep their input order.
pub fn get_daily_stats(meals: &[Meal], workouts: &[Workout], date: NaiveDate) -> DailyStats {
    let key = day_key(date);

    let days_meals: Vec<Meal> = meals
        .iter()
        .filter(|m| is_same_day(&m.timestamp, &key))
        .cloned()
        .collect();
    let days_workouts: Vec<Workout> = workouts
        .iter()
        .filter(|w| is_same_day(&w.timestamp, &key))
        .cloned()
        .collect();

    let calories_consumed: f64 = days_meals.iter().map(|m| m.calories).sum();
    let calories_burned: f64 = days_workouts.iter().map(|w| w.calories_burned).sum();

    let protein: f64 = days_meals.iter().map(|m| m.macros.protein).sum();
    let carbs: f64 = days_meals.iter().map(|m| m.macros.carbs).sum();
    let fat: f64 = days_meals.iter().map(|m| m.macros.fat).sum();

    DailyStats {
        date: key,
        calories_consumed,
        calories_burned,
        net_calories: calories_consumed - calories_burned,
        protein,
        carbs,
        fat,
        meals: days_meals,
        workouts: days_workouts,
    }
}

/// Stats for the `days` calendar days ending at `end`, oldest first.
/// The window is cut short at the earliest representable date.
pub fn history(meals: &[Meal], workouts: &[Workout], end: NaiveDate, days: u32) -> Vec<DailyStats> {
    let mut window: Vec<NaiveDate> = (0..u64::from(days))
        .map_while(|offset| end.checked_sub_days(Days::new(offset)))
        .collect();
    window.reverse();

    window
        .into_iter()
        .map(|date| get_daily_stats(meals, workouts, date))
        .collect()
}
