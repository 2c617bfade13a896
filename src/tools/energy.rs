//! Energy calculator MCP Tools
//!
//! Stateless calculators over the energy formulas, and the workout catalog.

use serde::Serialize;

use crate::energy::{
    calculate_bmr, calculate_goal_calories, calculate_tdee, calories_per_hour, ActivityLevel,
    Goal, Sex, WORKOUT_TYPES,
};

/// Response for calculate_energy
#[derive(Debug, Serialize)]
pub struct EnergyResponse {
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    pub tdee: i64,
    pub goal: Goal,
    pub daily_calorie_goal: i64,
    /// TDEE for every activity level, for comparison
    pub tdee_by_activity: Vec<(ActivityLevel, i64)>,
}

/// One row of the workout catalog
#[derive(Debug, Serialize)]
pub struct WorkoutTypeEntry {
    pub id: &'static str,
    pub label: &'static str,
    pub mets: f64,
    /// Only present when a weight was given
    pub calories_per_hour: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutCatalogResponse {
    pub workout_types: Vec<WorkoutTypeEntry>,
    pub total: usize,
}

pub fn calculate_energy(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    sex: &str,
    activity_level: &str,
    goal: Option<&str>,
) -> Result<EnergyResponse, String> {
    let sex = Sex::from_str(sex)
        .ok_or_else(|| format!("Invalid sex: '{}'. Valid values: male, female", sex))?;
    let activity_level = ActivityLevel::from_str(activity_level).ok_or_else(|| {
        format!(
            "Invalid activity level: '{}'. Valid values: sedentary, light, moderate, active",
            activity_level
        )
    })?;
    let goal = goal.map(Goal::from_str).unwrap_or_default();

    let bmr = calculate_bmr(weight_kg, height_cm, age, sex);
    let tdee = calculate_tdee(bmr, activity_level);

    Ok(EnergyResponse {
        bmr,
        activity_level,
        tdee,
        goal,
        daily_calorie_goal: calculate_goal_calories(tdee, bmr, goal),
        tdee_by_activity: ActivityLevel::ALL
            .iter()
            .map(|&level| (level, calculate_tdee(bmr, level)))
            .collect(),
    })
}

pub fn list_workout_types(weight_kg: Option<f64>) -> WorkoutCatalogResponse {
    let workout_types: Vec<WorkoutTypeEntry> = WORKOUT_TYPES
        .iter()
        .map(|w| WorkoutTypeEntry {
            id: w.id,
            label: w.label,
            mets: w.mets,
            calories_per_hour: weight_kg.map(|kg| calories_per_hour(kg, w.id)),
        })
        .collect();

    WorkoutCatalogResponse {
        total: workout_types.len(),
        workout_types,
    }
}
