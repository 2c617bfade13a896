//! Energy balance formulas
//!
//! Pure functions for BMR, TDEE, goal targets and workout burn. None of them
//! validate their inputs; nonsensical inputs give nonsensical numbers, never errors.

use serde::{Deserialize, Serialize};

use super::catalog::{find_workout_type, ActivityLevel};

/// Deficit or surplus applied by weight loss/gain goals
pub const GOAL_ADJUSTMENT: f64 = 0.15;

/// Biological sex, selects the Mifflin-St Jeor constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Some(Sex::Male),
            "female" | "f" => Some(Sex::Female),
            _ => None,
        }
    }

    fn bmr_constant(&self) -> f64 {
        match self {
            Sex::Male => 5.0,
            Sex::Female => -161.0,
        }
    }
}

/// Weight goal driving the daily calorie target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Loss,
    #[default]
    Maintain,
    Gain,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Loss => "loss",
            Goal::Maintain => "maintain",
            Goal::Gain => "gain",
        }
    }

    /// Anything that is not "loss" or "gain" means maintain
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "loss" | "lose" => Goal::Loss,
            "gain" => Goal::Gain,
            _ => Goal::Maintain,
        }
    }
}

/// Basal Metabolic Rate (kcal/day), Mifflin-St Jeor equation. Not rounded.
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, sex: Sex) -> f64 {
    10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age_years) + sex.bmr_constant()
}

/// Total Daily Energy Expenditure (kcal/day), rounded to the nearest kcal
pub fn calculate_tdee(bmr: f64, activity_level: ActivityLevel) -> i64 {
    (bmr * activity_level.multiplier()).round() as i64
}

/// Daily calorie target for a goal, rounded to the nearest kcal.
///
/// A loss target never goes below `bmr`.
pub fn calculate_goal_calories(tdee: i64, bmr: f64, goal: Goal) -> i64 {
    let tdee = tdee as f64;
    let target = match goal {
        Goal::Loss => {
            let target = tdee - tdee * GOAL_ADJUSTMENT;
            if target < bmr {
                bmr
            } else {
                target
            }
        }
        Goal::Gain => tdee + tdee * GOAL_ADJUSTMENT,
        Goal::Maintain => tdee,
    };

    target.round() as i64
}

/// Calories burned by a workout: `MET * weight * hours`, rounded.
///
/// Returns 0 when `workout_type_id` is not in the catalog. Callers cannot tell
/// that apart from a genuinely zero-length workout.
pub fn calculate_workout_calories(weight_kg: f64, duration_minutes: f64, workout_type_id: &str) -> i64 {
    match find_workout_type(workout_type_id) {
        Some(workout) => (workout.mets * weight_kg * (duration_minutes / 60.0)).round() as i64,
        None => 0,
    }
}

/// Hourly burn for a workout type, as shown when picking one
pub fn calories_per_hour(weight_kg: f64, workout_type_id: &str) -> i64 {
    calculate_workout_calories(weight_kg, 60.0, workout_type_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bmr_male_example() {
        let bmr = calculate_bmr(70.0, 175.0, 30, Sex::Male);
        assert!((bmr - 1648.75).abs() < 1e-9);
    }

    #[test]
    fn test_bmr_sex_gap_is_166() {
        for (w, h, a) in [(70.0, 175.0, 30), (52.5, 160.0, 0), (120.0, 199.5, 81)] {
            let male = calculate_bmr(w, h, a, Sex::Male);
            let female = calculate_bmr(w, h, a, Sex::Female);
            assert!((male - female - 166.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tdee_sedentary_example() {
        assert_eq!(calculate_tdee(1648.75, ActivityLevel::Sedentary), 1979);
    }

    #[test]
    fn test_tdee_monotonic_in_activity() {
        let values: Vec<i64> = ActivityLevel::ALL
            .iter()
            .map(|&level| calculate_tdee(1500.0, level))
            .collect();
        assert_eq!(values[0], 1800);
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_goal_loss_example_unclamped() {
        assert_eq!(calculate_goal_calories(1979, 1648.75, Goal::Loss), 1682);
    }

    #[test]
    fn test_goal_loss_clamped_to_bmr() {
        // 85% of 1700 is 1445, below a 1600 BMR
        assert_eq!(calculate_goal_calories(1700, 1600.0, Goal::Loss), 1600);
        // Floor is rounded like everything else
        assert_eq!(calculate_goal_calories(1700, 1600.6, Goal::Loss), 1601);
    }

    #[test]
    fn test_goal_loss_never_below_bmr() {
        for tdee in (1200..4000).step_by(37) {
            let bmr = 1180.0 + (tdee % 500) as f64;
            if (tdee as f64) < bmr {
                continue;
            }
            let target = calculate_goal_calories(tdee, bmr, Goal::Loss);
            assert!(target as f64 >= bmr.round(), "tdee {} bmr {}", tdee, bmr);
        }
    }

    #[test]
    fn test_goal_gain_and_maintain() {
        assert_eq!(calculate_goal_calories(1979, 1648.75, Goal::Gain), (1.15_f64 * 1979.0).round() as i64);
        assert_eq!(calculate_goal_calories(2000, 1500.0, Goal::Gain), 2300);
        assert_eq!(calculate_goal_calories(1979, 1648.75, Goal::Maintain), 1979);
    }

    #[test]
    fn test_goal_from_str_defaults_to_maintain() {
        assert_eq!(Goal::from_str("loss"), Goal::Loss);
        assert_eq!(Goal::from_str("GAIN"), Goal::Gain);
        assert_eq!(Goal::from_str(""), Goal::Maintain);
        assert_eq!(Goal::from_str("bulk"), Goal::Maintain);
    }

    #[test]
    fn test_workout_calories() {
        // 8.0 MET * 70 kg * 0.5 h
        assert_eq!(calculate_workout_calories(70.0, 30.0, "running_moderate"), 280);
        // 3.5 * 82 * 0.75 = 215.25
        assert_eq!(calculate_workout_calories(82.0, 45.0, "walking"), 215);
    }

    #[test]
    fn test_unknown_workout_burns_nothing() {
        assert_eq!(calculate_workout_calories(70.0, 30.0, "underwater_chess"), 0);
        assert_eq!(calculate_workout_calories(250.0, 600.0, "RUNNING_MODERATE"), 0);
    }

    #[test]
    fn test_calories_per_hour() {
        assert_eq!(calories_per_hour(70.0, "boxing"), 630);
        assert_eq!(calories_per_hour(70.0, "nope"), 0);
    }

    #[test]
    fn test_sex_from_str() {
        assert_eq!(Sex::from_str("Female"), Some(Sex::Female));
        assert_eq!(Sex::from_str("m"), Some(Sex::Male));
        assert_eq!(Sex::from_str("other"), None);
    }
}
