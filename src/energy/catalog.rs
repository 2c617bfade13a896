//! Activity and workout catalogs
//!
//! Static reference tables consumed by the energy formulas.

use serde::{Deserialize, Serialize};

/// Self-reported weekly activity, used to scale BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days a week
    Light,
    /// Moderate exercise 3-5 days a week
    Moderate,
    /// Hard exercise 6-7 days a week
    Active,
}

impl ActivityLevel {
    /// All levels in ascending multiplier order
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "light",
            ActivityLevel::Moderate => "moderate",
            ActivityLevel::Active => "active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "light" => Some(ActivityLevel::Light),
            "moderate" => Some(ActivityLevel::Moderate),
            "active" => Some(ActivityLevel::Active),
            _ => None,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
        }
    }
}

/// A loggable workout with its MET coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WorkoutType {
    pub id: &'static str,
    pub label: &'static str,
    pub mets: f64,
}

/// Known workout types, in display order
pub const WORKOUT_TYPES: &[WorkoutType] = &[
    WorkoutType { id: "walking", label: "Walking", mets: 3.5 },
    WorkoutType { id: "running_moderate", label: "Running", mets: 8.0 },
    WorkoutType { id: "cycling", label: "Cycling", mets: 7.5 },
    WorkoutType { id: "weightlifting", label: "Weightlifting", mets: 4.5 },
    WorkoutType { id: "swimming", label: "Swimming", mets: 7.0 },
    WorkoutType { id: "yoga", label: "Yoga / Pilates", mets: 3.0 },
    WorkoutType { id: "hiit", label: "HIIT Training", mets: 8.0 },
    WorkoutType { id: "boxing", label: "Boxing / Martial Arts", mets: 9.0 },
    WorkoutType { id: "dancing", label: "Dancing / Zumba", mets: 5.0 },
    WorkoutType { id: "sports", label: "Football / Team Sports", mets: 7.0 },
    WorkoutType { id: "crossfit", label: "Crossfit", mets: 8.5 },
    WorkoutType { id: "cleaning", label: "Cleaning / Chores", mets: 3.0 },
    WorkoutType { id: "hiking", label: "Hiking", mets: 6.0 },
    WorkoutType { id: "tennis", label: "Tennis / Padel", mets: 7.0 },
    WorkoutType { id: "basketball", label: "Basketball", mets: 8.0 },
];

/// Look up a workout type by its id (exact match)
pub fn find_workout_type(id: &str) -> Option<&'static WorkoutType> {
    WORKOUT_TYPES.iter().find(|w| w.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_activity_level_round_trip_names() {
        for level in ActivityLevel::ALL {
            assert_eq!(ActivityLevel::from_str(level.as_str()), Some(level));
        }
        assert_eq!(ActivityLevel::from_str(" Moderate "), Some(ActivityLevel::Moderate));
        assert_eq!(ActivityLevel::from_str("extreme"), None);
    }

    #[test]
    fn test_multipliers_ascend() {
        let multipliers: Vec<f64> = ActivityLevel::ALL.iter().map(|l| l.multiplier()).collect();
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_workout_ids_are_unique() {
        let ids: HashSet<_> = WORKOUT_TYPES.iter().map(|w| w.id).collect();
        assert_eq!(ids.len(), WORKOUT_TYPES.len());
    }

    #[test]
    fn test_find_workout_type() {
        let boxing = find_workout_type("boxing").unwrap();
        assert_eq!(boxing.mets, 9.0);
        assert!(find_workout_type("Boxing").is_none());
        assert!(find_workout_type("").is_none());
    }
}
