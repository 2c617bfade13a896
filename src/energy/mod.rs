//! Energy balance module
//!
//! BMR/TDEE/goal formulas and the static catalogs they read.

pub mod catalog;
pub mod formulas;

pub use catalog::{find_workout_type, ActivityLevel, WorkoutType, WORKOUT_TYPES};
pub use formulas::{
    calculate_bmr, calculate_goal_calories, calculate_tdee, calculate_workout_calories,
    calories_per_hour, Goal, Sex, GOAL_ADJUSTMENT,
};
