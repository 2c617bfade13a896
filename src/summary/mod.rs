//! Summary module
//!
//! Daily aggregation of meals and workouts, plus goal progress views.

pub mod daily;
pub mod progress;

pub use daily::{day_key, get_daily_stats, history, DailyStats};
pub use progress::{DayProgress, MacroTargets, WeeklySummary};
