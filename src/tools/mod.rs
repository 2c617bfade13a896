//! Calorie Tracker Tools module
//!
//! MCP tool implementations. Each function returns a serializable response or
//! a message suitable for showing to the caller.

pub mod account;
pub mod energy;
pub mod logging;
pub mod status;
pub mod summary;

use chrono::{Local, NaiveDate};

/// Parse `YYYY-MM-DD`, defaulting to today in local time
pub(crate) fn parse_date(date: Option<&str>) -> Result<NaiveDate, String> {
    match date.map(str::trim).filter(|d| !d.is_empty()) {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", d)),
        None => Ok(Local::now().date_naive()),
    }
}
