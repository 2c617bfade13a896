//! Meal model
//!
//! A logged meal with its estimated energy and nutrient content. Meals are
//! immutable once created.

use std::collections::BTreeMap;

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use super::{local_timestamp, validate_timestamp};

/// Meal slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }
}

/// Macronutrients in grams. Absent fields read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Macros {
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

/// Free-form micronutrients, e.g. `"Fiber" -> "5g"`
pub type Micros = BTreeMap<String, String>;

/// A logged meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: i64,
    pub user_id: String,
    /// ISO-8601 timestamp; its first ten characters are the calendar day
    pub timestamp: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub calories: f64,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub micros: Micros,
    pub meal_type: MealType,
}

/// Data for logging a new meal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealCreate {
    /// Defaults to now, local time
    pub timestamp: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub calories: f64,
    #[serde(default)]
    pub macros: Macros,
    #[serde(default)]
    pub micros: Micros,
    #[serde(default)]
    pub meal_type: MealType,
}

impl MealCreate {
    /// Reject values the store would refuse
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Meal name cannot be empty".to_string());
        }
        if let Some(timestamp) = &self.timestamp {
            validate_timestamp(timestamp)?;
        }
        if !self.calories.is_finite() || self.calories < 0.0 {
            return Err(format!("Calories must be a non-negative number, got {}", self.calories));
        }
        for (label, value) in [
            ("protein", self.macros.protein),
            ("carbs", self.macros.carbs),
            ("fat", self.macros.fat),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{} must be a non-negative number, got {}", label, value));
            }
        }
        Ok(())
    }
}

impl Meal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type: String = row.get("meal_type")?;
        let macros: String = row.get("macros")?;
        let micros: String = row.get("micros")?;

        // Rows written by hand may hold junk JSON; fall back to empty values
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            timestamp: row.get("timestamp")?,
            name: row.get("name")?,
            description: row.get("description")?,
            image_url: row.get("image_url")?,
            calories: row.get("calories")?,
            macros: serde_json::from_str(&macros).unwrap_or_default(),
            micros: serde_json::from_str(&micros).unwrap_or_default(),
            meal_type: MealType::from_str(&meal_type),
        })
    }

    /// Insert a meal for a user
    pub fn create(conn: &Connection, user_id: &str, data: &MealCreate) -> DbResult<Self> {
        let timestamp = data.timestamp.clone().unwrap_or_else(local_timestamp);
        let macros = serde_json::to_string(&data.macros)?;
        let micros = serde_json::to_string(&data.micros)?;

        conn.execute(
            r#"
            INSERT INTO meals
            (user_id, timestamp, name, description, image_url, calories, macros, micros, meal_type)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                user_id,
                timestamp,
                data.name,
                data.description,
                data.image_url,
                data.calories,
                macros,
                micros,
                data.meal_type.as_str(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("meal {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM meals WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(meal) => Ok(Some(meal)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All meals of a user, newest first
    pub fn list_for_user(conn: &Connection, user_id: &str) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM meals WHERE user_id = ?1 ORDER BY timestamp DESC, id DESC",
        )?;
        let meals = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(meals)
    }

    /// Delete all meals of a user, returning how many were removed
    pub fn delete_for_user(conn: &Connection, user_id: &str) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM meals WHERE user_id = ?1", [user_id])?)
    }
}
