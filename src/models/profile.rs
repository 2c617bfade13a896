//! User profile model
//!
//! The onboarding inputs plus the BMR and daily calorie goal derived from them.
//! The derived values have no setters: every way of building or changing a
//! profile goes through [`UserProfile::new`] or [`UserProfile::apply`].

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use crate::energy::{calculate_bmr, calculate_goal_calories, calculate_tdee, ActivityLevel, Goal, Sex};

/// Everything the user enters during onboarding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    pub name: String,
    pub age: u32,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub sex: Sex,
    pub activity_level: ActivityLevel,
    #[serde(default)]
    pub goal: Goal,
}

/// Partial profile change; `None` leaves the field as is
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub sex: Option<Sex>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.weight_kg.is_none()
            && self.height_cm.is_none()
            && self.sex.is_none()
            && self.activity_level.is_none()
            && self.goal.is_none()
    }
}

/// An onboarded user's profile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(flatten)]
    input: ProfileInput,
    bmr: f64,
    daily_calorie_goal: i64,
}

impl UserProfile {
    /// Build a profile and derive its BMR and daily goal
    pub fn new(id: impl Into<String>, input: ProfileInput) -> Self {
        let bmr = calculate_bmr(input.weight_kg, input.height_cm, input.age, input.sex);
        let tdee = calculate_tdee(bmr, input.activity_level);
        let daily_calorie_goal = calculate_goal_calories(tdee, bmr, input.goal);

        Self {
            id: id.into(),
            input,
            bmr,
            daily_calorie_goal,
        }
    }

    /// Apply a partial update, re-deriving BMR and the daily goal
    pub fn apply(&self, update: &ProfileUpdate) -> Self {
        let mut input = self.input.clone();
        if let Some(ref name) = update.name {
            input.name = name.clone();
        }
        if let Some(age) = update.age {
            input.age = age;
        }
        if let Some(weight) = update.weight_kg {
            input.weight_kg = weight;
        }
        if let Some(height) = update.height_cm {
            input.height_cm = height;
        }
        if let Some(sex) = update.sex {
            input.sex = sex;
        }
        if let Some(level) = update.activity_level {
            input.activity_level = level;
        }
        if let Some(goal) = update.goal {
            input.goal = goal;
        }

        Self::new(self.id.clone(), input)
    }

    pub fn input(&self) -> &ProfileInput {
        &self.input
    }

    pub fn name(&self) -> &str {
        &self.input.name
    }

    pub fn weight_kg(&self) -> f64 {
        self.input.weight_kg
    }

    /// Basal Metabolic Rate, kcal/day
    pub fn bmr(&self) -> f64 {
        self.bmr
    }

    /// TDEE for the current activity level, kcal/day
    pub fn tdee(&self) -> i64 {
        calculate_tdee(self.bmr, self.input.activity_level)
    }

    /// Goal-adjusted daily target, kcal/day
    pub fn daily_calorie_goal(&self) -> i64 {
        self.daily_calorie_goal
    }

    /// Stored bmr/goal columns are ignored; they are re-derived from the inputs
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        let activity_level: String = row.get("activity_level")?;
        let goal: String = row.get("goal")?;

        let input = ProfileInput {
            name: row.get("name")?,
            age: row.get("age")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            sex: Sex::from_str(&sex).unwrap_or(Sex::Male),
            activity_level: ActivityLevel::from_str(&activity_level)
                .unwrap_or(ActivityLevel::Sedentary),
            goal: Goal::from_str(&goal),
        };

        Ok(Self::new(row.get::<_, String>("id")?, input))
    }

    /// Get a profile by user id
    pub fn get(conn: &Connection, id: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List every stored profile
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM profiles ORDER BY created_at, id")?;
        let profiles = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(profiles)
    }

    /// Insert a new profile row
    pub fn insert(&self, conn: &Connection) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO profiles
            (id, name, age, weight_kg, height_cm, sex, activity_level, goal,
             basal_metabolic_rate, daily_calorie_goal)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                self.id,
                self.input.name,
                self.input.age,
                self.input.weight_kg,
                self.input.height_cm,
                self.input.sex.as_str(),
                self.input.activity_level.as_str(),
                self.input.goal.as_str(),
                self.bmr,
                self.daily_calorie_goal,
            ],
        )?;

        Ok(())
    }

    /// Overwrite an existing profile row. Returns false if there was none.
    pub fn update(&self, conn: &Connection) -> DbResult<bool> {
        let rows = conn.execute(
            r#"
            UPDATE profiles
            SET name = ?2, age = ?3, weight_kg = ?4, height_cm = ?5, sex = ?6,
                activity_level = ?7, goal = ?8, basal_metabolic_rate = ?9,
                daily_calorie_goal = ?10, updated_at = datetime('now')
            WHERE id = ?1
            "#,
            params![
                self.id,
                self.input.name,
                self.input.age,
                self.input.weight_kg,
                self.input.height_cm,
                self.input.sex.as_str(),
                self.input.activity_level.as_str(),
                self.input.goal.as_str(),
                self.bmr,
                self.daily_calorie_goal,
            ],
        )?;

        Ok(rows > 0)
    }

    /// Read the derived columns as stored, for spotting rows written by older builds
    pub fn stored_derived(conn: &Connection, id: &str) -> DbResult<Option<(f64, i64)>> {
        let result = conn.query_row(
            "SELECT basal_metabolic_rate, daily_calorie_goal FROM profiles WHERE id = ?1",
            [id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        );
        match result {
            Ok(values) => Ok(Some(values)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a profile. Returns true if a row was removed.
    pub fn delete(conn: &Connection, id: &str) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM profiles WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
