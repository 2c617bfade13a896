//! Calorie Tracker MCP Server Implementation
//!
//! Exposes the tracker tools over MCP.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::Micros;
use crate::state::{SqliteStore, Tracker};
use crate::tools::status::StatusTracker;
use crate::tools::{account, energy, logging, summary};

/// Calorie Tracker MCP Service
#[derive(Clone)]
pub struct CalorieTrackerService {
    status_tracker: Arc<tokio::sync::Mutex<StatusTracker>>,
    database: Database,
    tracker: Arc<Mutex<Tracker<SqliteStore>>>,
    tool_router: ToolRouter<CalorieTrackerService>,
}

impl CalorieTrackerService {
    pub fn new(database_path: PathBuf, database: Database) -> Self {
        let tracker = Tracker::new(SqliteStore::new(database.clone()));
        Self {
            status_tracker: Arc::new(tokio::sync::Mutex::new(StatusTracker::new(database_path))),
            database,
            tracker: Arc::new(Mutex::new(tracker)),
            tool_router: Self::tool_router(),
        }
    }

    /// Sign in before serving, e.g. from configuration
    pub fn sign_in_on_startup(&self, user_id: &str) -> Result<bool, String> {
        let mut tracker = self.tracker.lock().map_err(|_| "Tracker state poisoned".to_string())?;
        let account = tracker.sign_in(user_id, None).map_err(|e| e.to_string())?;
        Ok(account.is_onboarded())
    }

    fn tracker(&self) -> Result<MutexGuard<'_, Tracker<SqliteStore>>, McpError> {
        self.tracker
            .lock()
            .map_err(|_| McpError::internal_error("Tracker state poisoned", None))
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Account Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SignInParams {
    /// Opaque user id from the identity provider
    pub user_id: String,
    /// Optional e-mail, kept for display
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CompleteOnboardingParams {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Weight in kilograms
    pub weight_kg: f64,
    /// Height in centimeters
    pub height_cm: f64,
    /// male or female
    pub sex: String,
    /// sedentary, light, moderate or active
    pub activity_level: String,
    /// loss, maintain or gain (default maintain)
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateProfileParams {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

// ============================================================================
// Energy Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalculateEnergyParams {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    /// male or female
    pub sex: String,
    /// sedentary, light, moderate or active
    pub activity_level: String,
    /// loss, maintain or gain (default maintain)
    pub goal: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListWorkoutTypesParams {
    /// Weight in kg; when given, each type includes its kcal per hour
    pub weight_kg: Option<f64>,
}

// ============================================================================
// Logging Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogMealParams {
    pub name: String,
    /// Total kcal
    pub calories: f64,
    /// Grams of protein
    #[serde(default)]
    pub protein: f64,
    /// Grams of carbohydrate
    #[serde(default)]
    pub carbs: f64,
    /// Grams of fat
    #[serde(default)]
    pub fat: f64,
    /// breakfast, lunch, dinner or snack (default snack)
    pub meal_type: Option<String>,
    pub description: Option<String>,
    /// Micronutrients, e.g. {"Fiber": "5g"}
    pub micros: Option<Micros>,
    /// ISO-8601 timestamp (default now)
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogAnalyzedMealParams {
    /// JSON answer of the photo analysis, unchanged
    pub analysis_json: String,
    /// breakfast, lunch, dinner or snack (default lunch)
    pub meal_type: Option<String>,
    /// Where the photo is stored
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogWorkoutParams {
    /// Workout type id from list_workout_types
    pub workout_type: String,
    /// Duration in minutes
    pub duration_minutes: f64,
    /// Known burn in kcal; estimated from the catalog when omitted
    pub calories_burned: Option<f64>,
    /// ISO-8601 timestamp (default now)
    pub timestamp: Option<String>,
}

// ============================================================================
// Summary Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDailyStatsParams {
    /// Date in ISO format: YYYY-MM-DD (default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetHistoryParams {
    /// Last day of the window, YYYY-MM-DD (default today)
    pub end_date: Option<String>,
    /// Number of days (default 7)
    #[serde(default = "default_history_days")]
    pub days: u32,
}

fn default_history_days() -> u32 { 7 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ResetDataParams {
    /// Must be true; deletes all meals and workouts of the user
    #[serde(default)]
    pub confirm: bool,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl CalorieTrackerService {
    // --- Status ---

    #[tool(description = "Get the current status of the service including build info, database status, and process information")]
    async fn tracker_status(&self) -> Result<CallToolResult, McpError> {
        let signed_in_user = {
            let tracker = self.tracker()?;
            tracker.account().map(|a| a.id.clone())
        };
        let status_tracker = self.status_tracker.lock().await;
        let status = status_tracker.get_status(&self.database, signed_in_user);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for tracking meals and workouts. Call this when starting a session.")]
    fn tracking_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::TRACKING_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(TRACKING_INSTRUCTIONS)]))
    }

    // --- Account ---

    #[tool(description = "Sign in as a user and load their profile, meals and workouts")]
    fn sign_in(&self, Parameters(p): Parameters<SignInParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = account::sign_in(&mut *tracker, &p.user_id, p.email.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Sign out and clear the loaded data")]
    fn sign_out(&self) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        json_result(&account::sign_out(&mut *tracker))
    }

    #[tool(description = "Get the signed-in user's profile with BMR, TDEE and daily calorie goal")]
    fn get_profile(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = account::get_profile(&*tracker).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Create the user's profile. BMR and daily calorie goal are computed from the inputs.")]
    fn complete_onboarding(&self, Parameters(p): Parameters<CompleteOnboardingParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = account::complete_onboarding(
            &mut *tracker,
            &p.name,
            p.age,
            p.weight_kg,
            p.height_cm,
            &p.sex,
            &p.activity_level,
            p.goal.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update profile fields. BMR and daily calorie goal are recomputed.")]
    fn update_profile(&self, Parameters(p): Parameters<UpdateProfileParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = account::update_profile(
            &mut *tracker,
            p.name.as_deref(),
            p.age,
            p.weight_kg,
            p.height_cm,
            p.sex.as_deref(),
            p.activity_level.as_deref(),
            p.goal.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Energy ---

    #[tool(description = "Calculate BMR (Mifflin-St Jeor), TDEE and goal calories without saving anything")]
    fn calculate_energy(&self, Parameters(p): Parameters<CalculateEnergyParams>) -> Result<CallToolResult, McpError> {
        let result = energy::calculate_energy(
            p.weight_kg,
            p.height_cm,
            p.age,
            &p.sex,
            &p.activity_level,
            p.goal.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List the workout types with their MET values")]
    fn list_workout_types(&self, Parameters(p): Parameters<ListWorkoutTypesParams>) -> Result<CallToolResult, McpError> {
        json_result(&energy::list_workout_types(p.weight_kg))
    }

    // --- Logging ---

    #[tool(description = "Log a meal with its calories and macros")]
    fn log_meal(&self, Parameters(p): Parameters<LogMealParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = logging::log_meal(
            &mut *tracker,
            &p.name,
            p.calories,
            p.protein,
            p.carbs,
            p.fat,
            p.meal_type.as_deref(),
            p.description.as_deref(),
            p.micros,
            p.timestamp.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a meal from the JSON answer of a meal photo analysis")]
    fn log_analyzed_meal(&self, Parameters(p): Parameters<LogAnalyzedMealParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = logging::log_analyzed_meal(
            &mut *tracker,
            &p.analysis_json,
            p.meal_type.as_deref(),
            p.image_url.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Log a workout. Calories are estimated from the user's weight and the workout MET unless given.")]
    fn log_workout(&self, Parameters(p): Parameters<LogWorkoutParams>) -> Result<CallToolResult, McpError> {
        let mut tracker = self.tracker()?;
        let result = logging::log_workout(
            &mut *tracker,
            &p.workout_type,
            p.duration_minutes,
            p.calories_burned,
            p.timestamp.as_deref(),
        ).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Summaries ---

    #[tool(description = "Get calories consumed, burned and net plus macro totals for a day, with progress against the goal")]
    fn get_daily_stats(&self, Parameters(p): Parameters<GetDailyStatsParams>) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = summary::get_daily_stats(&*tracker, p.date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get per-day totals for the last N days (default 7) with totals and averages")]
    fn get_history(&self, Parameters(p): Parameters<GetHistoryParams>) -> Result<CallToolResult, McpError> {
        let tracker = self.tracker()?;
        let result = summary::get_history(&*tracker, p.end_date.as_deref(), p.days)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete all meals and workouts of the signed-in user. Requires confirm=true.")]
    fn reset_data(&self, Parameters(p): Parameters<ResetDataParams>) -> Result<CallToolResult, McpError> {
        if !p.confirm {
            return Err(McpError::invalid_params("reset_data requires confirm=true", None));
        }
        let mut tracker = self.tracker()?;
        let result = summary::reset_data(&mut *tracker).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CalorieTrackerService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "calorie_tracker".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Calorie Tracker".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Calorie Tracker - meal and workout logging against a daily calorie goal. \
                 IMPORTANT: Call tracking_instructions first. \
                 Account: sign_in/sign_out/get_profile/complete_onboarding/update_profile. \
                 Energy: calculate_energy, list_workout_types. \
                 Logging: log_meal, log_analyzed_meal, log_workout. \
                 Summaries: get_daily_stats, get_history. \
                 Maintenance: tracker_status, reset_data (confirm=true)."
                    .into(),
            ),
        }
    }
}
