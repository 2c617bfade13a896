//! Account and Profile MCP Tools
//!
//! Sign in/out, onboarding and profile changes.

use serde::Serialize;

use crate::energy::{ActivityLevel, Goal, Sex};
use crate::models::{ProfileInput, ProfileUpdate, UserProfile};
use crate::state::{Tracker, TrackerStore};

/// Response for sign_in and get_profile
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub user_id: String,
    pub email: Option<String>,
    pub is_onboarded: bool,
    pub profile: Option<ProfileDetail>,
    pub meals_loaded: usize,
    pub workouts_loaded: usize,
}

/// Profile with its derived energy numbers
#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub tdee: i64,
}

impl From<&UserProfile> for ProfileDetail {
    fn from(profile: &UserProfile) -> Self {
        Self {
            profile: profile.clone(),
            tdee: profile.tdee(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignOutResponse {
    pub success: bool,
    pub user_id: Option<String>,
}

fn account_response<S: TrackerStore>(tracker: &Tracker<S>) -> Result<AccountResponse, String> {
    let account = tracker.account().ok_or("No user is signed in")?;
    Ok(AccountResponse {
        user_id: account.id.clone(),
        email: account.email.clone(),
        is_onboarded: account.is_onboarded(),
        profile: account.profile.as_ref().map(ProfileDetail::from),
        meals_loaded: tracker.meals().len(),
        workouts_loaded: tracker.workouts().len(),
    })
}

fn parse_sex(sex: &str) -> Result<Sex, String> {
    Sex::from_str(sex).ok_or_else(|| format!("Invalid sex: '{}'. Valid values: male, female", sex))
}

fn parse_activity_level(level: &str) -> Result<ActivityLevel, String> {
    ActivityLevel::from_str(level).ok_or_else(|| {
        format!(
            "Invalid activity level: '{}'. Valid values: sedentary, light, moderate, active",
            level
        )
    })
}

pub fn sign_in<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    user_id: &str,
    email: Option<&str>,
) -> Result<AccountResponse, String> {
    tracker
        .sign_in(user_id, email.map(String::from))
        .map_err(|e| e.to_string())?;
    account_response(tracker)
}

pub fn sign_out<S: TrackerStore>(tracker: &mut Tracker<S>) -> SignOutResponse {
    let user_id = tracker.account().map(|a| a.id.clone());
    tracker.sign_out();
    SignOutResponse {
        success: true,
        user_id,
    }
}

pub fn get_profile<S: TrackerStore>(tracker: &Tracker<S>) -> Result<AccountResponse, String> {
    account_response(tracker)
}

#[allow(clippy::too_many_arguments)]
pub fn complete_onboarding<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    name: &str,
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    sex: &str,
    activity_level: &str,
    goal: Option<&str>,
) -> Result<ProfileDetail, String> {
    let input = ProfileInput {
        name: name.trim().to_string(),
        age,
        weight_kg,
        height_cm,
        sex: parse_sex(sex)?,
        activity_level: parse_activity_level(activity_level)?,
        goal: goal.map(Goal::from_str).unwrap_or_default(),
    };

    let profile = tracker.complete_onboarding(input).map_err(|e| e.to_string())?;
    Ok(ProfileDetail::from(profile))
}

#[allow(clippy::too_many_arguments)]
pub fn update_profile<S: TrackerStore>(
    tracker: &mut Tracker<S>,
    name: Option<&str>,
    age: Option<u32>,
    weight_kg: Option<f64>,
    height_cm: Option<f64>,
    sex: Option<&str>,
    activity_level: Option<&str>,
    goal: Option<&str>,
) -> Result<ProfileDetail, String> {
    let update = ProfileUpdate {
        name: name.map(|n| n.trim().to_string()),
        age,
        weight_kg,
        height_cm,
        sex: sex.map(parse_sex).transpose()?,
        activity_level: activity_level.map(parse_activity_level).transpose()?,
        goal: goal.map(Goal::from_str),
    };
    if update.is_empty() {
        return Err("Nothing to update".to_string());
    }

    let profile = tracker.update_profile(&update).map_err(|e| e.to_string())?;
    Ok(ProfileDetail::from(profile))
}
