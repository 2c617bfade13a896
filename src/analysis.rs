//! Meal analysis payloads
//!
//! A vision service looks at a meal photo and answers with a best-effort JSON
//! estimate. This module turns that answer into a [`MealCreate`]. Talking to the
//! service itself is left to implementors of [`MealAnalyzer`].

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::models::{Macros, MealCreate, MealType, Micros};

pub const DEFAULT_MEAL_NAME: &str = "Meal";
pub const DEFAULT_DESCRIPTION: &str = "No description available";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The service looked at the image and found no food in it
    #[error("Image could not be read as food: {0}")]
    NotFood(String),

    #[error("Analysis response is not a JSON object: {0}")]
    Malformed(String),

    #[error("Analysis service failed: {0}")]
    Service(String),
}

/// A parsed estimate. Numbers the service left out or garbled are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MealAnalysis {
    pub name: String,
    pub description: String,
    pub calories: f64,
    pub macros: Macros,
    pub micros: Micros,
}

/// External image-to-nutrition estimator
#[async_trait]
pub trait MealAnalyzer: Send + Sync {
    async fn analyze(&self, image_base64: &str) -> Result<MealAnalysis, AnalysisError>;
}

/// Run `analyzer` on a photo and turn the estimate into a meal ready to log
pub async fn analyze_meal(
    analyzer: &dyn MealAnalyzer,
    image_base64: &str,
    meal_type: MealType,
    image_url: Option<String>,
) -> Result<MealCreate, AnalysisError> {
    if image_base64.trim().is_empty() {
        return Err(AnalysisError::Malformed("empty image".to_string()));
    }

    let analysis = analyzer.analyze(image_base64).await?;
    tracing::debug!(name = %analysis.name, calories = analysis.calories, "meal analyzed");
    Ok(analysis.into_meal_create(meal_type, image_url))
}

/// Lenient number: accepts numbers and numeric strings, everything else is 0.
/// Negative and non-finite values are clamped to 0.
fn number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n
    } else {
        0.0
    }
}

fn text(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => default.to_string(),
    }
}

impl MealAnalysis {
    /// Parse a service response body
    pub fn from_json(body: &str) -> Result<Self, AnalysisError> {
        let value: Value = serde_json::from_str(body.trim())
            .map_err(|e| AnalysisError::Malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self, AnalysisError> {
        let obj = value
            .as_object()
            .ok_or_else(|| AnalysisError::Malformed(format!("expected object, got {}", value)))?;

        if let Some(Value::String(error)) = obj.get("error") {
            if !error.trim().is_empty() {
                return Err(AnalysisError::NotFood(error.trim().to_string()));
            }
        }

        let macros = obj.get("macros");
        let macros = Macros {
            protein: number(macros.and_then(|m| m.get("protein"))),
            carbs: number(macros.and_then(|m| m.get("carbs"))),
            fat: number(macros.and_then(|m| m.get("fat"))),
        };

        let micros = match obj.get("micros") {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| {
                    let rendered = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), rendered)
                })
                .collect(),
            _ => Micros::new(),
        };

        Ok(Self {
            name: text(obj.get("name"), DEFAULT_MEAL_NAME),
            description: text(obj.get("description"), DEFAULT_DESCRIPTION),
            calories: number(obj.get("calories")),
            macros,
            micros,
        })
    }

    /// Turn the estimate into a loggable meal
    pub fn into_meal_create(self, meal_type: MealType, image_url: Option<String>) -> MealCreate {
        MealCreate {
            timestamp: None,
            name: self.name,
            description: self.description,
            image_url,
            calories: self.calories,
            macros: self.macros,
            micros: self.micros,
            meal_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers every image with a fixed JSON body
    struct FixedAnalyzer(&'static str);

    #[async_trait]
    impl MealAnalyzer for FixedAnalyzer {
        async fn analyze(&self, _image_base64: &str) -> Result<MealAnalysis, AnalysisError> {
            MealAnalysis::from_json(self.0)
        }
    }

    #[tokio::test]
    async fn test_analyze_meal_with_analyzer() {
        let analyzer = FixedAnalyzer(r#"{"name": "Toast", "calories": 180, "macros": {"carbs": 30}}"#);
        let meal = analyze_meal(&analyzer, "aGVsbG8=", MealType::Breakfast, Some("toast.jpg".to_string()))
            .await
            .unwrap();
        assert_eq!(meal.name, "Toast");
        assert_eq!(meal.calories, 180.0);
        assert_eq!(meal.macros.carbs, 30.0);
        assert_eq!(meal.meal_type, MealType::Breakfast);
        assert_eq!(meal.image_url.as_deref(), Some("toast.jpg"));
    }

    #[tokio::test]
    async fn test_analyze_meal_errors() {
        let analyzer = FixedAnalyzer(r#"{"error": "no food visible"}"#);
        assert!(matches!(
            analyze_meal(&analyzer, "aGVsbG8=", MealType::Snack, None).await,
            Err(AnalysisError::NotFood(_))
        ));
        assert!(matches!(
            analyze_meal(&analyzer, "  ", MealType::Snack, None).await,
            Err(AnalysisError::Malformed(_))
        ));
    }

    #[test]
    fn test_full_payload() {
        let body = r#"{
            "name": "Grilled chicken salad",
            "description": "150g chicken, 80g lettuce, 20g olive oil",
            "calories": 430,
            "macros": {"protein": 42.5, "carbs": 8, "fat": 24},
            "micros": {"Fiber": "3g", "Sodium": "320mg"}
        }"#;

        let analysis = MealAnalysis::from_json(body).unwrap();
        assert_eq!(analysis.name, "Grilled chicken salad");
        assert_eq!(analysis.calories, 430.0);
        assert_eq!(analysis.macros, Macros { protein: 42.5, carbs: 8.0, fat: 24.0 });
        assert_eq!(analysis.micros.get("Sodium").map(String::as_str), Some("320mg"));
    }

    #[test]
    fn test_missing_and_garbled_values_become_defaults() {
        let body = r#"{"calories": "not a number", "macros": {"protein": "12"}, "micros": {"Iron": 2, "Zinc": null}}"#;

        let analysis = MealAnalysis::from_json(body).unwrap();
        assert_eq!(analysis.name, DEFAULT_MEAL_NAME);
        assert_eq!(analysis.description, DEFAULT_DESCRIPTION);
        assert_eq!(analysis.calories, 0.0);
        assert_eq!(analysis.macros, Macros { protein: 12.0, carbs: 0.0, fat: 0.0 });
        assert_eq!(analysis.micros.get("Iron").map(String::as_str), Some("2"));
        assert!(!analysis.micros.contains_key("Zinc"));
    }

    #[test]
    fn test_negative_numbers_clamped() {
        let analysis = MealAnalysis::from_json(r#"{"calories": -50, "macros": {"fat": -1}}"#).unwrap();
        assert_eq!(analysis.calories, 0.0);
        assert_eq!(analysis.macros.fat, 0.0);
    }

    #[test]
    fn test_error_field_means_not_food() {
        let err = MealAnalysis::from_json(r#"{"error": "This is a picture of a cat"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::NotFood(ref msg) if msg.contains("cat")));

        // An empty error string is not an error
        assert!(MealAnalysis::from_json(r#"{"error": "", "calories": 10}"#).is_ok());
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(MealAnalysis::from_json("nope"), Err(AnalysisError::Malformed(_))));
        assert!(matches!(MealAnalysis::from_json("[1, 2]"), Err(AnalysisError::Malformed(_))));
    }

    #[test]
    fn test_into_meal_create_validates() {
        let create = MealAnalysis::from_json("{}")
            .unwrap()
            .into_meal_create(MealType::Lunch, Some("meals/abc.jpg".to_string()));
        assert_eq!(create.meal_type, MealType::Lunch);
        assert_eq!(create.image_url.as_deref(), Some("meals/abc.jpg"));
        assert!(create.validate().is_ok());
    }
}
