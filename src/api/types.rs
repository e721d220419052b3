//! Form and query payloads.
//!
//! Every field defaults to empty so a missing field reaches validation instead of failing
//! extraction.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub username: String,
    pub first: String,
    pub last: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutForm {
    pub title: String,
    pub activity_type: String,
    pub duration_minutes: String,
    pub intensity: String,
    pub notes: String,
    pub performed_at: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementForm {
    pub title: String,
    pub description: String,
    pub category: String,
    pub metric_value: String,
    pub metric_unit: String,
    pub achieved_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub search_text: String,
}

/// Query string of `GET /api/workouts`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkoutQuery {
    pub search: String,
    pub min_duration: String,
    pub max_duration: String,
    pub intensity: String,
    pub sort: String,
    pub order: String,
}
