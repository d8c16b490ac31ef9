use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub module_id: Uuid,
    // Denormalized from the module for cheaper authorization lookups.
    pub course_id: Uuid,
    pub title: String,
    pub lesson_type: String,
    pub content: Option<JsonValue>,
    pub duration_estimate: Option<i32>,
    pub position: i32,
    pub is_free_preview: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
