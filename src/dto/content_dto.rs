use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateModuleRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// Appended after the last module when omitted.
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateModuleRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Lesson type is required"))]
    pub lesson_type: String,
    pub content: Option<JsonValue>,
    pub duration_estimate: Option<i32>,
    pub position: Option<i32>,
    pub is_free_preview: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub lesson_type: Option<String>,
    pub content: Option<JsonValue>,
    pub duration_estimate: Option<i32>,
    pub position: Option<i32>,
    pub is_free_preview: Option<bool>,
}
