use crate::models::course::Course;
use crate::models::course_module::CourseModule;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourseRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourseRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct PaginatedCourses {
    #[serde(rename = "items")]
    pub courses: Vec<Course>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct InstructorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LessonSummary {
    pub id: Uuid,
    pub title: String,
    pub lesson_type: String,
    pub position: i32,
    pub is_free_preview: bool,
    pub duration_estimate: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct ModuleWithLessons {
    #[serde(flatten)]
    pub module: CourseModule,
    pub lessons: Vec<LessonSummary>,
}

#[derive(Debug, Serialize)]
pub struct CourseDetail {
    #[serde(flatten)]
    pub course: Course,
    pub instructor: Option<InstructorSummary>,
    pub modules: Vec<ModuleWithLessons>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,
    pub comment: Option<String>,
}

/// A review joined with just enough of its author to render it.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReviewWithAuthor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListCoursesQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub category: Option<String>,
    pub search: Option<String>,
}
