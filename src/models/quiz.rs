use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quiz {
    pub id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    /// Minutes, 0 = unlimited. Stored and echoed to clients, never enforced
    /// by the grading path.
    pub time_limit_minutes: i32,
    /// Absent means every submission passes.
    pub passing_score_percentage: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
