use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub instructor_id: Uuid,
    pub category: String,
    pub price: f64,
    pub is_published: bool,
    pub average_rating: Option<f64>,
    pub total_enrollments: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
