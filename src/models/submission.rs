use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A learner's answer as it arrives on the wire. The shape depends on the
/// referenced question's type; anything unrecognized falls through to
/// `Other` and simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Bool(bool),
    Text(String),
    Texts(Vec<String>),
    Other(JsonValue),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: Uuid,
    pub answer: AnswerValue,
}

/// Outcome for one question, kept alongside the submission so results can
/// be shown without re-grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: Uuid,
    pub awarded_points: i32,
    pub max_points: i32,
    pub is_correct: bool,
    pub auto_graded: bool,
}

/// One learner's one-time attempt at a quiz. Created exactly once by the
/// submission flow and never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizSubmission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub quiz_id: Uuid,
    pub course_id: Uuid,
    pub lesson_id: Option<Uuid>,
    pub answers: Json<Vec<SubmittedAnswer>>,
    pub score: i32,
    pub total_possible_points: i32,
    pub percentage: f64,
    pub is_passed: bool,
    pub per_question: Json<Vec<QuestionResult>>,
    pub submitted_at: DateTime<Utc>,
}
