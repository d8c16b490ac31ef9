use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
pub enum QuestionType {
    SingleChoice,
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
    Essay,
}

impl QuestionType {
    /// Whether correctness can be decided by exact comparison, without a
    /// human or AI pass.
    pub fn is_auto_graded(self) -> bool {
        matches!(
            self,
            QuestionType::SingleChoice | QuestionType::MultipleChoice | QuestionType::TrueFalse
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

/// Type-specific answer key: a bool for true_false, one or more accepted
/// strings for short_answer. Choice questions carry their key on the
/// `is_correct` option flags instead, and essays have no key at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorrectAnswer {
    Bool(bool),
    Text(String),
    Texts(Vec<String>),
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: Uuid,
    pub quiz_id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    /// Declared order matters: the first option flagged correct is the
    /// authoritative key for choice questions.
    pub options: Json<Vec<QuestionOption>>,
    pub correct_answer: Option<Json<CorrectAnswer>>,
    pub points: i32,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
