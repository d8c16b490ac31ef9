use crate::models::question::{CorrectAnswer, Question, QuestionOption, QuestionType};
use crate::models::quiz::Quiz;
use crate::models::submission::SubmittedAnswer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuizRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "Time limit cannot be negative"))]
    pub time_limit_minutes: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score_percentage: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuizRequest {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub time_limit_minutes: Option<i32>,
    #[validate(range(min = 0.0, max = 100.0))]
    pub passing_score_percentage: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, message = "Question text is required"))]
    pub text: String,
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<QuestionOption>,
    pub correct_answer: Option<CorrectAnswer>,
    #[validate(range(min = 1, message = "Points must be positive"))]
    pub points: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1))]
    pub text: Option<String>,
    pub question_type: Option<QuestionType>,
    pub options: Option<Vec<QuestionOption>>,
    pub correct_answer: Option<CorrectAnswer>,
    #[validate(range(min = 1))]
    pub points: Option<i32>,
}

/// A question as shown to a learner taking the quiz: option texts only,
/// correct flags and answer keys stripped.
#[derive(Debug, Serialize)]
pub struct QuestionView {
    pub id: Uuid,
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<String>,
    pub points: i32,
    pub position: i32,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            question_type: q.question_type,
            options: q.options.iter().map(|o| o.text.clone()).collect(),
            points: q.points,
            position: q.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct QuizView {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<QuestionView>,
    pub total_questions: usize,
}

/// Instructor-facing shape, answer keys included.
#[derive(Debug, Serialize)]
pub struct QuizWithQuestions {
    #[serde(flatten)]
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitQuizRequest {
    pub answers: Vec<SubmittedAnswer>,
}

#[derive(Debug, Serialize)]
pub struct SubmitQuizResponse {
    pub submission_id: Uuid,
    pub score: i32,
    pub total_questions: usize,
    pub percentage_score: f64,
    pub is_passed: bool,
}
