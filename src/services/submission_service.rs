use crate::dto::quiz_dto::{SubmitQuizRequest, SubmitQuizResponse};
use crate::error::{conflict_on_unique, Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::quiz::Quiz;
use crate::models::submission::{QuizSubmission, SubmittedAnswer};
use crate::services::grading_service::GradingService;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct SubmissionService {
    pool: PgPool,
}

impl SubmissionService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grades and records a learner's one attempt at a quiz.
    ///
    /// The attempt is written in a single insert; the unique index on
    /// (user_id, quiz_id) turns a second attempt into a conflict without
    /// ever creating a row, so there is no window where two attempts both
    /// pass a lookup check.
    pub async fn submit(
        &self,
        actor: &AuthUser,
        quiz_id: Uuid,
        payload: &SubmitQuizRequest,
    ) -> Result<SubmitQuizResponse> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(quiz_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;

        let questions = sqlx::query_as::<_, crate::models::question::Question>(
            "SELECT * FROM questions WHERE quiz_id = $1 ORDER BY position, created_at",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        // Normalize: drop answers that reference nothing in this quiz.
        let answers: Vec<SubmittedAnswer> = payload
            .answers
            .iter()
            .filter(|a| questions.iter().any(|q| q.id == a.question_id))
            .cloned()
            .collect();

        let outcome =
            GradingService::grade_submission(&questions, &answers, quiz.passing_score_percentage);

        let submission = sqlx::query_as::<_, QuizSubmission>(
            r#"
            INSERT INTO quiz_submissions
                (user_id, quiz_id, course_id, lesson_id, answers, score,
                 total_possible_points, percentage, is_passed, per_question)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(actor.id)
        .bind(quiz_id)
        .bind(quiz.course_id)
        .bind(quiz.lesson_id)
        .bind(Json(&answers))
        .bind(outcome.score)
        .bind(outcome.total_possible_points)
        .bind(outcome.percentage)
        .bind(outcome.is_passed)
        .bind(Json(&outcome.per_question))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You have already submitted this quiz"))?;

        tracing::info!(
            submission_id = %submission.id,
            user_id = %actor.id,
            %quiz_id,
            score = submission.score,
            is_passed = submission.is_passed,
            "graded quiz submission"
        );

        Ok(SubmitQuizResponse {
            submission_id: submission.id,
            score: submission.score,
            total_questions: questions.len(),
            percentage_score: submission.percentage,
            is_passed: submission.is_passed,
        })
    }

    /// Full graded record, visible to the submitter, the course instructor,
    /// and admins.
    pub async fn get_result(
        &self,
        quiz_id: Uuid,
        submission_id: Uuid,
        actor: &AuthUser,
    ) -> Result<QuizSubmission> {
        let submission = sqlx::query_as::<_, QuizSubmission>(
            "SELECT * FROM quiz_submissions WHERE id = $1 AND quiz_id = $2",
        )
        .bind(submission_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Submission not found".to_string()))?;

        if submission.user_id == actor.id || actor.is_admin() {
            return Ok(submission);
        }

        let instructor_id: Uuid =
            sqlx::query_scalar("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(submission.course_id)
                .fetch_one(&self.pool)
                .await?;
        if instructor_id != actor.id {
            return Err(Error::Forbidden(
                "You cannot view this submission".to_string(),
            ));
        }
        Ok(submission)
    }
}
