use crate::dto::quiz_dto::{
    CreateQuestionRequest, CreateQuizRequest, QuestionView, QuizView, QuizWithQuestions,
    UpdateQuestionRequest, UpdateQuizRequest,
};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::question::{CorrectAnswer, Question, QuestionOption, QuestionType};
use crate::models::quiz::Quiz;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct QuizService {
    pool: PgPool,
}

impl QuizService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_for_course(
        &self,
        course_id: Uuid,
        actor: &AuthUser,
        payload: &CreateQuizRequest,
    ) -> Result<Quiz> {
        self.assert_course_owner(course_id, actor).await?;
        self.insert_quiz(course_id, None, payload).await
    }

    pub async fn create_for_lesson(
        &self,
        lesson_id: Uuid,
        actor: &AuthUser,
        payload: &CreateQuizRequest,
    ) -> Result<Quiz> {
        let course_id: Uuid = sqlx::query_scalar("SELECT course_id FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;
        self.assert_course_owner(course_id, actor).await?;
        self.insert_quiz(course_id, Some(lesson_id), payload).await
    }

    async fn insert_quiz(
        &self,
        course_id: Uuid,
        lesson_id: Option<Uuid>,
        payload: &CreateQuizRequest,
    ) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes
                (course_id, lesson_id, title, description,
                 time_limit_minutes, passing_score_percentage)
            VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6)
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(lesson_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.time_limit_minutes)
        .bind(payload.passing_score_percentage)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(quiz_id = %quiz.id, %course_id, "created quiz");
        Ok(quiz)
    }

    pub async fn find(&self, id: Uuid) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>("SELECT * FROM quizzes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Quiz not found".to_string()))?;
        Ok(quiz)
    }

    pub async fn questions(&self, quiz_id: Uuid) -> Result<Vec<Question>> {
        let questions = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE quiz_id = $1 ORDER BY position, created_at",
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    /// Learner-facing shape: option texts only, no correct flags, no answer
    /// keys.
    pub async fn get_view(&self, id: Uuid) -> Result<QuizView> {
        let quiz = self.find(id).await?;
        let questions = self.questions(id).await?;
        let question_views: Vec<QuestionView> = questions.iter().map(QuestionView::from).collect();
        let total_questions = question_views.len();
        Ok(QuizView {
            quiz,
            questions: question_views,
            total_questions,
        })
    }

    /// Authoring shape with answer keys, owner only.
    pub async fn get_with_questions(&self, id: Uuid, actor: &AuthUser) -> Result<QuizWithQuestions> {
        let quiz = self.find(id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;
        let questions = self.questions(id).await?;
        Ok(QuizWithQuestions { quiz, questions })
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthUser,
        payload: &UpdateQuizRequest,
    ) -> Result<Quiz> {
        let quiz = self.find(id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                time_limit_minutes = COALESCE($4, time_limit_minutes),
                passing_score_percentage = COALESCE($5, passing_score_percentage),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.time_limit_minutes)
        .bind(payload.passing_score_percentage)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<()> {
        let quiz = self.find(id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;

        sqlx::query("DELETE FROM quizzes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn add_question(
        &self,
        quiz_id: Uuid,
        actor: &AuthUser,
        payload: &CreateQuestionRequest,
    ) -> Result<Question> {
        let quiz = self.find(quiz_id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;
        validate_question_shape(payload.question_type, &payload.options, payload.correct_answer.as_ref())?;

        let correct_answer = payload.correct_answer.clone().map(Json);
        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions
                (quiz_id, text, question_type, options, correct_answer, points, position)
            VALUES ($1, $2, $3, $4, $5, COALESCE($6, 1),
                (SELECT COALESCE(MAX(position) + 1, 0) FROM questions WHERE quiz_id = $1))
            RETURNING *
            "#,
        )
        .bind(quiz_id)
        .bind(&payload.text)
        .bind(payload.question_type)
        .bind(Json(&payload.options))
        .bind(correct_answer)
        .bind(payload.points)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn update_question(
        &self,
        quiz_id: Uuid,
        question_id: Uuid,
        actor: &AuthUser,
        payload: &UpdateQuestionRequest,
    ) -> Result<Question> {
        let quiz = self.find(quiz_id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;

        let current = sqlx::query_as::<_, Question>(
            "SELECT * FROM questions WHERE id = $1 AND quiz_id = $2",
        )
        .bind(question_id)
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        let question_type = payload.question_type.unwrap_or(current.question_type);
        let options = payload.options.clone().unwrap_or_else(|| current.options.0.clone());
        let correct_answer = payload
            .correct_answer
            .clone()
            .or_else(|| current.correct_answer.as_ref().map(|j| j.0.clone()));
        validate_question_shape(question_type, &options, correct_answer.as_ref())?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions SET
                text = COALESCE($3, text),
                question_type = $4,
                options = $5,
                correct_answer = $6,
                points = COALESCE($7, points),
                updated_at = NOW()
            WHERE id = $1 AND quiz_id = $2
            RETURNING *
            "#,
        )
        .bind(question_id)
        .bind(quiz_id)
        .bind(&payload.text)
        .bind(question_type)
        .bind(Json(&options))
        .bind(correct_answer.map(Json))
        .bind(payload.points)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn delete_question(
        &self,
        quiz_id: Uuid,
        question_id: Uuid,
        actor: &AuthUser,
    ) -> Result<()> {
        let quiz = self.find(quiz_id).await?;
        self.assert_course_owner(quiz.course_id, actor).await?;

        let result = sqlx::query("DELETE FROM questions WHERE id = $1 AND quiz_id = $2")
            .bind(question_id)
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Question not found".to_string()));
        }
        Ok(())
    }

    async fn assert_course_owner(&self, course_id: Uuid, actor: &AuthUser) -> Result<()> {
        let instructor_id: Uuid =
            sqlx::query_scalar("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(course_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;
        if instructor_id != actor.id && !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only the course instructor can do this".to_string(),
            ));
        }
        Ok(())
    }
}

/// Authoring-time shape checks. The grading engine tolerates anything, so
/// malformed keys are rejected here instead.
fn validate_question_shape(
    question_type: QuestionType,
    options: &[QuestionOption],
    correct_answer: Option<&CorrectAnswer>,
) -> Result<()> {
    match question_type {
        QuestionType::SingleChoice | QuestionType::MultipleChoice => {
            if options.len() < 2 {
                return Err(Error::BadRequest(
                    "Choice questions need at least two options".to_string(),
                ));
            }
            if !options.iter().any(|o| o.is_correct) {
                return Err(Error::BadRequest(
                    "Choice questions need an option marked correct".to_string(),
                ));
            }
        }
        QuestionType::TrueFalse => match correct_answer {
            Some(CorrectAnswer::Bool(_)) => {}
            _ => {
                return Err(Error::BadRequest(
                    "True/false questions need a boolean answer key".to_string(),
                ))
            }
        },
        QuestionType::ShortAnswer | QuestionType::Essay => {}
    }
    Ok(())
}
