use crate::dto::content_dto::{CreateLessonRequest, UpdateLessonRequest};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::lesson::Lesson;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonService {
    pool: PgPool,
}

impl LessonService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        module_id: Uuid,
        actor: &AuthUser,
        payload: &CreateLessonRequest,
    ) -> Result<Lesson> {
        let course_id: Uuid =
            sqlx::query_scalar("SELECT course_id FROM course_modules WHERE id = $1")
                .bind(module_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| Error::NotFound("Module not found".to_string()))?;
        self.assert_course_owner(course_id, actor).await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons
                (module_id, course_id, title, lesson_type, content,
                 duration_estimate, position, is_free_preview)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE(
                $7,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM lessons WHERE module_id = $1)
            ), COALESCE($8, FALSE))
            RETURNING *
            "#,
        )
        .bind(module_id)
        .bind(course_id)
        .bind(&payload.title)
        .bind(&payload.lesson_type)
        .bind(&payload.content)
        .bind(payload.duration_estimate)
        .bind(payload.position)
        .bind(payload.is_free_preview)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn find(&self, id: Uuid) -> Result<Lesson> {
        let lesson = sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;
        Ok(lesson)
    }

    /// Fetches a lesson with its content. Free previews are open to
    /// anyone; everything else needs an enrollment or course ownership.
    pub async fn get_for_viewer(&self, id: Uuid, viewer: Option<&AuthUser>) -> Result<Lesson> {
        let lesson = self.find(id).await?;
        if lesson.is_free_preview {
            return Ok(lesson);
        }

        let viewer = viewer.ok_or_else(|| {
            Error::Unauthorized("Sign in to access this lesson".to_string())
        })?;
        if viewer.is_admin() {
            return Ok(lesson);
        }

        let instructor_id: Uuid =
            sqlx::query_scalar("SELECT instructor_id FROM courses WHERE id = $1")
                .bind(lesson.course_id)
                .fetch_one(&self.pool)
                .await?;
        if instructor_id == viewer.id {
            return Ok(lesson);
        }

        let enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(viewer.id)
        .bind(lesson.course_id)
        .fetch_one(&self.pool)
        .await?;
        if !enrolled {
            return Err(Error::Forbidden(
                "Enroll in the course to access this lesson".to_string(),
            ));
        }
        Ok(lesson)
    }

    pub async fn list_for_module(&self, module_id: Uuid) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT * FROM lessons WHERE module_id = $1 ORDER BY position, created_at",
        )
        .bind(module_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthUser,
        payload: &UpdateLessonRequest,
    ) -> Result<Lesson> {
        let lesson = self.find(id).await?;
        self.assert_course_owner(lesson.course_id, actor).await?;

        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons SET
                title = COALESCE($2, title),
                lesson_type = COALESCE($3, lesson_type),
                content = COALESCE($4, content),
                duration_estimate = COALESCE($5, duration_estimate),
                position = COALESCE($6, position),
                is_free_preview = COALESCE($7, is_free_preview),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.lesson_type)
        .bind(&payload.content)
        .bind(payload.duration_estimate)
        .bind(payload.position)
        .bind(payload.is_free_preview)
        .fetch_one(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<()> {
        let lesson = self.find(id).await?;
        self.assert_course_owner(lesson.course_id, actor).await?;

        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
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
