use crate::dto::content_dto::{CreateModuleRequest, UpdateModuleRequest};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::course_module::CourseModule;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ModuleService {
    pool: PgPool,
}

impl ModuleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        course_id: Uuid,
        actor: &AuthUser,
        payload: &CreateModuleRequest,
    ) -> Result<CourseModule> {
        self.assert_course_owner(course_id, actor).await?;

        let module = sqlx::query_as::<_, CourseModule>(
            r#"
            INSERT INTO course_modules (course_id, title, description, position)
            VALUES ($1, $2, $3, COALESCE(
                $4,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM course_modules WHERE course_id = $1)
            ))
            RETURNING *
            "#,
        )
        .bind(course_id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(module)
    }

    pub async fn find(&self, id: Uuid) -> Result<CourseModule> {
        let module = sqlx::query_as::<_, CourseModule>("SELECT * FROM course_modules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Module not found".to_string()))?;
        Ok(module)
    }

    pub async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<CourseModule>> {
        let modules = sqlx::query_as::<_, CourseModule>(
            "SELECT * FROM course_modules WHERE course_id = $1 ORDER BY position, created_at",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(modules)
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthUser,
        payload: &UpdateModuleRequest,
    ) -> Result<CourseModule> {
        let module = self.find(id).await?;
        self.assert_course_owner(module.course_id, actor).await?;

        let module = sqlx::query_as::<_, CourseModule>(
            r#"
            UPDATE course_modules SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                position = COALESCE($4, position),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(payload.position)
        .fetch_one(&self.pool)
        .await?;

        Ok(module)
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<()> {
        let module = self.find(id).await?;
        self.assert_course_owner(module.course_id, actor).await?;

        sqlx::query("DELETE FROM course_modules WHERE id = $1")
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
