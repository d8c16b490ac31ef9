use crate::dto::course_dto::{
    CourseDetail, CreateCourseRequest, InstructorSummary, LessonSummary, ListCoursesQuery,
    ModuleWithLessons, PaginatedCourses, UpdateCourseRequest,
};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthUser;
use crate::models::course::Course;
use crate::models::course_module::CourseModule;
use crate::models::lesson::Lesson;
use sqlx::PgPool;
use uuid::Uuid;

const DEFAULT_PER_PAGE: i64 = 10;
const MAX_PER_PAGE: i64 = 50;

#[derive(Clone)]
pub struct CourseService {
    pool: PgPool,
}

impl CourseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Public catalogue: published courses only, newest first, with optional
    /// category and free-text filters.
    pub async fn list(&self, query: &ListCoursesQuery) -> Result<PaginatedCourses> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        let offset = (page - 1) * per_page;

        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT * FROM courses
            WHERE is_published = TRUE
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(&query.category)
        .bind(&query.search)
        .bind(per_page)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM courses
            WHERE is_published = TRUE
              AND ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL
                   OR title ILIKE '%' || $2 || '%'
                   OR description ILIKE '%' || $2 || '%')
            "#,
        )
        .bind(&query.category)
        .bind(&query.search)
        .fetch_one(&self.pool)
        .await?;

        Ok(PaginatedCourses {
            courses,
            total,
            page,
            per_page,
            total_pages: (total + per_page - 1) / per_page,
        })
    }

    pub async fn find(&self, id: Uuid) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;
        Ok(course)
    }

    /// Full course page: instructor summary plus the module tree with lesson
    /// summaries. Unpublished courses are invisible to everyone but their
    /// owner, indistinguishable from a missing id.
    pub async fn get_detail(&self, id: Uuid, viewer: Option<&AuthUser>) -> Result<CourseDetail> {
        let course = self.find(id).await?;
        if !course.is_published {
            let allowed = viewer
                .map(|v| v.id == course.instructor_id || v.is_admin())
                .unwrap_or(false);
            if !allowed {
                return Err(Error::NotFound("Course not found".to_string()));
            }
        }

        let instructor = sqlx::query_as::<_, InstructorSummary>(
            "SELECT id, first_name, last_name, profile_image FROM users WHERE id = $1",
        )
        .bind(course.instructor_id)
        .fetch_optional(&self.pool)
        .await?;

        let modules = sqlx::query_as::<_, CourseModule>(
            "SELECT * FROM course_modules WHERE course_id = $1 ORDER BY position, created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let lessons = sqlx::query_as::<_, Lesson>(
            "SELECT * FROM lessons WHERE course_id = $1 ORDER BY position, created_at",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let modules = modules
            .into_iter()
            .map(|module| {
                let lessons = lessons
                    .iter()
                    .filter(|l| l.module_id == module.id)
                    .map(|l| LessonSummary {
                        id: l.id,
                        title: l.title.clone(),
                        lesson_type: l.lesson_type.clone(),
                        position: l.position,
                        is_free_preview: l.is_free_preview,
                        duration_estimate: l.duration_estimate,
                    })
                    .collect();
                ModuleWithLessons { module, lessons }
            })
            .collect();

        Ok(CourseDetail {
            course,
            instructor,
            modules,
        })
    }

    pub async fn create(&self, actor: &AuthUser, payload: &CreateCourseRequest) -> Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, instructor_id, category, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(actor.id)
        .bind(&payload.category)
        .bind(payload.price)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(course_id = %course.id, instructor_id = %actor.id, "created course");
        Ok(course)
    }

    pub async fn update(
        &self,
        id: Uuid,
        actor: &AuthUser,
        payload: &UpdateCourseRequest,
    ) -> Result<Course> {
        let course = self.find(id).await?;
        assert_owner(&course, actor)?;

        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                price = COALESCE($5, price),
                is_published = COALESCE($6, is_published),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.title)
        .bind(&payload.description)
        .bind(&payload.category)
        .bind(payload.price)
        .bind(payload.is_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(course)
    }

    pub async fn delete(&self, id: Uuid, actor: &AuthUser) -> Result<()> {
        let course = self.find(id).await?;
        assert_owner(&course, actor)?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(course_id = %id, "deleted course");
        Ok(())
    }
}

pub fn assert_owner(course: &Course, actor: &AuthUser) -> Result<()> {
    if course.instructor_id != actor.id && !actor.is_admin() {
        return Err(Error::Forbidden(
            "Only the course instructor can do this".to_string(),
        ));
    }
    Ok(())
}
