use crate::error::{conflict_on_unique, Error, Result};
use crate::models::course::Course;
use crate::models::enrollment::Enrollment;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct EnrollmentService {
    pool: PgPool,
}

impl EnrollmentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Enrolls a user into a published course. The unique index on
    /// (user_id, course_id) makes re-enrolling a conflict rather than a
    /// second row.
    pub async fn enroll(&self, user_id: Uuid, course_id: Uuid) -> Result<Enrollment> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("Course not found".to_string()))?;
        if !course.is_published {
            return Err(Error::BadRequest(
                "Cannot enroll in an unpublished course".to_string(),
            ));
        }

        // The row and the course counter move together or not at all.
        let mut tx = self.pool.begin().await?;
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| conflict_on_unique(e, "Already enrolled in this course"))?;

        sqlx::query("UPDATE courses SET total_enrollments = total_enrollments + 1 WHERE id = $1")
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(%user_id, %course_id, "enrolled user");
        Ok(enrollment)
    }

    pub async fn list_courses_for_user(&self, user_id: Uuid) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT c.* FROM courses c
            JOIN enrollments e ON e.course_id = c.id
            WHERE e.user_id = $1
            ORDER BY e.enrolled_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(courses)
    }

    pub async fn is_enrolled(&self, user_id: Uuid, course_id: Uuid) -> Result<bool> {
        let enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(enrolled)
    }
}
