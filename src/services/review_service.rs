use crate::dto::course_dto::{CreateReviewRequest, ReviewWithAuthor};
use crate::error::{Error, Result};
use crate::models::review::Review;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ReviewService {
    pool: PgPool,
}

impl ReviewService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One review per user per course. Reviewing again overwrites the
    /// earlier rating and comment, then the course average is recomputed
    /// from scratch.
    pub async fn upsert(
        &self,
        user_id: Uuid,
        course_id: Uuid,
        payload: &CreateReviewRequest,
    ) -> Result<Review> {
        let enrolled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE user_id = $1 AND course_id = $2)",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;
        if !enrolled {
            return Err(Error::Forbidden(
                "Enroll in the course before reviewing it".to_string(),
            ));
        }

        // Upsert and average recompute commit together, so the stored
        // average always reflects the review rows.
        let mut tx = self.pool.begin().await?;
        let review = sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (user_id, course_id, rating, comment)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, course_id) DO UPDATE
                SET rating = EXCLUDED.rating,
                    comment = EXCLUDED.comment,
                    updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .bind(payload.rating)
        .bind(&payload.comment)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE courses
            SET average_rating = (
                SELECT AVG(rating)::double precision FROM reviews WHERE course_id = $1
            )
            WHERE id = $1
            "#,
        )
        .bind(course_id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(review)
    }

    pub async fn list_for_course(&self, course_id: Uuid) -> Result<Vec<ReviewWithAuthor>> {
        let reviews = sqlx::query_as::<_, ReviewWithAuthor>(
            r#"
            SELECT r.id, r.user_id, r.rating, r.comment,
                   u.first_name, u.last_name, u.profile_image,
                   r.created_at, r.updated_at
            FROM reviews r
            JOIN users u ON u.id = r.user_id
            WHERE r.course_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(reviews)
    }
}
