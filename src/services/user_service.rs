use crate::dto::auth_dto::{LoginRequest, RegisterRequest};
use crate::dto::user_dto::UpdateProfileRequest;
use crate::error::{conflict_on_unique, Error, Result};
use crate::models::user::User;
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::generate_hex_token;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

const RESET_TOKEN_BYTES: usize = 20;
const RESET_TOKEN_LIFETIME_MINUTES: i64 = 60;

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a learner account. Every registration starts as a learner;
    /// instructor and admin roles are granted out of band.
    pub async fn register(&self, payload: &RegisterRequest) -> Result<User> {
        let password_hash = hash_password(&payload.password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;
        let verification_token = generate_hex_token(RESET_TOKEN_BYTES);

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, roles, verification_token)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.email.to_lowercase())
        .bind(&password_hash)
        .bind(vec!["learner".to_string()])
        .bind(&verification_token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An account with this email already exists"))?;

        tracing::info!(user_id = %user.id, "registered new user");
        Ok(user)
    }

    pub async fn login(&self, payload: &LoginRequest) -> Result<User> {
        let user = self
            .find_by_email(&payload.email.to_lowercase())
            .await?
            .ok_or_else(|| Error::Unauthorized("Invalid credentials".to_string()))?;

        let valid = verify_password(&payload.password, &user.password_hash)
            .map_err(|e| Error::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(Error::Unauthorized("Invalid credentials".to_string()));
        }
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| Error::NotFound("User not found".to_string()))?;
        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Allow-listed profile update. Incoming skills are merged into the
    /// existing set rather than replacing it.
    pub async fn update_profile(&self, id: Uuid, payload: &UpdateProfileRequest) -> Result<User> {
        let current = self.find_by_id(id).await?;

        let skills = match &payload.skills {
            Some(incoming) => {
                let mut merged = current.skills.clone();
                for skill in incoming {
                    let skill = skill.trim();
                    if !skill.is_empty() && !merged.iter().any(|s| s == skill) {
                        merged.push(skill.to_string());
                    }
                }
                merged
            }
            None => current.skills.clone(),
        };

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                bio = COALESCE($5, bio),
                location = COALESCE($6, location),
                profile_image = COALESCE($7, profile_image),
                skills = $8,
                experience = COALESCE($9, experience),
                education = COALESCE($10, education),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.first_name)
        .bind(&payload.last_name)
        .bind(payload.email.as_ref().map(|e| e.to_lowercase()))
        .bind(&payload.bio)
        .bind(&payload.location)
        .bind(&payload.profile_image)
        .bind(&skills)
        .bind(payload.experience.clone().map(Json))
        .bind(payload.education.clone().map(Json))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "An account with this email already exists"))?;

        Ok(user)
    }

    /// Stores a fresh reset token on the account and returns it for the
    /// mail step. Returns None when no account matches, so callers can
    /// respond identically either way and avoid leaking which emails exist.
    pub async fn create_reset_token(&self, email: &str) -> Result<Option<(User, String)>> {
        let token = generate_hex_token(RESET_TOKEN_BYTES);
        let expires = Utc::now() + Duration::minutes(RESET_TOKEN_LIFETIME_MINUTES);

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET reset_password_token = $2, reset_password_expires = $3, updated_at = NOW()
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(email.to_lowercase())
        .bind(&token)
        .bind(expires)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|u| (u, token)))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<User> {
        let password_hash = hash_password(new_password)
            .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))?;

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires = NULL,
                updated_at = NOW()
            WHERE reset_password_token = $1 AND reset_password_expires > NOW()
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(&password_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::BadRequest("Invalid or expired reset token".to_string()))?;

        tracing::info!(user_id = %user.id, "password reset completed");
        Ok(user)
    }

    /// Issues a new verification token for an account that has not verified
    /// its email yet.
    pub async fn create_verification_token(&self, id: Uuid) -> Result<(User, String)> {
        let user = self.find_by_id(id).await?;
        if user.is_verified {
            return Err(Error::BadRequest("Email is already verified".to_string()));
        }

        let token = generate_hex_token(RESET_TOKEN_BYTES);
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET verification_token = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&token)
        .fetch_one(&self.pool)
        .await?;

        Ok((user, token))
    }

    pub async fn verify_email(&self, token: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_verified = TRUE, verification_token = NULL, updated_at = NOW()
            WHERE verification_token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::BadRequest("Invalid verification token".to_string()))?;

        tracing::info!(user_id = %user.id, "email verified");
        Ok(user)
    }
}
