use crate::error::Error;
use crate::models::user::User;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const TOKEN_LIFETIME_HOURS: i64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

pub fn issue_jwt(user: &User) -> crate::error::Result<String> {
    let config = crate::config::get_config();
    let exp = (Utc::now() + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        roles: user.roles.clone(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

pub fn decode_claims(token: &str) -> Result<Claims, Error> {
    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid_token".to_string()))
}

/// The authenticated caller, decoded from the bearer token per request.
/// Identity travels with the request instead of living in ambient session
/// state, so handlers declare exactly what they need.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role("admin")
    }

    pub fn is_instructor(&self) -> bool {
        self.has_role("instructor") || self.is_admin()
    }
}

impl TryFrom<Claims> for AuthUser {
    type Error = Error;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub)
            .map_err(|_| Error::Unauthorized("invalid_token".to_string()))?;
        Ok(Self {
            id,
            email: claims.email,
            roles: claims.roles,
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| Error::Unauthorized("missing_authorization".to_string()))?;
        let auth_str = header
            .to_str()
            .map_err(|_| Error::Unauthorized("bad_authorization".to_string()))?;
        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| Error::Unauthorized("unsupported_scheme".to_string()))?;

        let claims = decode_claims(token)?;
        AuthUser::try_from(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "x".into(),
            bio: None,
            location: None,
            profile_image: None,
            skills: vec![],
            experience: sqlx::types::Json(vec![]),
            education: sqlx::types::Json(vec![]),
            roles: vec!["instructor".into()],
            is_verified: true,
            verification_token: None,
            reset_password_token: None,
            reset_password_expires: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn init_test_config() {
        std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
        std::env::set_var("DATABASE_URL", "postgres://localhost/learnhub_test");
        std::env::set_var("JWT_SECRET", "test_secret_key");
        std::env::set_var("GEMINI_API_KEY", "test-key");
        std::env::set_var("FRONTEND_URL", "http://localhost:3000");
        std::env::set_var("SMTP_HOST", "localhost");
        std::env::set_var("SMTP_PORT", "587");
        std::env::set_var("SMTP_USER", "mailer");
        std::env::set_var("SMTP_PASS", "secret");
        std::env::set_var("MAIL_FROM", "LearnHub <no-reply@example.com>");
        std::env::set_var("OPEN_RPS", "100");
        std::env::set_var("API_RPS", "100");
        let _ = crate::config::init_config();
    }

    #[test]
    fn jwt_round_trip_preserves_identity_and_roles() {
        init_test_config();
        let user = test_user();
        let token = issue_jwt(&user).unwrap();
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.email, user.email);

        let auth = AuthUser::try_from(claims).unwrap();
        assert_eq!(auth.id, user.id);
        assert!(auth.is_instructor());
        assert!(!auth.is_admin());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        init_test_config();
        assert!(decode_claims("not-a-jwt").is_err());
    }
}
