use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::auth_dto::{
        AuthResponse, AuthUserPayload, ForgotPasswordRequest, LoginRequest, RegisterRequest,
        ResetPasswordRequest,
    },
    error::Result,
    middleware::auth::{issue_jwt, AuthUser},
    AppState,
};

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.register(&payload).await?;

    // Verification mail is best effort; a broken relay must not block
    // sign-up.
    if let Some(token) = user.verification_token.as_deref() {
        if let Err(e) = state
            .mail_service
            .send_email_verification(&user.email, &user.first_name, token)
            .await
        {
            tracing::warn!(user_id = %user.id, error = ?e, "could not send verification mail");
        }
    }

    let token = issue_jwt(&user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: AuthUserPayload::from(&user),
        }),
    ))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.login(&payload).await?;
    let token = issue_jwt(&user)?;
    Ok(Json(AuthResponse {
        token,
        user: AuthUserPayload::from(&user),
    }))
}

/// Always answers the same way, so the endpoint cannot be used to probe
/// which addresses have accounts.
#[axum::debug_handler]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    if let Some((user, token)) = state.user_service.create_reset_token(&payload.email).await? {
        if let Err(e) = state
            .mail_service
            .send_password_reset(&user.email, &user.first_name, &token)
            .await
        {
            tracing::error!(user_id = %user.id, error = ?e, "could not send reset mail");
        }
    }

    Ok(Json(json!({
        "message": "If that account exists, a reset link has been sent",
    })))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    state
        .user_service
        .reset_password(&token, &payload.password)
        .await?;
    Ok(Json(json!({ "message": "Password has been reset" })))
}

#[axum::debug_handler]
pub async fn send_verification(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let (user, token) = state.user_service.create_verification_token(auth.id).await?;
    state
        .mail_service
        .send_email_verification(&user.email, &user.first_name, &token)
        .await?;
    Ok(Json(json!({ "message": "Verification email sent" })))
}

#[axum::debug_handler]
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse> {
    state.user_service.verify_email(&token).await?;
    Ok(Json(json!({ "message": "Email verified" })))
}
