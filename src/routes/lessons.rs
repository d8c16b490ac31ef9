use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::content_dto::UpdateLessonRequest,
    dto::quiz_dto::CreateQuizRequest,
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[axum::debug_handler]
pub async fn get_lesson(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let lesson = state
        .lesson_service
        .get_for_viewer(id, auth.as_ref())
        .await?;
    Ok(Json(lesson))
}

#[axum::debug_handler]
pub async fn update_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLessonRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state.lesson_service.update(id, &auth, &payload).await?;
    Ok(Json(lesson))
}

#[axum::debug_handler]
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.lesson_service.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn create_quiz_for_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(lesson_id): Path<Uuid>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state
        .quiz_service
        .create_for_lesson(lesson_id, &auth, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}
