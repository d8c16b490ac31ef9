use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::quiz_dto::{
        CreateQuestionRequest, CreateQuizRequest, SubmitQuizRequest, UpdateQuestionRequest,
        UpdateQuizRequest,
    },
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[axum::debug_handler]
pub async fn create_quiz_for_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state
        .quiz_service
        .create_for_course(course_id, &auth, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(quiz)))
}

/// Learner-facing fetch: answer keys stripped.
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let view = state.quiz_service.get_view(id).await?;
    Ok(Json(view))
}

/// Authoring fetch: answer keys included, owner only.
#[axum::debug_handler]
pub async fn get_quiz_full(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let quiz = state.quiz_service.get_with_questions(id, &auth).await?;
    Ok(Json(quiz))
}

#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let quiz = state.quiz_service.update(id, &auth, &payload).await?;
    Ok(Json(quiz))
}

#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.quiz_service.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn add_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(quiz_id): Path<Uuid>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state
        .quiz_service
        .add_question(quiz_id, &auth, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(question)))
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((quiz_id, question_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateQuestionRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let question = state
        .quiz_service
        .update_question(quiz_id, question_id, &auth, &payload)
        .await?;
    Ok(Json(question))
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((quiz_id, question_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    state
        .quiz_service
        .delete_question(quiz_id, question_id, &auth)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SubmitQuizRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let result = state.submission_service.submit(&auth, id, &payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

#[axum::debug_handler]
pub async fn get_submission_result(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((quiz_id, submission_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse> {
    let submission = state
        .submission_service
        .get_result(quiz_id, submission_id, &auth)
        .await?;
    Ok(Json(submission))
}
