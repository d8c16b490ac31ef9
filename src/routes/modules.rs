use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::content_dto::{CreateLessonRequest, CreateModuleRequest, UpdateModuleRequest},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[axum::debug_handler]
pub async fn create_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(course_id): Path<Uuid>,
    Json(payload): Json<CreateModuleRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let module = state
        .module_service
        .create(course_id, &auth, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(module)))
}

#[axum::debug_handler]
pub async fn list_modules(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let modules = state.module_service.list_for_course(course_id).await?;
    Ok(Json(modules))
}

#[axum::debug_handler]
pub async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let module = state.module_service.find(id).await?;
    Ok(Json(module))
}

#[axum::debug_handler]
pub async fn update_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateModuleRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let module = state.module_service.update(id, &auth, &payload).await?;
    Ok(Json(module))
}

#[axum::debug_handler]
pub async fn delete_module(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.module_service.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn create_lesson(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(module_id): Path<Uuid>,
    Json(payload): Json<CreateLessonRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let lesson = state
        .lesson_service
        .create(module_id, &auth, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

#[axum::debug_handler]
pub async fn list_lessons(
    State(state): State<AppState>,
    Path(module_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let lessons = state.lesson_service.list_for_module(module_id).await?;
    Ok(Json(lessons))
}
