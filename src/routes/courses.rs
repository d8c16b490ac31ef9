use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::course_dto::{CreateCourseRequest, CreateReviewRequest, ListCoursesQuery, UpdateCourseRequest},
    error::{Error, Result},
    middleware::auth::AuthUser,
    AppState,
};

#[axum::debug_handler]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<impl IntoResponse> {
    let page = state.course_service.list(&query).await?;
    Ok(Json(page))
}

#[axum::debug_handler]
pub async fn create_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if !auth.is_instructor() {
        return Err(Error::Forbidden("Instructor role required".to_string()));
    }
    let course = state.course_service.create(&auth, &payload).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

#[axum::debug_handler]
pub async fn get_course(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let detail = state.course_service.get_detail(id, auth.as_ref()).await?;
    Ok(Json(detail))
}

#[axum::debug_handler]
pub async fn update_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let course = state.course_service.update(id, &auth, &payload).await?;
    Ok(Json(course))
}

#[axum::debug_handler]
pub async fn delete_course(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.course_service.delete(id, &auth).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn enroll(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let enrollment = state.enrollment_service.enroll(auth.id, id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

#[axum::debug_handler]
pub async fn my_enrolled_courses(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse> {
    let courses = state
        .enrollment_service
        .list_courses_for_user(auth.id)
        .await?;
    Ok(Json(courses))
}

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let review = state.review_service.upsert(auth.id, id, &payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let reviews = state.review_service.list_for_course(id).await?;
    Ok(Json(reviews))
}
