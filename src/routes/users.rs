use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::user_dto::{PublicProfile, UpdateProfileRequest},
    error::Result,
    middleware::auth::AuthUser,
    AppState,
};

#[axum::debug_handler]
pub async fn get_me(State(state): State<AppState>, auth: AuthUser) -> Result<impl IntoResponse> {
    let user = state.user_service.find_by_id(auth.id).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn update_me(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let user = state.user_service.update_profile(auth.id, &payload).await?;
    Ok(Json(user))
}

#[axum::debug_handler]
pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let user = state.user_service.find_by_id(id).await?;
    Ok(Json(PublicProfile::from(user)))
}
