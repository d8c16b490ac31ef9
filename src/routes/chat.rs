use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{dto::chat_dto::ChatRequest, error::Result, middleware::auth::AuthUser, AppState};

#[axum::debug_handler]
pub async fn chat(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let reply = state.chat_service.generate_reply(&payload).await?;
    Ok(Json(reply))
}
