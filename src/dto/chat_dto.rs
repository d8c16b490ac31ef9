use serde::{Deserialize, Serialize};
use validator::Validate;

/// One prior turn of the conversation, as the front end stores it.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub sender: String,
    pub text: String,
    /// Placeholder bubbles the UI renders while waiting; skipped when
    /// forwarding history upstream.
    #[serde(default)]
    pub is_loading: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "Prompt is required"))]
    pub prompt: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub generated_text: String,
}
