use crate::dto::chat_dto::{ChatRequest, ChatResponse};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

const GENERATE_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent";

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

/// Thin pass-through to the Gemini generateContent endpoint. Conversation
/// state lives entirely on the client; each call replays the visible
/// history as alternating user/model turns.
#[derive(Clone)]
pub struct ChatService {
    client: reqwest::Client,
}

impl ChatService {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn generate_reply(&self, payload: &ChatRequest) -> Result<ChatResponse> {
        let config = crate::config::get_config();

        let mut contents: Vec<GeminiContent> = payload
            .history
            .iter()
            .filter(|turn| !turn.is_loading)
            .map(|turn| GeminiContent {
                role: if turn.sender == "user" {
                    "user".to_string()
                } else {
                    "model".to_string()
                },
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();
        contents.push(GeminiContent {
            role: "user".to_string(),
            parts: vec![GeminiPart {
                text: payload.prompt.clone(),
            }],
        });

        let response = self
            .client
            .post(GENERATE_URL)
            .query(&[("key", config.gemini_api_key.as_str())])
            .json(&GeminiRequest { contents })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::error!(%status, detail, "generative API call failed");
            return Err(Error::Internal(
                "The assistant is unavailable right now".to_string(),
            ));
        }

        let body: GeminiResponse = response.json().await?;
        let generated_text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| Error::Internal("The assistant returned no text".to_string()))?;

        Ok(ChatResponse { generated_text })
    }
}
