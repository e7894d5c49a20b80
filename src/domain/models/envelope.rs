use serde_derive::Deserialize;
use serde_derive::Serialize;

use super::Attachment;
use super::HistoryEntry;
use super::Modality;

/// A validated turn, ready to be classified and dispatched.
#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub attachment: Option<Attachment>,
}

/// Body of a successful `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(rename = "type")]
    pub modality: Modality,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ChatResponse {
    pub fn text(content: &str) -> ChatResponse {
        return ChatResponse {
            modality: Modality::Text,
            content: content.to_string(),
            url: None,
        };
    }

    pub fn with_media(modality: Modality, content: &str, url: String) -> ChatResponse {
        return ChatResponse {
            modality,
            content: content.to_string(),
            url: Some(url),
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
