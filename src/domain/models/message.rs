#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;
use uuid::Uuid;

use super::ChatResponse;
use super::HistoryEntry;
use super::MediaKind;
use super::Role;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    pub kind: MediaKind,
    /// Either a remote URL or a `data:` URL carrying the payload inline.
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub media: Option<Media>,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.to_string(),
            media: None,
        };
    }

    pub fn new_with_media(role: Role, content: &str, media: Media) -> Message {
        let mut msg = Message::new(role, content);
        msg.media = Some(media);
        return msg;
    }

    /// Builds the assistant reply for a response envelope. The URL only
    /// becomes media when the envelope's modality can carry one.
    pub fn from_response(res: &ChatResponse) -> Message {
        return match (res.modality.media_kind(), &res.url) {
            (Some(kind), Some(url)) if !url.is_empty() => Message::new_with_media(
                Role::Assistant,
                &res.content,
                Media {
                    kind,
                    url: url.to_string(),
                },
            ),
            _ => Message::new(Role::Assistant, &res.content),
        };
    }

    pub fn to_history_entry(&self) -> HistoryEntry {
        return HistoryEntry {
            role: self.role,
            content: self.content.to_string(),
        };
    }
}
