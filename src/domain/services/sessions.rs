#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;

use anyhow::Result;
use chrono::Utc;
use thiserror::Error;

use crate::domain::models::title_from_text;
use crate::domain::models::Attachment;
use crate::domain::models::AttachmentSource;
use crate::domain::models::Chat;
use crate::domain::models::ChatClient;
use crate::domain::models::ChatResponse;
use crate::domain::models::HistoryEntry;
use crate::domain::models::Message;
use crate::domain::models::Role;

/// Size ceilings checked before an attachment leaves the client. The two are
/// independent: inline captures must pass both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionLimits {
    pub attachment_bytes: usize,
    pub inline_upload_bytes: usize,
}

impl Default for SessionLimits {
    fn default() -> SessionLimits {
        return SessionLimits {
            attachment_bytes: 10 * 1024 * 1024,
            inline_upload_bytes: 5 * 1024 * 1024,
        };
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Type a message or attach a file before sending.")]
    EmptyMessage,
    #[error("Please wait for the current response before sending another message.")]
    SendInFlight,
    #[error("{file_name} is {size} bytes, which is over the {limit} byte limit for attachments.")]
    AttachmentTooLarge {
        file_name: String,
        size: usize,
        limit: usize,
    },
    #[error("No chat found with id {0}")]
    UnknownChat(String),
    #[error("{0}")]
    Request(String),
}

/// A turn whose user message has been appended locally and is waiting on the
/// server.
#[derive(Clone, Debug)]
pub struct PendingSend {
    pub chat_id: String,
    pub message: String,
    pub history: Vec<HistoryEntry>,
    pub attachment: Option<Attachment>,
}

/// In-memory chats for one client, most recently updated first.
pub struct Sessions {
    chats: Vec<Chat>,
    current_chat_id: Option<String>,
    limits: SessionLimits,
    waiting_for_response: bool,
}

impl Default for Sessions {
    fn default() -> Sessions {
        return Sessions::new(SessionLimits::default());
    }
}

impl Sessions {
    pub fn new(limits: SessionLimits) -> Sessions {
        return Sessions {
            chats: vec![],
            current_chat_id: None,
            limits,
            waiting_for_response: false,
        };
    }

    pub fn chats(&self) -> &[Chat] {
        return &self.chats;
    }

    pub fn chat(&self, id: &str) -> Option<&Chat> {
        return self.chats.iter().find(|chat| return chat.id == id);
    }

    pub fn current_chat_id(&self) -> Option<&str> {
        return self.current_chat_id.as_deref();
    }

    pub fn current_chat(&self) -> Option<&Chat> {
        return self.current_chat_id.as_deref().and_then(|id| return self.chat(id));
    }

    pub fn is_waiting(&self) -> bool {
        return self.waiting_for_response;
    }

    fn position(&self, id: &str) -> Result<usize, SessionError> {
        return self
            .chats
            .iter()
            .position(|chat| return chat.id == id)
            .ok_or_else(|| return SessionError::UnknownChat(id.to_string()));
    }

    /// Moves the chat to the front with a fresh update time. The front chat
    /// always carries the newest timestamp, so the list stays ordered.
    fn touch(&mut self, idx: usize) -> &mut Chat {
        let mut chat = self.chats.remove(idx);
        let now = Utc::now();
        chat.updated_at = match self.chats.first() {
            Some(newest) if newest.updated_at > now => newest.updated_at,
            _ => now,
        };

        self.chats.insert(0, chat);
        return &mut self.chats[0];
    }

    pub fn create_chat(&mut self) -> String {
        let chat = Chat::new();
        let id = chat.id.to_string();

        self.chats.push(chat);
        let idx = self.chats.len() - 1;
        self.touch(idx);
        self.current_chat_id = Some(id.to_string());

        tracing::debug!(chat_id = id, "Created chat");
        return id;
    }

    pub fn select_chat(&mut self, id: &str) -> Result<(), SessionError> {
        self.position(id)?;
        self.current_chat_id = Some(id.to_string());
        return Ok(());
    }

    pub fn delete_chat(&mut self, id: &str) -> Result<(), SessionError> {
        let idx = self.position(id)?;
        self.chats.remove(idx);

        if self.current_chat_id.as_deref() == Some(id) {
            self.current_chat_id = None;
        }

        tracing::debug!(chat_id = id, "Deleted chat");
        return Ok(());
    }

    fn check_attachment(&self, attachment: &Attachment) -> Result<(), SessionError> {
        let mut limit = self.limits.attachment_bytes;
        if attachment.source == AttachmentSource::Inline {
            limit = limit.min(self.limits.inline_upload_bytes);
        }

        if attachment.size() > limit {
            return Err(SessionError::AttachmentTooLarge {
                file_name: attachment.file_name.to_string(),
                size: attachment.size(),
                limit,
            });
        }

        return Ok(());
    }

    /// Validates a send and appends the user message straight away, before
    /// anything goes over the network.
    pub fn begin_send(
        &mut self,
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<PendingSend, SessionError> {
        let text = text.trim();
        if text.is_empty() && attachment.is_none() {
            return Err(SessionError::EmptyMessage);
        }
        if self.waiting_for_response {
            return Err(SessionError::SendInFlight);
        }
        if let Some(attachment) = &attachment {
            self.check_attachment(attachment)?;
        }

        let chat_id = match self.current_chat() {
            Some(chat) => chat.id.to_string(),
            None => self.create_chat(),
        };

        // The server needs text to classify, so attachment-only sends are
        // described by the file name.
        let message = match &attachment {
            Some(attachment) if text.is_empty() => format!("Attached {}", attachment.file_name),
            _ => text.to_string(),
        };

        let media = attachment
            .as_ref()
            .and_then(|attachment| return attachment.to_media());
        let user_message = match media {
            Some(media) => Message::new_with_media(Role::User, &message, media),
            None => Message::new(Role::User, &message),
        };

        let idx = self.position(&chat_id)?;
        let chat = self.touch(idx);
        let history = chat.history();
        if chat.messages.is_empty() {
            chat.title = match &attachment {
                Some(attachment) if text.is_empty() => title_from_text(&attachment.file_name),
                _ => title_from_text(text),
            };
        }
        chat.messages.push(user_message);

        self.waiting_for_response = true;

        return Ok(PendingSend {
            chat_id,
            message,
            history,
            attachment,
        });
    }

    /// Records the outcome of a send. Failures leave the chat exactly as
    /// `begin_send` left it.
    pub fn finish_send(
        &mut self,
        pending: &PendingSend,
        res: Result<ChatResponse>,
    ) -> Result<Message, SessionError> {
        self.waiting_for_response = false;

        let response = match res {
            Ok(response) => response,
            Err(err) => {
                tracing::error!(chat_id = pending.chat_id, error = ?err, "Chat request failed");
                return Err(SessionError::Request(err.to_string()));
            }
        };

        let idx = self.position(&pending.chat_id)?;
        let message = Message::from_response(&response);
        let chat = self.touch(idx);
        chat.messages.push(message.clone());

        return Ok(message);
    }

    pub async fn send_message(
        &mut self,
        client: &(dyn ChatClient + Send + Sync),
        text: &str,
        attachment: Option<Attachment>,
    ) -> Result<Message, SessionError> {
        let pending = self.begin_send(text, attachment)?;
        let res = client
            .send(
                &pending.message,
                &pending.history,
                pending.attachment.as_ref(),
            )
            .await;

        return self.finish_send(&pending, res);
    }
}
