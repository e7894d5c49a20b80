use anyhow::Result;
use async_trait::async_trait;

use super::Attachment;
use super::ChatResponse;
use super::HistoryEntry;

/// Transport used by the session manager to reach the chat endpoint.
#[async_trait]
pub trait ChatClient {
    /// Sends one turn with its history snapshot. Any non-success response is
    /// returned as an error carrying a message fit to show the user.
    async fn send(
        &self,
        message: &str,
        history: &[HistoryEntry],
        attachment: Option<&Attachment>,
    ) -> Result<ChatResponse>;
}

pub type ChatClientBox = Box<dyn ChatClient + Send + Sync>;
