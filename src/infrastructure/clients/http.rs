#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Attachment;
use crate::domain::models::ChatClient;
use crate::domain::models::ChatResponse;
use crate::domain::models::ErrorResponse;
use crate::domain::models::HistoryEntry;

/// Talks to a running `parley serve` over its multipart chat endpoint.
pub struct HttpChatClient {
    url: String,
    client: reqwest::Client,
}

impl Default for HttpChatClient {
    fn default() -> HttpChatClient {
        return HttpChatClient::new(&Config::get(ConfigKey::ServerURL));
    }
}

impl HttpChatClient {
    pub fn new(url: &str) -> HttpChatClient {
        return HttpChatClient {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn send(
        &self,
        message: &str,
        history: &[HistoryEntry],
        attachment: Option<&Attachment>,
    ) -> Result<ChatResponse> {
        let mut form = multipart::Form::new()
            .text("message", message.to_string())
            .text("history", serde_json::to_string(history)?);

        if let Some(attachment) = attachment {
            let part = multipart::Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.to_string())
                .mime_str(&attachment.mime_type)?;
            form = form.part("file", part);
        }

        let url = format!("{url}/api/chat", url = self.url);
        let res = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .with_context(|| return format!("Unable to reach the chat server at {}", self.url))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = body, "Chat request failed");

            if let Ok(err) = serde_json::from_str::<ErrorResponse>(&body) {
                bail!(err.error);
            }
            bail!(format!("Chat request failed with status {}", status.as_u16()));
        }

        let body = res
            .json::<ChatResponse>()
            .await
            .context("Chat server returned an unexpected response")?;

        return Ok(body);
    }
}
