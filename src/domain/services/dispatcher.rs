#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as b64;
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;

use super::classify;
use super::RetryPolicy;
use crate::domain::models::parse_history;
use crate::domain::models::Attachment;
use crate::domain::models::ChatError;
use crate::domain::models::ChatRequest;
use crate::domain::models::ChatResponse;
use crate::domain::models::Modality;
use crate::domain::models::PromptMessage;
use crate::domain::models::PromptRole;
use crate::domain::models::ProviderBox;

pub const SYSTEM_PROMPT: &str = "You are a friendly and helpful assistant. Answer clearly and concisely, and use markdown when it helps readability.";

const SPOKEN_REPLY_PROMPT: &str = "Your reply will be read aloud. Answer in at most three short sentences of plain text, without markdown, lists, code, or emoji.";
const SPOKEN_REPLY_MAX_TOKENS: u32 = 150;

static DISALLOWED_PROMPT_CHARS: Lazy<Regex> =
    Lazy::new(|| return Regex::new(r"[^\w\s.,!?'\-]").unwrap());

/// Keeps word characters, whitespace, and basic punctuation, collapsing runs
/// of whitespace.
pub fn sanitize_prompt(text: &str) -> String {
    let cleaned = DISALLOWED_PROMPT_CHARS.replace_all(text, "");
    return cleaned.split_whitespace().collect::<Vec<&str>>().join(" ");
}

fn data_url(mime_type: &str, bytes: &[u8]) -> String {
    return format!("data:{mime_type};base64,{}", b64.encode(bytes));
}

/// Turns raw form fields into a request, rejecting an empty message or a
/// history payload that isn't a list of role and content pairs.
pub fn validate_request(
    message: Option<&str>,
    history: Option<&str>,
    attachment: Option<Attachment>,
) -> Result<ChatRequest, ChatError> {
    let message = message.map(|msg| return msg.trim()).unwrap_or_default();
    if message.is_empty() {
        return Err(ChatError::Validation("Message is required.".to_string()));
    }

    let history = parse_history(history.unwrap_or_default())?;

    return Ok(ChatRequest {
        message: message.to_string(),
        history,
        attachment,
    });
}

pub struct Dispatcher {
    provider: ProviderBox,
    retry: RetryPolicy,
    request_timeout: Duration,
}

impl Dispatcher {
    pub fn new(provider: ProviderBox, retry: RetryPolicy, request_timeout: Duration) -> Dispatcher {
        return Dispatcher {
            provider,
            retry,
            request_timeout,
        };
    }

    /// Answers one chat turn within the request time budget.
    pub async fn handle(&self, req: ChatRequest) -> Result<ChatResponse, ChatError> {
        match tokio::time::timeout(self.request_timeout, self.dispatch(req)).await {
            Ok(res) => return res,
            Err(_) => {
                tracing::error!(
                    timeout_ms = self.request_timeout.as_millis() as u64,
                    "Chat request timed out"
                );
                return Err(ChatError::Timeout);
            }
        }
    }

    pub async fn dispatch(&self, req: ChatRequest) -> Result<ChatResponse, ChatError> {
        let modality = classify(&req.message);
        tracing::info!(
            modality = %modality,
            provider = self.provider.name(),
            history = req.history.len(),
            attachment = req.attachment.is_some(),
            "Dispatching chat request"
        );

        let res = match modality {
            Modality::Text => self.respond_with_text(&req).await?,
            Modality::Image => self.respond_with_image(&req).await?,
            Modality::Audio => self.respond_with_audio(&req).await?,
        };

        return normalize(res);
    }

    /// System instruction, then history, then the current user turn.
    fn prompt_messages(&self, req: &ChatRequest, instruction: Option<&str>) -> Vec<PromptMessage> {
        let mut system_prompt = SYSTEM_PROMPT.to_string();
        if let Some(instruction) = instruction {
            system_prompt = format!("{system_prompt} {instruction}");
        }

        let mut user_turn = req.message.to_string();
        if let Some(attachment) = &req.attachment {
            user_turn = format!("{user_turn}\n\n{}", attachment.describe());
        }

        let mut messages = vec![PromptMessage::new(PromptRole::System, &system_prompt)];
        messages.extend(req.history.iter().map(PromptMessage::from));
        messages.push(PromptMessage::new(PromptRole::User, &user_turn));

        return messages;
    }

    async fn respond_with_text(&self, req: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let messages = self.prompt_messages(req, None);
        let text = self
            .retry
            .run("completion", || {
                return self.provider.complete(&messages, None);
            })
            .await?;

        return Ok(ChatResponse::text(&text));
    }

    async fn respond_with_image(&self, req: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let prompt = sanitize_prompt(&req.message);
        if prompt.is_empty() {
            return Err(ChatError::Validation(
                "Message has nothing left to draw once special characters are removed."
                    .to_string(),
            ));
        }

        let image = self
            .retry
            .run("image", || {
                return self.provider.generate_image(&prompt);
            })
            .await?;

        if image.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        return Ok(ChatResponse::with_media(
            Modality::Image,
            &format!("Here is the image I generated for \"{prompt}\"."),
            data_url("image/png", &image),
        ));
    }

    async fn respond_with_audio(&self, req: &ChatRequest) -> Result<ChatResponse, ChatError> {
        let messages = self.prompt_messages(req, Some(SPOKEN_REPLY_PROMPT));
        let reply = self
            .retry
            .run("completion", || {
                return self
                    .provider
                    .complete(&messages, Some(SPOKEN_REPLY_MAX_TOKENS));
            })
            .await?;

        let spoken = sanitize_prompt(&reply);
        if spoken.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        let audio = self
            .retry
            .run("speech", || {
                return self.provider.synthesize_speech(&spoken);
            })
            .await?;

        if audio.is_empty() {
            return Err(ChatError::EmptyResponse);
        }

        return Ok(ChatResponse::with_media(
            Modality::Audio,
            &spoken,
            data_url("audio/mpeg", &audio),
        ));
    }
}

/// Every response needs content, and media responses need a URL.
fn normalize(res: ChatResponse) -> Result<ChatResponse, ChatError> {
    if res.content.trim().is_empty() {
        tracing::error!(modality = %res.modality, "Provider returned empty content");
        return Err(ChatError::EmptyResponse);
    }

    let needs_url = res.modality.media_kind().is_some();
    let has_url = res.url.as_ref().map_or(false, |url| return !url.is_empty());
    if needs_url && !has_url {
        tracing::error!(modality = %res.modality, "Provider returned no media");
        return Err(ChatError::EmptyResponse);
    }

    return Ok(res);
}
