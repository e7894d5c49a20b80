#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;

use async_trait::async_trait;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use thiserror::Error;

use super::HistoryEntry;
use super::Role;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

impl From<Role> for PromptRole {
    fn from(role: Role) -> PromptRole {
        return match role {
            Role::User => PromptRole::User,
            Role::Assistant => PromptRole::Assistant,
        };
    }
}

/// A single message in the list handed to a chat completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: &str) -> PromptMessage {
        return PromptMessage {
            role,
            content: content.to_string(),
        };
    }
}

impl From<&HistoryEntry> for PromptMessage {
    fn from(entry: &HistoryEntry) -> PromptMessage {
        return PromptMessage::new(entry.role.into(), &entry.content);
    }
}

/// Failure classes reported by a model provider.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("API key is not configured")]
    MissingCredentials,
    #[error("API key was rejected")]
    InvalidCredentials,
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("content policy violation: {0}")]
    ContentPolicy(String),
    #[error("request failed: {0}")]
    Transient(String),
    #[error("unexpected response: {0}")]
    Shape(String),
}

impl ProviderError {
    /// Credential, rate limit, content policy, and malformed payload failures
    /// will not go away by asking again.
    pub fn is_retryable(&self) -> bool {
        return matches!(self, ProviderError::Transient(_));
    }
}

#[async_trait]
pub trait Provider {
    fn name(&self) -> &'static str;

    /// Used at startup to verify all configurations are available to work with
    /// the provider.
    async fn health_check(&self) -> Result<(), ProviderError>;

    /// Runs a chat completion over the full message list, returning the
    /// assistant's text. `max_tokens` caps the reply when set.
    async fn complete(
        &self,
        messages: &[PromptMessage],
        max_tokens: Option<u32>,
    ) -> Result<String, ProviderError>;

    /// Generates a single image, returning the encoded image bytes.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ProviderError>;

    /// Synthesizes speech for the text, returning the encoded audio bytes.
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, ProviderError>;
}

pub type ProviderBox = Box<dyn Provider + Send + Sync>;
