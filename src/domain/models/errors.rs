#[cfg(test)]
#[path = "errors_test.rs"]
mod tests;

use thiserror::Error;

use super::ProviderError;

/// Everything that can go wrong while answering a chat request. Messages are
/// fixed strings so provider details never reach the client.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("{0}")]
    Validation(String),
    #[error("The model provider API key is not configured.")]
    MissingCredentials,
    #[error("The model provider rejected the configured API key.")]
    InvalidCredentials,
    #[error("Too many requests. Please wait a moment and try again.")]
    RateLimited,
    #[error("This request was rejected by the content policy of the model provider.")]
    ContentPolicy,
    #[error("The model is currently unavailable. Please try again later.")]
    ModelUnavailable,
    #[error("The model returned an empty response.")]
    EmptyResponse,
    #[error("The request took too long to complete.")]
    Timeout,
}

impl ChatError {
    pub fn status_code(&self) -> u16 {
        return match self {
            ChatError::Validation(_) => 400,
            ChatError::ContentPolicy => 400,
            ChatError::InvalidCredentials => 401,
            ChatError::RateLimited => 429,
            ChatError::MissingCredentials
            | ChatError::ModelUnavailable
            | ChatError::EmptyResponse
            | ChatError::Timeout => 500,
        };
    }
}

impl From<ProviderError> for ChatError {
    fn from(err: ProviderError) -> ChatError {
        return match err {
            ProviderError::MissingCredentials => ChatError::MissingCredentials,
            ProviderError::InvalidCredentials => ChatError::InvalidCredentials,
            ProviderError::RateLimited => ChatError::RateLimited,
            ProviderError::ContentPolicy(_) => ChatError::ContentPolicy,
            ProviderError::Transient(_) => ChatError::ModelUnavailable,
            ProviderError::Shape(_) => ChatError::EmptyResponse,
        };
    }
}
