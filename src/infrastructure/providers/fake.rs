use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::models::PromptMessage;
use crate::domain::models::Provider;
use crate::domain::models::ProviderError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FakeCall {
    Complete(Vec<PromptMessage>, Option<u32>),
    Image(String),
    Speech(String),
}

/// Scripted provider for tests. Each capability pops its next queued result,
/// falling back to a canned success once the queue is empty.
#[derive(Default)]
pub struct FakeProvider {
    pub completions: Mutex<VecDeque<Result<String, ProviderError>>>,
    pub images: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
    pub speech: Mutex<VecDeque<Result<Vec<u8>, ProviderError>>>,
    pub calls: Arc<Mutex<Vec<FakeCall>>>,
    pub delay: Option<Duration>,
}

impl FakeProvider {
    pub fn with_completions(results: Vec<Result<String, ProviderError>>) -> FakeProvider {
        return FakeProvider {
            completions: Mutex::new(results.into()),
            ..FakeProvider::default()
        };
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<FakeCall>>> {
        return self.calls.clone();
    }

    async fn record(&self, call: FakeCall) {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &'static str {
        return "fake";
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        return Ok(());
    }

    async fn complete(
        &self,
        messages: &[PromptMessage],
        max_tokens: Option<u32>,
    ) -> Result<String, ProviderError> {
        self.record(FakeCall::Complete(messages.to_vec(), max_tokens))
            .await;
        let next = self.completions.lock().unwrap().pop_front();
        return next.unwrap_or_else(|| return Ok("Hello from the fake model.".to_string()));
    }

    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>, ProviderError> {
        self.record(FakeCall::Image(prompt.to_string())).await;
        let next = self.images.lock().unwrap().pop_front();
        return next.unwrap_or_else(|| return Ok(vec![137, 80, 78, 71]));
    }

    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>, ProviderError> {
        self.record(FakeCall::Speech(text.to_string())).await;
        let next = self.speech.lock().unwrap().pop_front();
        return next.unwrap_or_else(|| return Ok(vec![73, 68, 51]));
    }
}
