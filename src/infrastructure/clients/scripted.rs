use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::Attachment;
use crate::domain::models::ChatClient;
use crate::domain::models::ChatResponse;
use crate::domain::models::HistoryEntry;

pub type SentTurn = (String, Vec<HistoryEntry>, Option<String>);

/// Chat client for tests. Replies with queued responses, then a plain
/// "Hello!" once the queue runs dry.
#[derive(Default)]
pub struct ScriptedClient {
    pub responses: Mutex<VecDeque<Result<ChatResponse>>>,
    pub sent: Arc<Mutex<Vec<SentTurn>>>,
}

impl ScriptedClient {
    pub fn with_responses(responses: Vec<Result<ChatResponse>>) -> ScriptedClient {
        return ScriptedClient {
            responses: Mutex::new(responses.into()),
            ..ScriptedClient::default()
        };
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<SentTurn>>> {
        return self.sent.clone();
    }

    pub fn sent_count(&self) -> usize {
        return self.sent.lock().unwrap().len();
    }
}

#[async_trait]
impl ChatClient for ScriptedClient {
    async fn send(
        &self,
        message: &str,
        history: &[HistoryEntry],
        attachment: Option<&Attachment>,
    ) -> Result<ChatResponse> {
        self.sent.lock().unwrap().push((
            message.to_string(),
            history.to_vec(),
            attachment.map(|e| return e.file_name.to_string()),
        ));

        let next = self.responses.lock().unwrap().pop_front();
        return next.unwrap_or_else(|| return Ok(ChatResponse::text("Hello!")));
    }
}
