#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::HistoryEntry;
use super::Message;

pub const DEFAULT_CHAT_TITLE: &str = "New chat";

const SHORT_TITLE_CHARS: usize = 20;
const MAX_TITLE_CHARS: usize = 30;
const TITLE_WORDS: usize = 4;
const ELLIPSIS: &str = "...";

#[derive(Clone, Debug)]
pub struct Chat {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn new() -> Chat {
        let now = Utc::now();
        return Chat {
            id: Chat::create_id(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            messages: vec![],
            created_at: now,
            updated_at: now,
        };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    /// Role and content of every message, in order.
    pub fn history(&self) -> Vec<HistoryEntry> {
        return self
            .messages
            .iter()
            .map(|msg| return msg.to_history_entry())
            .collect();
    }
}

impl Default for Chat {
    fn default() -> Chat {
        return Chat::new();
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }

    let cut = text
        .chars()
        .take(max - ELLIPSIS.len())
        .collect::<String>();
    return format!("{}{ELLIPSIS}", cut.trim_end());
}

fn with_ellipsis(text: &str) -> String {
    if text.chars().count() > MAX_TITLE_CHARS {
        return truncate_chars(text, MAX_TITLE_CHARS);
    }

    return format!("{text}{ELLIPSIS}");
}

/// Derives a chat title from the first message sent in it.
pub fn title_from_text(text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<&str>>().join(" ");

    if text.chars().count() <= SHORT_TITLE_CHARS {
        return text;
    }

    if let Some(idx) = text.find('?') {
        return with_ellipsis(&text[..=idx]);
    }

    let words = text
        .split(' ')
        .take(TITLE_WORDS)
        .collect::<Vec<&str>>()
        .join(" ");
    return with_ellipsis(&words);
}
