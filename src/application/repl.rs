#[cfg(test)]
#[path = "repl_test.rs"]
mod tests;

use std::path::Path;

use anyhow::Result;
use tokio::io::AsyncBufReadExt;
use tokio::io::AsyncWriteExt;
use tokio::io::BufReader;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Attachment;
use crate::domain::models::AttachmentSource;
use crate::domain::models::Chat;
use crate::domain::models::ChatClientBox;
use crate::domain::models::Message;
use crate::domain::models::Role;
use crate::domain::models::SlashCommand;
use crate::domain::services::SessionLimits;
use crate::domain::services::Sessions;
use crate::infrastructure::clients::http::HttpChatClient;

const MEDIA_PREVIEW_CHARS: usize = 48;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
/new (/n) - Start a new chat.
/chats (/l) - List chats, most recently updated first.
/select (/s) [N] - Switch to chat N from the list.
/delete (/d) [N] - Delete chat N from the list.
/attach (/a) [PATH] [TEXT] - Send a file from disk, with optional message text.
/voice (/v) [PATH] [TEXT] - Send a recorded voice clip, with optional message text.
/help (/h) - Show this help.
/quit (/q) - Exit.
    "#;

    return text.trim().to_string();
}

pub enum Outcome {
    Continue(Vec<String>),
    Quit,
}

fn format_message(message: &Message) -> String {
    let label = match message.role {
        Role::User => Paint::cyan("you").bold().to_string(),
        Role::Assistant => Paint::green("assistant").bold().to_string(),
    };

    let mut res = format!("{label}: {}", message.content);
    if let Some(media) = &message.media {
        let mut preview = media.url.chars().take(MEDIA_PREVIEW_CHARS).collect::<String>();
        if preview.len() < media.url.len() {
            preview = format!("{preview}...");
        }
        res = format!("{res}\n  [{}: {preview}]", media.kind);
    }

    return res;
}

fn format_chat(idx: usize, chat: &Chat, is_current: bool) -> String {
    let marker = if is_current { "*" } else { " " };
    return format!(
        "{marker} {}. {} ({} messages, updated {})",
        idx + 1,
        chat.title,
        chat.messages.len(),
        chat.updated_at.format("%Y-%m-%d %H:%M")
    );
}

fn notice(text: &str) -> String {
    return Paint::yellow(text).to_string();
}

/// Line oriented chat loop over one set of sessions.
pub struct Repl {
    sessions: Sessions,
    client: ChatClientBox,
}

impl Repl {
    pub fn new(sessions: Sessions, client: ChatClientBox) -> Repl {
        return Repl { sessions, client };
    }

    pub fn sessions(&self) -> &Sessions {
        return &self.sessions;
    }

    fn chat_id_at(&self, cmd: &SlashCommand) -> Option<String> {
        return cmd
            .index_arg()
            .and_then(|idx| return self.sessions.chats().get(idx - 1))
            .map(|chat| return chat.id.to_string());
    }

    fn list_chats(&self) -> Vec<String> {
        if self.sessions.chats().is_empty() {
            return vec![notice("There are no chats yet. Say something to start one!")];
        }

        let current = self.sessions.current_chat_id();
        return self
            .sessions
            .chats()
            .iter()
            .enumerate()
            .map(|(idx, chat)| return format_chat(idx, chat, current == Some(chat.id.as_str())))
            .collect();
    }

    async fn send(&mut self, text: &str, attachment: Option<Attachment>) -> Vec<String> {
        let res = self
            .sessions
            .send_message(self.client.as_ref(), text, attachment)
            .await;

        return match res {
            Ok(message) => vec![format_message(&message)],
            Err(err) => vec![notice(&err.to_string())],
        };
    }

    async fn send_file(&mut self, cmd: &SlashCommand, source: AttachmentSource) -> Vec<String> {
        let path = Path::new(&cmd.args[0]);
        let attachment = match Attachment::from_path(path, source).await {
            Ok(attachment) => attachment,
            Err(err) => return vec![notice(&format!("{err:#}"))],
        };

        return self.send(&cmd.trailing_text(), Some(attachment)).await;
    }

    pub async fn handle_line(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Continue(vec![]);
        }

        if !line.starts_with('/') {
            return Outcome::Continue(self.send(line, None).await);
        }

        let cmd = match SlashCommand::parse(line) {
            Some(cmd) => cmd,
            None => {
                return Outcome::Continue(vec![notice(
                    "Unknown command. Type /help to see what is available.",
                )]);
            }
        };

        if cmd.is_quit() {
            return Outcome::Quit;
        }

        let output = if cmd.is_help() {
            vec![help_text()]
        } else if cmd.is_new_chat() {
            self.sessions.create_chat();
            vec![notice("Started a new chat.")]
        } else if cmd.is_list_chats() {
            self.list_chats()
        } else if cmd.is_select_chat() {
            match self.chat_id_at(&cmd) {
                Some(id) => match self.sessions.select_chat(&id) {
                    Ok(()) => self
                        .sessions
                        .current_chat()
                        .map(|chat| {
                            return chat
                                .messages
                                .iter()
                                .map(format_message)
                                .collect::<Vec<String>>();
                        })
                        .unwrap_or_default(),
                    Err(err) => vec![notice(&err.to_string())],
                },
                None => vec![notice("Pick a chat number from /chats.")],
            }
        } else if cmd.is_delete_chat() {
            match self.chat_id_at(&cmd) {
                Some(id) => match self.sessions.delete_chat(&id) {
                    Ok(()) => vec![notice("Deleted chat.")],
                    Err(err) => vec![notice(&err.to_string())],
                },
                None => vec![notice("Pick a chat number from /chats.")],
            }
        } else if cmd.is_attach() {
            self.send_file(&cmd, AttachmentSource::File).await
        } else if cmd.is_voice() {
            self.send_file(&cmd, AttachmentSource::Inline).await
        } else {
            vec![notice("Missing a file path. Type /help for usage.")]
        };

        return Outcome::Continue(output);
    }
}

fn limits_from_config() -> Result<SessionLimits> {
    return Ok(SessionLimits {
        attachment_bytes: Config::get_u64(ConfigKey::AttachmentMaxBytes)? as usize,
        inline_upload_bytes: Config::get_u64(ConfigKey::InlineUploadMaxBytes)? as usize,
    });
}

pub async fn start() -> Result<()> {
    let sessions = Sessions::new(limits_from_config()?);
    let client = HttpChatClient::default();
    tracing::debug!(server_url = Config::get(ConfigKey::ServerURL), "Starting chat");

    let mut repl = Repl::new(sessions, Box::new(client));
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", notice("Type a message to chat, or /help for commands."));
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };

        match repl.handle_line(&line).await {
            Outcome::Continue(output) => {
                for entry in output {
                    println!("{entry}");
                }
            }
            Outcome::Quit => break,
        }
    }

    return Ok(());
}
