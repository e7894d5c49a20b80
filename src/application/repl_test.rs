use anyhow::bail;
use anyhow::Result;

use super::help_text;
use super::Outcome;
use super::Repl;
use crate::domain::models::ChatResponse;
use crate::domain::models::Modality;
use crate::domain::services::Sessions;
use crate::infrastructure::clients::scripted::ScriptedClient;

fn repl(client: ScriptedClient) -> Repl {
    return Repl::new(Sessions::default(), Box::new(client));
}

async fn output(repl: &mut Repl, line: &str) -> Result<String> {
    return match repl.handle_line(line).await {
        Outcome::Continue(lines) => Ok(lines.join("\n")),
        Outcome::Quit => bail!("Unexpected quit"),
    };
}

#[test]
fn it_lists_every_command_in_help() {
    let text = help_text();
    for cmd in [
        "/new", "/chats", "/select", "/delete", "/attach", "/voice", "/help", "/quit",
    ] {
        assert!(text.contains(cmd), "help is missing {cmd}");
    }
}

#[tokio::test]
async fn it_quits() {
    let mut repl = repl(ScriptedClient::default());
    assert!(matches!(repl.handle_line("/quit").await, Outcome::Quit));
}

#[tokio::test]
async fn it_ignores_blank_lines() -> Result<()> {
    let client = ScriptedClient::default();
    let sent = client.sent();
    let mut repl = repl(client);

    assert_eq!(output(&mut repl, "   ").await?, "");
    assert!(sent.lock().unwrap().is_empty());
    assert!(repl.sessions().chats().is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_sends_plain_lines_as_messages() -> Result<()> {
    let client = ScriptedClient::with_responses(vec![Ok(ChatResponse::text("Paris."))]);
    let sent = client.sent();
    let mut repl = repl(client);

    let res = output(&mut repl, "What is the capital of France?").await?;
    assert!(res.contains("Paris."));
    assert_eq!(sent.lock().unwrap()[0].0, "What is the capital of France?");

    let chat = repl.sessions().current_chat().unwrap();
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.title, "What is the capital of France?...");

    return Ok(());
}

#[tokio::test]
async fn it_shows_media_previews() -> Result<()> {
    let client = ScriptedClient::with_responses(vec![Ok(ChatResponse::with_media(
        Modality::Image,
        "Here is your cat.",
        "data:image/png;base64,iVBORw==".to_string(),
    ))]);
    let mut repl = repl(client);

    let res = output(&mut repl, "draw a cat").await?;
    assert!(res.contains("[image: data:image/png;base64,iVBORw==]"));

    return Ok(());
}

#[tokio::test]
async fn it_reports_failed_sends_and_keeps_the_chat() -> Result<()> {
    let client = ScriptedClient::with_responses(vec![Err(anyhow::anyhow!(
        "Too many requests. Please wait a moment and try again."
    ))]);
    let mut repl = repl(client);

    let res = output(&mut repl, "Hello").await?;
    assert!(res.contains("Too many requests"));

    let chat = repl.sessions().current_chat().unwrap();
    assert_eq!(chat.messages.len(), 1);
    assert!(!repl.sessions().is_waiting());

    return Ok(());
}

#[tokio::test]
async fn it_manages_chats_by_list_position() -> Result<()> {
    let mut repl = repl(ScriptedClient::default());

    output(&mut repl, "First chat").await?;
    output(&mut repl, "/new").await?;
    output(&mut repl, "Second chat").await?;

    let list = output(&mut repl, "/chats").await?;
    assert!(list.contains("1. Second chat"));
    assert!(list.contains("2. First chat"));

    let res = output(&mut repl, "/select 2").await?;
    assert!(res.contains("First chat"));
    assert_eq!(
        repl.sessions().current_chat().unwrap().title,
        "First chat"
    );

    output(&mut repl, "/delete 1").await?;
    assert_eq!(repl.sessions().chats().len(), 1);
    assert_eq!(
        repl.sessions().current_chat().unwrap().title,
        "First chat"
    );

    return Ok(());
}

#[tokio::test]
async fn it_rejects_bad_chat_positions() -> Result<()> {
    let mut repl = repl(ScriptedClient::default());
    output(&mut repl, "Hello").await?;

    let res = output(&mut repl, "/select 5").await?;
    assert!(res.contains("Pick a chat number"));

    let res = output(&mut repl, "/delete 0").await?;
    assert!(res.contains("Pick a chat number"));
    assert_eq!(repl.sessions().chats().len(), 1);

    return Ok(());
}

#[tokio::test]
async fn it_reports_unknown_commands() -> Result<()> {
    let client = ScriptedClient::default();
    let sent = client.sent();
    let mut repl = repl(client);

    let res = output(&mut repl, "/dance").await?;
    assert!(res.contains("Unknown command"));
    assert!(sent.lock().unwrap().is_empty());

    return Ok(());
}

#[tokio::test]
async fn it_attaches_files_from_disk() -> Result<()> {
    let path = std::env::temp_dir().join(format!("parley-{}.txt", uuid::Uuid::new_v4()));
    tokio::fs::write(&path, "hello world").await?;

    let client = ScriptedClient::default();
    let sent = client.sent();
    let mut repl = repl(client);

    let line = format!("/attach {} summarize this", path.display());
    output(&mut repl, &line).await?;
    tokio::fs::remove_file(&path).await?;

    let sent = sent.lock().unwrap();
    assert_eq!(sent[0].0, "summarize this");
    assert!(sent[0].2.as_deref().unwrap_or_default().starts_with("parley-"));

    return Ok(());
}

#[tokio::test]
async fn it_reports_unreadable_attachments() -> Result<()> {
    let client = ScriptedClient::default();
    let sent = client.sent();
    let mut repl = repl(client);

    let res = output(&mut repl, "/voice ./does/not/exist.webm").await?;
    assert!(res.contains("Failed to read attachment"));
    assert!(sent.lock().unwrap().is_empty());

    return Ok(());
}
