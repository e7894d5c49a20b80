use super::Media;
use super::Message;
use crate::domain::models::ChatResponse;
use crate::domain::models::MediaKind;
use crate::domain::models::Modality;
use crate::domain::models::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::User, "Hi there!");
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.role.to_string(), "user");
    assert_eq!(msg.content, "Hi there!".to_string());
    assert!(msg.media.is_none());
    assert!(!msg.id.is_empty());
}

#[test]
fn it_gives_every_message_its_own_id() {
    let first = Message::new(Role::User, "Hi there!");
    let second = Message::new(Role::User, "Hi there!");
    assert_ne!(first.id, second.id);
}

#[test]
fn it_executes_new_with_media() {
    let msg = Message::new_with_media(
        Role::Assistant,
        "Here you go",
        Media {
            kind: MediaKind::Image,
            url: "data:image/png;base64,abc".to_string(),
        },
    );

    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.media.unwrap().kind, MediaKind::Image);
}

#[test]
fn it_builds_from_image_response() {
    let res = ChatResponse {
        modality: Modality::Image,
        content: "A cat".to_string(),
        url: Some("data:image/png;base64,abc".to_string()),
    };

    let msg = Message::from_response(&res);
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.content, "A cat");
    assert_eq!(
        msg.media,
        Some(Media {
            kind: MediaKind::Image,
            url: "data:image/png;base64,abc".to_string(),
        })
    );
}

#[test]
fn it_ignores_urls_on_text_responses() {
    let res = ChatResponse {
        modality: Modality::Text,
        content: "Hello".to_string(),
        url: Some("https://example.com".to_string()),
    };

    let msg = Message::from_response(&res);
    assert!(msg.media.is_none());
}

#[test]
fn it_reduces_to_history_entry() {
    let msg = Message::new(Role::Assistant, "How may I help you?");
    let entry = msg.to_history_entry();
    assert_eq!(entry.role, Role::Assistant);
    assert_eq!(entry.content, "How may I help you?");
}
