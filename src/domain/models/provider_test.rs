use super::PromptMessage;
use super::PromptRole;
use super::ProviderError;
use crate::domain::models::HistoryEntry;
use crate::domain::models::Role;

#[test]
fn it_only_retries_transient_errors() {
    assert!(ProviderError::Transient("boom".to_string()).is_retryable());
    assert!(!ProviderError::MissingCredentials.is_retryable());
    assert!(!ProviderError::InvalidCredentials.is_retryable());
    assert!(!ProviderError::RateLimited.is_retryable());
    assert!(!ProviderError::ContentPolicy("nope".to_string()).is_retryable());
    assert!(!ProviderError::Shape("not json".to_string()).is_retryable());
}

#[test]
fn it_converts_history_entries() {
    let msg = PromptMessage::from(&HistoryEntry {
        role: Role::Assistant,
        content: "How may I help you?".to_string(),
    });

    assert_eq!(msg.role, PromptRole::Assistant);
    assert_eq!(msg.content, "How may I help you?");
}

#[test]
fn it_serializes_roles_in_lowercase() {
    let res = serde_json::to_string(&PromptMessage::new(PromptRole::System, "Be nice")).unwrap();
    insta::assert_snapshot!(res, @r###"{"role":"system","content":"Be nice"}"###);
}
