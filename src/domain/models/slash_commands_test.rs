use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_plain_message() {
    let text = "draw a picture of a cat";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_quit() {
    assert!(SlashCommand::parse("/q").unwrap().is_quit());
    assert!(SlashCommand::parse("/quit").unwrap().is_quit());
    assert!(SlashCommand::parse("/exit").unwrap().is_quit());
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/new").unwrap();
    assert!(!cmd.is_quit());
    assert!(cmd.is_new_chat());
}

#[test]
fn it_is_help() {
    assert!(SlashCommand::parse("/h").unwrap().is_help());
    assert!(SlashCommand::parse("/help").unwrap().is_help());
}

#[test]
fn it_is_list_chats() {
    assert!(SlashCommand::parse("/chats").unwrap().is_list_chats());
    assert!(SlashCommand::parse("/l").unwrap().is_list_chats());
}

#[test]
fn it_parses_index_args() {
    let cmd = SlashCommand::parse("/select 2").unwrap();
    assert!(cmd.is_select_chat());
    assert_eq!(cmd.index_arg(), Some(2));

    let cmd = SlashCommand::parse("/delete 0").unwrap();
    assert!(cmd.is_delete_chat());
    assert_eq!(cmd.index_arg(), None);

    let cmd = SlashCommand::parse("/d abc").unwrap();
    assert_eq!(cmd.index_arg(), None);
}

#[test]
fn it_requires_path_for_attach() {
    assert!(SlashCommand::parse("/attach").is_none());
    assert!(SlashCommand::parse("/voice").is_none());

    let cmd = SlashCommand::parse("/attach ./cat.png what is  this?").unwrap();
    assert!(cmd.is_attach());
    assert_eq!(cmd.args[0], "./cat.png");
    assert_eq!(cmd.trailing_text(), "what is this?");

    let cmd = SlashCommand::parse("/v ./clip.webm").unwrap();
    assert!(cmd.is_voice());
    assert!(cmd.trailing_text().is_empty());
}
