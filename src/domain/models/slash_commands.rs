#[cfg(test)]
#[path = "slash_commands_test.rs"]
mod tests;

pub struct SlashCommand {
    command: String,
    pub args: Vec<String>,
}

impl SlashCommand {
    pub fn parse(text: &str) -> Option<SlashCommand> {
        let mut args = text
            .split_whitespace()
            .map(|e| return e.to_string())
            .collect::<Vec<String>>();
        if args.is_empty() {
            return None;
        }
        let prefix = args.remove(0);

        let cmd = SlashCommand {
            command: prefix,
            args,
        };
        if cmd.is_quit()
            || cmd.is_help()
            || cmd.is_new_chat()
            || cmd.is_list_chats()
            || cmd.is_select_chat()
            || cmd.is_delete_chat()
            || cmd.is_attach()
            || cmd.is_voice()
        {
            return Some(cmd);
        }

        return None;
    }

    /// Positional index argument, 1 based as printed by `/chats`.
    pub fn index_arg(&self) -> Option<usize> {
        return self
            .args
            .first()
            .and_then(|arg| return arg.parse::<usize>().ok())
            .filter(|idx| return *idx > 0);
    }

    /// Message text following a path argument.
    pub fn trailing_text(&self) -> String {
        return self.args.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");
    }

    pub fn is_quit(&self) -> bool {
        return ["/q", "/quit", "/exit"].contains(&self.command.as_str());
    }

    pub fn is_help(&self) -> bool {
        return ["/h", "/help"].contains(&self.command.as_str());
    }

    pub fn is_new_chat(&self) -> bool {
        return ["/n", "/new"].contains(&self.command.as_str());
    }

    pub fn is_list_chats(&self) -> bool {
        return ["/l", "/chats"].contains(&self.command.as_str());
    }

    pub fn is_select_chat(&self) -> bool {
        return ["/s", "/select"].contains(&self.command.as_str());
    }

    pub fn is_delete_chat(&self) -> bool {
        return ["/d", "/delete"].contains(&self.command.as_str());
    }

    pub fn is_attach(&self) -> bool {
        return ["/a", "/attach"].contains(&self.command.as_str()) && !self.args.is_empty();
    }

    pub fn is_voice(&self) -> bool {
        return ["/v", "/voice"].contains(&self.command.as_str()) && !self.args.is_empty();
    }
}
