//! Slash and bang command parsing for the chat loop.
//!
//! All recognized commands are parsed in a single tokenizing step into a
//! tagged [`ChatCommand`] value, so matching order and precedence are
//! declared once and testable away from any I/O.

/// A parsed chat command.
///
/// These commands control the session locally and are never sent to the
/// API (with the exception of `Shell`, whose captured output is injected
/// into the transcript for the model to see).
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Report the current model, or switch to a named one.
    /// `None` reports without changing anything.
    Model(Option<String>),

    /// Clear the conversation, keeping any seed instructions.
    Clear,

    /// Remove the previous user message and its assistant reply.
    Revert,

    /// Compose a message in the external editor. The payload is the
    /// starting text; `None` starts from the previous history line.
    Edit(Option<String>),

    /// List the transcript entries read-only.
    Messages,

    /// Copy the last assistant reply to the system clipboard.
    Copy,

    /// Run the remainder as a shell command and capture its output into
    /// the transcript.
    Shell(String),

    /// Display help information.
    Help,

    /// A recognized command that is not implemented.
    NotImplemented(String),

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Command names offered by tab completion, sorted.
pub const COMMANDS: &[&str] = &[
    "clear", "copy", "edit", "file", "help", "history", "messages", "model", "revert", "title",
    "usage",
];

/// Parses user input for commands.
///
/// Returns `Some(ChatCommand)` if the input is a command form, or `None`
/// if it should be submitted as a regular user message.
///
/// # Examples
///
/// ```
/// # use parley::chat::parse_command;
/// assert!(parse_command("/clear").is_some());
/// assert!(parse_command("!ls -l").is_some());
/// assert!(parse_command("Hello there!").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if let Some(rest) = input.strip_prefix(['!', '$']) {
        let command = rest.trim();
        if command.is_empty() {
            return Some(ChatCommand::Invalid(
                "! requires a shell command".to_string(),
            ));
        }
        return Some(ChatCommand::Shell(command.to_string()));
    }

    if input == "?" {
        return Some(ChatCommand::Help);
    }

    if !input.starts_with('/') {
        return None;
    }

    if input == "/" {
        return Some(ChatCommand::Help);
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "model" => ChatCommand::Model(argument.map(|s| s.to_string())),
        "clear" => ChatCommand::Clear,
        "revert" => ChatCommand::Revert,
        "edit" => ChatCommand::Edit(argument.map(|s| s.to_string())),
        "messages" => ChatCommand::Messages,
        "copy" => ChatCommand::Copy,
        "help" => ChatCommand::Help,
        "history" | "file" | "usage" | "title" => ChatCommand::NotImplemented(command),
        _ => ChatCommand::Invalid(format!("Unknown command: /{}", command)),
    };

    Some(result)
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /model [name]   Report the current model, or switch to one of:
                  gpt-3.5-turbo, gpt-4, gpt-4-turbo-preview, gpt-4o, gpt-4o-mini
  /clear          Clear the conversation (seed instructions are kept)
  /revert         Remove the previous user message and assistant reply
  /edit [text]    Compose a message in $EDITOR (starts from the last line)
  /messages       List the messages in this conversation
  /copy           Copy the last assistant reply to the clipboard
  /history        List/resume previous conversations (not implemented)
  /file           Attach files mid-conversation (not implemented)
  /usage          Show usage/quota (not implemented)
  /title          Title this conversation (not implemented)
  /help, /, ?     Show this help message
  !cmd or $cmd    Run a shell command; its output joins the conversation"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_model() {
        assert_eq!(parse_command("/model"), Some(ChatCommand::Model(None)));
        assert_eq!(
            parse_command("/model gpt-4"),
            Some(ChatCommand::Model(Some("gpt-4".to_string())))
        );
        assert_eq!(
            parse_command("/model   gpt-4o-mini  "),
            Some(ChatCommand::Model(Some("gpt-4o-mini".to_string())))
        );
    }

    #[test]
    fn parse_clear_and_revert() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("  /revert  "), Some(ChatCommand::Revert));
    }

    #[test]
    fn parse_edit() {
        assert_eq!(parse_command("/edit"), Some(ChatCommand::Edit(None)));
        assert_eq!(
            parse_command("/edit draft text"),
            Some(ChatCommand::Edit(Some("draft text".to_string())))
        );
    }

    #[test]
    fn parse_help_forms() {
        assert_eq!(parse_command("/"), Some(ChatCommand::Help));
        assert_eq!(parse_command("?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/help"), Some(ChatCommand::Help));
    }

    #[test]
    fn parse_shell() {
        assert_eq!(
            parse_command("!echo hi"),
            Some(ChatCommand::Shell("echo hi".to_string()))
        );
        assert_eq!(
            parse_command("$ df -h"),
            Some(ChatCommand::Shell("df -h".to_string()))
        );
        assert!(matches!(
            parse_command("!"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("requires")
        ));
    }

    #[test]
    fn parse_stubs() {
        for name in ["history", "file", "usage", "title"] {
            assert_eq!(
                parse_command(&format!("/{name}")),
                Some(ChatCommand::NotImplemented(name.to_string()))
            );
        }
    }

    #[test]
    fn parse_unknown() {
        assert!(matches!(
            parse_command("/bogus"),
            Some(ChatCommand::Invalid(msg)) if msg.contains("/bogus")
        ));
    }

    #[test]
    fn non_commands() {
        assert_eq!(parse_command("Hello there!"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("?hello"), None);
        assert_eq!(parse_command("what / why"), None);
    }

    #[test]
    fn first_match_is_exclusive() {
        // A bang line never falls through to slash parsing, and vice versa.
        assert_eq!(
            parse_command("!/model gpt-4"),
            Some(ChatCommand::Shell("/model gpt-4".to_string()))
        );
    }

    #[test]
    fn help_text_covers_commands() {
        let help = help_text();
        for name in COMMANDS {
            assert!(help.contains(&format!("/{name}")), "missing /{name}");
        }
        assert!(help.contains("!cmd"));
    }
}
