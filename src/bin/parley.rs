//! Interactive terminal chat client for OpenAI-compatible completion APIs.
//!
//! # Usage
//!
//! ```bash
//! # Interactive conversation
//! parley
//!
//! # One-shot question from the command line
//! parley what is the capital of France
//!
//! # Analyze piped input
//! git diff | parley summarize this change
//!
//! # Attach files and keep the conversation open
//! parley --attach notes.md,plan.md --interactive review my plan
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands (`/` or `?` lists them):
//! - `/model [name]` - Report or switch the model
//! - `/clear` - Clear the conversation, keeping seed instructions
//! - `/revert` - Remove the previous turn
//! - `/edit [text]` - Compose a message in $EDITOR
//! - `/messages` - List the transcript
//! - `/copy` - Copy the last reply to the clipboard
//! - `!cmd` - Run a shell command and share its output with the model

use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use arrrg::CommandLine;
use rustyline::Editor;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;

use parley::chat::{
    self, ChatArgs, ChatCommand, ChatConfig, ChatSession, help_text, parse_command,
};
use parley::client::CompletionClient;
use parley::complete::ChatHelper;
use parley::render::{PlainTextRenderer, Renderer};
use parley::{LineHistory, OpenAi};

/// Main entry point for the parley chat client.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, free) = ChatArgs::from_command_line_relaxed("parley [OPTIONS] [PROMPT...]");

    if let Some(path) = chat::default_config_path("parley.log")
        && let Err(err) = parley::logging::init(args.debug, args.log_level.as_deref(), &path)
    {
        eprintln!("warning: logging disabled: {err}");
    }

    let api_key = match resolve_api_key(args.keyfile.as_deref()) {
        Ok(key) => key,
        Err(message) => {
            eprintln!("Error: {message}");
            std::process::exit(1);
        }
    };

    let config = ChatConfig::from(&args);
    let use_color = config.use_color;
    let mut renderer = PlainTextRenderer::with_color(use_color);

    let client = match OpenAi::new(Some(api_key)) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };

    let history_path = args
        .history
        .clone()
        .map(PathBuf::from)
        .or_else(|| chat::default_config_path("history.txt"));
    let history = match history_path {
        Some(path) => LineHistory::load(path).unwrap_or_else(|err| {
            eprintln!("warning: line history disabled: {err}");
            LineHistory::in_memory()
        }),
        None => LineHistory::in_memory(),
    };

    let mut session = ChatSession::with_history(client, config, history);
    seed_session(&mut session, &args);
    tracing::info!(model = %session.model(), "session started");

    // Gather the piped payload, if any, before deciding the input source;
    // once stdin is consumed it cannot back an interactive prompt.
    let piped = if std::io::stdin().is_terminal() {
        None
    } else {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Some(buffer)
    };
    let positional = if free.is_empty() {
        None
    } else {
        Some(free.join(" "))
    };
    let resolved = chat::resolve(positional, piped, session.config().interactive);

    if let Some(initial) = &resolved.initial
        && !resolved.interactive
    {
        match session.submit(initial).await {
            Ok(reply) => {
                println!("{}", reply.trim_end());
                copy_code_blocks(&reply, &mut renderer);
            }
            Err(err) => renderer.print_error(&err.to_string()),
        }
        return Ok(());
    }

    let mut rl = Editor::<ChatHelper, DefaultHistory>::new()?;
    rl.set_helper(Some(ChatHelper::new()));
    for line in session.history().lines() {
        let _ = rl.add_history_entry(line);
    }
    refresh_completion(&mut rl, &session);

    println!("parley (model: {})", session.model());
    println!("Type / or ? for commands, Ctrl-D to exit");
    println!();

    if let Some(initial) = resolved.initial.clone() {
        renderer.print_info(&format!("#{} >", session.prompt_number()));
        println!("{initial}");
        take_turn(&mut session, &mut renderer, &initial).await;
        refresh_completion(&mut rl, &session);
    }

    loop {
        let prompt = format!("#{} > ", session.prompt_number());

        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);
                session.history_mut().record(&line);
                persist_history(&session);

                match parse_command(&line) {
                    Some(ChatCommand::Model(None)) => {
                        renderer.print_info(&format!("model={}", session.model()));
                    }
                    Some(ChatCommand::Model(Some(name))) => {
                        // Unknown names leave the session unchanged; the
                        // report below shows whatever is still in effect.
                        session.set_model(&name);
                        renderer.print_info(&format!("model={}", session.model()));
                    }
                    Some(ChatCommand::Clear) => {
                        session.clear();
                        renderer.print_info("Conversation cleared.");
                    }
                    Some(ChatCommand::Revert) => {
                        match session.revert() {
                            Some(removed) => renderer.print_info(&format!("Removed: {removed}")),
                            None => renderer.print_info("Nothing to revert."),
                        }
                        persist_history(&session);
                    }
                    Some(ChatCommand::Edit(text)) => {
                        edit_turn(&mut session, &mut renderer, &mut rl, text).await;
                    }
                    Some(ChatCommand::Messages) => {
                        for (index, message) in session.transcript().messages().iter().enumerate()
                        {
                            renderer.print_entry(index, message);
                        }
                    }
                    Some(ChatCommand::Copy) => match session.transcript().last_assistant() {
                        Some(message) => match chat::copy_to_clipboard(&message.content) {
                            Ok(()) => renderer.print_info("Copied last reply to the clipboard."),
                            Err(err) => renderer.print_error(&err.to_string()),
                        },
                        None => renderer.print_info("No assistant reply to copy yet."),
                    },
                    Some(ChatCommand::Shell(command)) => {
                        shell_turn(&mut session, &mut renderer, &command);
                    }
                    Some(ChatCommand::Help) => {
                        for line in help_text().lines() {
                            println!("    {}", line);
                        }
                    }
                    Some(ChatCommand::NotImplemented(name)) => {
                        renderer.print_info(&format!("/{name} is not implemented."));
                    }
                    Some(ChatCommand::Invalid(message)) => {
                        renderer.print_error(&message);
                    }
                    None => {
                        take_turn(&mut session, &mut renderer, &line).await;
                    }
                }

                refresh_completion(&mut rl, &session);
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C at the prompt cancels just that line.
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl-D exits.
                println!();
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {err}"));
                break;
            }
        }
    }

    persist_history(&session);
    Ok(())
}

/// Resolves the API key: environment first, then the key file.
fn resolve_api_key(keyfile: Option<&str>) -> Result<String, String> {
    if let Ok(key) = std::env::var("OPENAI_API_KEY")
        && !key.trim().is_empty()
    {
        return Ok(key.trim().to_string());
    }

    let path = keyfile
        .map(PathBuf::from)
        .or_else(|| chat::default_config_path("api-key.txt"))
        .ok_or_else(|| "cannot locate an API key file (HOME is not set)".to_string())?;
    match std::fs::read_to_string(&path) {
        Ok(content) if !content.trim().is_empty() => Ok(content.trim().to_string()),
        Ok(_) => Err(format!("API key file {} is empty", path.display())),
        Err(err) => Err(format!(
            "cannot read API key file {}: {err}",
            path.display()
        )),
    }
}

/// Seeds the transcript from the instructions file and any attachments.
///
/// A missing default instructions file is skipped; a path the user named
/// explicitly must be readable. Attachment files must always be readable.
fn seed_session<C: CompletionClient>(session: &mut ChatSession<C>, args: &ChatArgs) {
    let explicit = args.instructions.is_some();
    let instructions_path = args
        .instructions
        .clone()
        .map(PathBuf::from)
        .or_else(|| chat::default_config_path("custom-instructions.txt"));
    if let Some(path) = instructions_path {
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), "loaded custom instructions");
                session.seed_instructions(text.trim_end());
            }
            Err(_) if !explicit => {}
            Err(err) => {
                eprintln!("Error: cannot read instructions file {}: {err}", path.display());
                std::process::exit(1);
            }
        }
    }

    for path in chat::split_attachments(args.attach.as_deref()) {
        match std::fs::read_to_string(&path) {
            Ok(content) => session.attach_file(&path.display().to_string(), &content),
            Err(err) => {
                eprintln!("Error: cannot read attachment {}: {err}", path.display());
                std::process::exit(1);
            }
        }
    }
}

/// Submits one user message and renders the outcome.
async fn take_turn<C: CompletionClient>(
    session: &mut ChatSession<C>,
    renderer: &mut PlainTextRenderer,
    input: &str,
) {
    match session.submit(input).await {
        Ok(reply) => {
            renderer.rule();
            renderer.print_reply(&reply);
            copy_code_blocks(&reply, renderer);
        }
        Err(err) => renderer.print_error(&err.to_string()),
    }
}

/// Runs a shell line: prints the capture, copies stdout, records both in
/// the transcript.
fn shell_turn<C: CompletionClient>(
    session: &mut ChatSession<C>,
    renderer: &mut PlainTextRenderer,
    command: &str,
) {
    match session.run_shell(command) {
        Ok(capture) => {
            let stdout = capture.stdout.trim_end();
            if !stdout.is_empty() {
                println!("{stdout}");
                if let Err(err) = chat::copy_to_clipboard(stdout) {
                    tracing::debug!(error = %err, "clipboard copy failed");
                }
            }
            if !capture.stderr.is_empty() {
                renderer.print_stderr(&capture.stderr);
            }
        }
        Err(err) => renderer.print_error(&err.to_string()),
    }
}

/// The `/edit` flow: compose in $EDITOR, confirm, then submit.
async fn edit_turn<C: CompletionClient>(
    session: &mut ChatSession<C>,
    renderer: &mut PlainTextRenderer,
    rl: &mut Editor<ChatHelper, DefaultHistory>,
    text: Option<String>,
) {
    // The /edit line itself does not belong in history.
    session.history_mut().remove_last(1);
    let initial = text
        .or_else(|| session.history().last().map(String::from))
        .unwrap_or_default();

    match chat::edit_text(&initial) {
        Ok(edited) if edited.is_empty() => {
            renderer.print_info("Nothing to submit.");
            persist_history(session);
        }
        Ok(edited) => {
            println!("{edited}");
            let submit = match rl.readline("Submit? (Y/n): ") {
                Ok(answer) => !answer.trim().eq_ignore_ascii_case("n"),
                Err(_) => false,
            };
            if submit {
                session.history_mut().record(&edited);
                let _ = rl.add_history_entry(&edited);
                persist_history(session);
                take_turn(session, renderer, &edited).await;
            } else {
                renderer.print_info("Discarded.");
                persist_history(session);
            }
        }
        Err(err) => {
            renderer.print_error(&err.to_string());
            persist_history(session);
        }
    }
}

/// Copies fenced code blocks from a reply to the clipboard, announcing
/// each one. Clipboard trouble is logged and otherwise ignored.
fn copy_code_blocks(reply: &str, renderer: &mut PlainTextRenderer) {
    for block in chat::extract_code_blocks(reply) {
        match chat::copy_to_clipboard(&block) {
            Ok(()) => renderer.print_copied(&block),
            Err(err) => {
                tracing::debug!(error = %err, "clipboard copy failed");
                break;
            }
        }
    }
}

/// Re-mines tab-completion candidates from the session state.
fn refresh_completion<C: CompletionClient>(
    rl: &mut Editor<ChatHelper, DefaultHistory>,
    session: &ChatSession<C>,
) {
    if let Some(helper) = rl.helper_mut() {
        helper.refresh(session.history(), session.transcript());
    }
}

/// Persists the line history, complaining only to the log.
fn persist_history<C: CompletionClient>(session: &ChatSession<C>) {
    if let Err(err) = session.history().persist() {
        tracing::warn!(error = %err, "failed to persist line history");
    }
}
