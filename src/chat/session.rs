//! Core chat session management.
//!
//! The session owns the transcript, the session configuration, and the
//! line history, and is the only writer of all three. The completion
//! client is borrowed per call and never touches session state itself.

use crate::chat::config::ChatConfig;
use crate::chat::shell::{self, ShellCapture};
use crate::client::CompletionClient;
use crate::error::{Error, Result};
use crate::history::LineHistory;
use crate::transcript::Transcript;
use crate::types::{ChatRequest, KnownModel, Message};

/// A chat session: conversation state plus the client that completes it.
pub struct ChatSession<C: CompletionClient> {
    client: C,
    config: ChatConfig,
    transcript: Transcript,
    history: LineHistory,
}

impl<C: CompletionClient> ChatSession<C> {
    /// Creates a session with an empty transcript and in-memory history.
    pub fn new(client: C, config: ChatConfig) -> Self {
        Self::with_history(client, config, LineHistory::in_memory())
    }

    /// Creates a session with a loaded line history.
    pub fn with_history(client: C, config: ChatConfig, history: LineHistory) -> Self {
        Self {
            client,
            config,
            transcript: Transcript::new(),
            history,
        }
    }

    /// Seeds the transcript with custom instructions.
    pub fn seed_instructions(&mut self, text: &str) {
        self.transcript.seed(text);
    }

    /// Seeds the transcript with one attached file: a single system
    /// message naming the file followed by its raw content.
    pub fn attach_file(&mut self, name: &str, content: &str) {
        self.transcript.seed(format!(
            "File: {name}\n(Make use of it when answering subsequent questions.)\n\n{content}"
        ));
    }

    /// Read-only view of the transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Read-only view of the line history.
    pub fn history(&self) -> &LineHistory {
        &self.history
    }

    /// Mutable access to the line history.
    pub fn history_mut(&mut self) -> &mut LineHistory {
        &mut self.history
    }

    /// The active configuration.
    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// The current model.
    pub fn model(&self) -> KnownModel {
        self.config.model
    }

    /// Switches to a named model if it is in the allow-list.
    ///
    /// Returns false, leaving the session unchanged, for unknown names.
    pub fn set_model(&mut self, name: &str) -> bool {
        match name.parse::<KnownModel>() {
            Ok(model) => {
                self.config.model = model;
                true
            }
            Err(_) => false,
        }
    }

    /// The 1-based number of the upcoming turn, shown in the prompt.
    pub fn prompt_number(&self) -> usize {
        (self.transcript.len() - self.transcript.seed_len()) / 2 + 1
    }

    /// Submits one user message and returns the assistant reply.
    ///
    /// The user message is appended before the call; on any failure
    /// (transport, API error payload, or a malformed response) the
    /// transcript is rolled back to its pre-call state and the turn is
    /// abandoned. Exactly one request is made; there is no retry.
    pub async fn submit(&mut self, user_input: &str) -> Result<String> {
        let previous_len = self.transcript.len();
        self.transcript.append(Message::user(user_input));

        let request = ChatRequest::new(
            self.config.model,
            self.transcript.messages().to_vec(),
            self.config.temperature,
        );

        let outcome = self.client.complete(request).await.and_then(|completion| {
            completion
                .reply_text()
                .map(str::to_string)
                .ok_or_else(|| Error::serialization("response contained no choices", None))
        });

        match outcome {
            Ok(reply) => {
                self.transcript.append(Message::assistant(reply.clone()));
                Ok(reply)
            }
            Err(err) => {
                self.transcript.truncate(previous_len);
                Err(err)
            }
        }
    }

    /// Clears the conversation, keeping any seed instructions.
    pub fn clear(&mut self) {
        self.transcript.clear(self.transcript.has_seed());
    }

    /// Reverts the last turn and drops the two corresponding line-history
    /// entries (the `/revert` line itself and the line before it).
    ///
    /// Returns the removed history line for display, if one existed.
    pub fn revert(&mut self) -> Option<String> {
        self.transcript.revert_last();
        self.history.remove_last(1);
        let removed = self.history.last().map(String::from);
        self.history.remove_last(1);
        removed
    }

    /// Runs a shell command, records it in the transcript, and returns the
    /// capture for display.
    pub fn run_shell(&mut self, command: &str) -> Result<ShellCapture> {
        let capture = shell::run(command)?;
        self.record_shell_capture(command, &capture);
        Ok(capture)
    }

    /// Records a shell command and its captured output: the literal
    /// command as a user message, then stdout and stderr joined by a
    /// newline as a system message. This is the one path that injects
    /// non-conversational data into the model's context.
    pub fn record_shell_capture(&mut self, command: &str, capture: &ShellCapture) {
        self.transcript.append(Message::user(format!("$ {command}")));
        self.transcript.append(Message::system(format!(
            "{}\n{}",
            capture.stdout, capture.stderr
        )));
    }
}

/// Extracts the bodies of fenced code blocks from a reply.
///
/// An unterminated fence yields nothing, matching the requirement that a
/// block is only a block once it is closed.
pub fn extract_code_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Option<Vec<&str>> = None;
    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            match current.take() {
                Some(lines) => blocks.push(lines.join("\n").trim().to_string()),
                None => current = Some(Vec::new()),
            }
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_single_block() {
        let text = "Run this:\n```bash\nls -l\n```\nDone.";
        assert_eq!(extract_code_blocks(text), vec!["ls -l".to_string()]);
    }

    #[test]
    fn extract_multiple_blocks() {
        let text = "```\nfirst\n```\nprose\n```python\nsecond line one\nsecond line two\n```";
        assert_eq!(
            extract_code_blocks(text),
            vec![
                "first".to_string(),
                "second line one\nsecond line two".to_string()
            ]
        );
    }

    #[test]
    fn unterminated_fence_yields_nothing() {
        let text = "```bash\nrm -rf /";
        assert!(extract_code_blocks(text).is_empty());
    }

    #[test]
    fn no_blocks() {
        assert!(extract_code_blocks("plain prose").is_empty());
    }
}
