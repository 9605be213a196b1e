//! Tab-completion support.
//!
//! Candidate tokens are mined from accumulated text (typed history lines
//! plus assistant replies) by a pure function, so ranking is testable
//! without a terminal. The rustyline glue lives in [`ChatHelper`] and also
//! completes slash-command names and file paths.

use std::collections::HashMap;

use rustyline::Context;
use rustyline::Helper;
use rustyline::completion::{Completer, FilenameCompleter, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;

use crate::chat::COMMANDS;
use crate::history::LineHistory;
use crate::transcript::Transcript;
use crate::types::Role;

/// Minimum token length worth offering for completion.
pub const MIN_TOKEN_LEN: usize = 8;

/// Returns a frequency-ranked list of unique completion tokens mined from
/// the given strings.
///
/// Tokens shorter than [`MIN_TOKEN_LEN`], and anything that looks like a
/// slash command, are skipped. Surrounding quotes and trailing punctuation
/// are stripped and tokens are lowercased. Ties rank alphabetically so the
/// ordering is stable.
pub fn mine_tokens<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for source in sources {
        for token in source.split_whitespace() {
            if token.starts_with('/') {
                continue;
            }
            let token = token
                .trim_start_matches('"')
                .trim_end_matches([':', ';', ',', '.', '!', '?', '"']);
            if token.chars().count() < MIN_TOKEN_LEN {
                continue;
            }
            *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().map(|(token, _)| token).collect()
}

/// Mines completion candidates from the current session state: every typed
/// history line plus every assistant reply.
pub fn session_candidates(history: &LineHistory, transcript: &Transcript) -> Vec<String> {
    let history_lines = history.lines().iter().map(String::as_str);
    let replies = transcript
        .messages()
        .iter()
        .filter(|message| message.role == Role::Assistant)
        .map(|message| message.content.as_str());
    mine_tokens(history_lines.chain(replies))
}

/// Rustyline helper: completes slash commands, mined tokens, and paths.
pub struct ChatHelper {
    candidates: Vec<String>,
    files: FilenameCompleter,
}

impl ChatHelper {
    /// Creates a helper with no mined candidates yet.
    pub fn new() -> Self {
        Self {
            candidates: Vec::new(),
            files: FilenameCompleter::new(),
        }
    }

    /// Replaces the mined candidate list.
    pub fn set_candidates(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
    }

    /// Re-mines candidates from the current session state.
    pub fn refresh(&mut self, history: &LineHistory, transcript: &Transcript) {
        self.candidates = session_candidates(history, transcript);
    }
}

impl Default for ChatHelper {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = line[..pos]
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        let word = &line[start..pos];

        // Slash commands complete only at the start of the line.
        if start == 0 && word.starts_with('/') {
            let prefix = &word[1..];
            let pairs = COMMANDS
                .iter()
                .filter(|name| name.starts_with(prefix))
                .map(|name| Pair {
                    display: format!("/{name}"),
                    replacement: format!("/{name}"),
                })
                .collect();
            return Ok((start, pairs));
        }

        // Anything path-shaped goes to the filename completer.
        if word.contains('/') || word.starts_with('~') {
            return self.files.complete(line, pos, ctx);
        }

        if word.is_empty() {
            return Ok((start, Vec::new()));
        }

        let needle = word.to_lowercase();
        let pairs = self
            .candidates
            .iter()
            .filter(|candidate| candidate.starts_with(&needle))
            .map(|candidate| Pair {
                display: candidate.clone(),
                replacement: candidate.clone(),
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for ChatHelper {
    type Hint = String;
}

impl Highlighter for ChatHelper {}

impl Validator for ChatHelper {}

impl Helper for ChatHelper {}
