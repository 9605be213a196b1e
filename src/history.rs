//! The persisted line history.
//!
//! An append-only log of literal user-typed lines, one per record, reloaded
//! at startup and rewritten after every interactive turn so a crash loses
//! at most the in-flight line. This is best-effort convenience state for
//! input recall and token mining; it is never parsed back into transcript
//! structure and may legitimately diverge from the transcript.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// The persisted log of raw typed lines.
#[derive(Debug, Clone, Default)]
pub struct LineHistory {
    path: Option<PathBuf>,
    lines: Vec<String>,
}

impl LineHistory {
    /// An unpersisted history, for non-interactive runs and tests.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads history from the given file, creating it (and its parent
    /// directory) when missing.
    pub fn load(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| Error::io("failed to create history directory", err))?;
        }
        let lines = match fs::read_to_string(&path) {
            Ok(content) => content.lines().map(String::from).collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => return Err(Error::io("failed to read history file", err)),
        };
        Ok(Self {
            path: Some(path),
            lines,
        })
    }

    /// Records one typed line. Empty lines are not recorded.
    pub fn record(&mut self, line: &str) {
        if !line.is_empty() {
            self.lines.push(line.to_string());
        }
    }

    /// Removes the most recent `n` entries, stopping at empty.
    pub fn remove_last(&mut self, n: usize) {
        let keep = self.lines.len().saturating_sub(n);
        self.lines.truncate(keep);
    }

    /// The most recent entry, if any.
    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// All recorded lines, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The number of recorded lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when no lines are recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Rewrites the backing file. A no-op for in-memory histories.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut file =
            fs::File::create(path).map_err(|err| Error::io("failed to write history file", err))?;
        for line in &self.lines {
            writeln!(file, "{line}").map_err(|err| Error::io("failed to write history file", err))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_remove() {
        let mut history = LineHistory::in_memory();
        history.record("first");
        history.record("second");
        history.record("");
        assert_eq!(history.len(), 2);
        assert_eq!(history.last(), Some("second"));

        history.remove_last(1);
        assert_eq!(history.last(), Some("first"));

        history.remove_last(5);
        assert!(history.is_empty());
    }

    #[test]
    fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");
        let history = LineHistory::load(path).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.txt");

        let mut history = LineHistory::load(path.clone()).unwrap();
        history.record("what is rust");
        history.record("/model gpt-4");
        history.persist().unwrap();

        let reloaded = LineHistory::load(path).unwrap();
        assert_eq!(reloaded.lines(), &["what is rust", "/model gpt-4"]);
    }

    #[test]
    fn persist_after_removal_drops_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.txt");

        let mut history = LineHistory::load(path.clone()).unwrap();
        history.record("keep");
        history.record("drop me");
        history.record("/revert");
        history.remove_last(2);
        history.persist().unwrap();

        let reloaded = LineHistory::load(path).unwrap();
        assert_eq!(reloaded.lines(), &["keep"]);
    }
}
