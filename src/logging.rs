//! Debug logging to a file.
//!
//! Logging is off unless requested; when on, records go to a log file so
//! they never interleave with the conversation on the terminal.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Resolves a level name by case-insensitive prefix, so `deb` means
/// `debug` and `err` means `error`.
pub fn parse_level(level: &str) -> Option<tracing::Level> {
    const LEVELS: [(&str, tracing::Level); 5] = [
        ("error", tracing::Level::ERROR),
        ("warn", tracing::Level::WARN),
        ("info", tracing::Level::INFO),
        ("debug", tracing::Level::DEBUG),
        ("trace", tracing::Level::TRACE),
    ];
    let level = level.to_lowercase();
    if level.is_empty() {
        return None;
    }
    // "deb" matches debug; "warning" still matches warn.
    LEVELS
        .iter()
        .find(|(name, _)| name.starts_with(&level) || level.starts_with(name))
        .map(|(_, resolved)| *resolved)
}

/// Initializes file-based logging.
///
/// `--debug` implies debug level; an explicit `--log-level` wins. Returns
/// without installing anything when neither is given.
pub fn init(debug: bool, level: Option<&str>, path: &Path) -> Result<()> {
    let level = match (level.and_then(parse_level), debug) {
        (Some(level), _) => level,
        (None, true) => tracing::Level::DEBUG,
        (None, false) => return Ok(()),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|err| Error::io("failed to create log directory", err))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| Error::io("failed to open log file", err))?;

    tracing_subscriber::fmt()
        .with_env_filter(format!("parley={level}"))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
