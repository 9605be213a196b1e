//! System clipboard access.
//!
//! Clipboard failures (headless sessions, missing display server) are
//! reported to the caller and absorbed there; they are never fatal.

use crate::error::{Error, Result};

/// Copies text to the system clipboard.
pub fn copy(text: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|err| Error::clipboard(err.to_string()))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|err| Error::clipboard(err.to_string()))
}
