//! External-editor invocation for `/edit`.

use std::env;
use std::io::Write;
use std::process::Command;

use crate::error::{Error, Result};

/// Editor used when $EDITOR is unset.
const DEFAULT_EDITOR: &str = "nano";

/// Opens `initial` in the user's editor and returns the edited text.
///
/// The content lives in a named temp file that is removed on every exit
/// path, including errors; the parent blocks until the editor exits.
/// $EDITOR may contain arguments ("code --wait"), so it is split on
/// whitespace.
pub fn edit_text(initial: &str) -> Result<String> {
    let mut file = tempfile::Builder::new()
        .prefix("parley-edit-")
        .suffix(".txt")
        .tempfile()
        .map_err(|err| Error::io("failed to create temp file for editing", err))?;
    file.write_all(initial.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|err| Error::io("failed to write temp file for editing", err))?;

    let editor = env::var("EDITOR").unwrap_or_else(|_| DEFAULT_EDITOR.to_string());
    let mut words = editor.split_whitespace();
    let program = words
        .next()
        .ok_or_else(|| Error::bad_request("EDITOR is set but empty", None))?;

    let status = Command::new(program)
        .args(words)
        .arg(file.path())
        .status()
        .map_err(|err| Error::io(format!("failed to launch editor `{editor}`"), err))?;

    if !status.success() {
        return Err(Error::bad_request(
            format!("editor exited with {status}"),
            None,
        ));
    }

    let edited = std::fs::read_to_string(file.path())
        .map_err(|err| Error::io("failed to read edited text", err))?;
    Ok(edited.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test body: EDITOR is process-global and tests run concurrently.
    #[test]
    fn editor_round_trip_and_failure() {
        // `true` leaves the temp file untouched, so the initial text comes
        // back (minus the trailing newline trim).
        unsafe { env::set_var("EDITOR", "true") };
        let text = edit_text("draft message\n").unwrap();
        assert_eq!(text, "draft message");

        unsafe { env::set_var("EDITOR", "false") };
        assert!(edit_text("draft").is_err());

        unsafe { env::remove_var("EDITOR") };
    }
}
