//! Shell command capture for `!` / `$` lines.

use std::process::Command;

use crate::error::{Error, Result};

/// Captured output of one shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCapture {
    /// Captured standard output, verbatim.
    pub stdout: String,

    /// Captured standard error, verbatim.
    pub stderr: String,

    /// Exit status code, when the child was not killed by a signal.
    pub status: Option<i32>,
}

/// Runs one command through `sh -c`, blocking until it exits, and captures
/// both output streams.
pub fn run(command: &str) -> Result<ShellCapture> {
    let output = Command::new("sh")
        .arg("-c")
        .arg(command)
        .output()
        .map_err(|err| Error::io(format!("failed to run `{command}`"), err))?;

    Ok(ShellCapture {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status.code(),
    })
}
