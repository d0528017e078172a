//! Clipboard backed by an external program that reads stdin.

use std::io::Write;
use std::process::{Command, Stdio};

use decider_core::{Clipboard, ClipboardError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    /// Split a configured command line on whitespace. `None` or a blank
    /// string picks the platform default.
    pub fn from_command_line(command: Option<&str>) -> Self {
        let line = command
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(default_command());
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next().unwrap_or_default();
        CommandClipboard {
            program,
            args: parts.collect(),
        }
    }
}

fn default_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "pbcopy"
    } else if cfg!(windows) {
        "clip"
    } else {
        "xclip -selection clipboard"
    }
}

impl Clipboard for CommandClipboard {
    fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ClipboardError(format!("failed to run '{}': {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ClipboardError(e.to_string()))?;
        }
        let status = child.wait().map_err(|e| ClipboardError(e.to_string()))?;
        if status.success() {
            Ok(())
        } else {
            Err(ClipboardError(format!("'{}' exited with {}", self.program, status)))
        }
    }
}
