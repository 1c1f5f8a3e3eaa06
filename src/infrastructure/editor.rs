//! Editor integration for jumping to a milestone's source line

use crate::error::{Result, TimelineError};
use std::path::Path;
use std::process::Command;

/// Receives a document address and takes the user there
pub trait NavigationSink {
    fn navigate(&self, file_path: &Path, line_number: Option<usize>) -> Result<()>;
}

/// Session for opening files in an external editor
pub struct EditorSession {
    command: String,
}

impl EditorSession {
    /// Create a new editor session with the given command
    pub fn new(editor_command: String) -> Self {
        EditorSession {
            command: editor_command,
        }
    }

    /// Program and full argument list for opening `file_path`, with a `+N`
    /// line argument when a line is known
    fn invocation(&self, file_path: &Path, line_number: Option<usize>) -> (String, Vec<String>) {
        let (program, mut args) = self.parse_command();
        if let Some(line) = line_number {
            args.push(format!("+{}", line));
        }
        args.push(file_path.to_string_lossy().to_string());
        (program, args)
    }

    /// Parse command into program and arguments
    fn parse_command(&self) -> (String, Vec<String>) {
        let parts: Vec<&str> = self.command.split_whitespace().collect();

        if parts.is_empty() {
            return ("vi".to_string(), vec![]);
        }

        let program = parts[0].to_string();
        let args = parts[1..].iter().map(|s| s.to_string()).collect();

        (program, args)
    }
}

impl NavigationSink for EditorSession {
    /// Launch the editor and return immediately
    fn navigate(&self, file_path: &Path, line_number: Option<usize>) -> Result<()> {
        let (program, args) = self.invocation(file_path, line_number);

        #[cfg(windows)]
        {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(&program).args(&args);
            cmd.spawn().map_err(|e| {
                TimelineError::Editor(format!("Failed to launch editor '{}': {}", program, e))
            })?;
        }

        #[cfg(not(windows))]
        {
            Command::new(&program).args(&args).spawn().map_err(|e| {
                TimelineError::Editor(format!("Failed to launch editor '{}': {}", program, e))
            })?;
        }

        Ok(())
    }
}
