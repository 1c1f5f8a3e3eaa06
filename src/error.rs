//! Error types for mtimeline

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mtimeline
#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("Not a timeline directory: {0}")]
    NotTimelineDirectory(PathBuf),

    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    #[error("No date found in: {0}")]
    NoMatch(String),

    #[error("Invalid calendar date: {0}")]
    InvalidCalendarDate(String),

    #[error("Failed to read document {document}: {source}")]
    DocumentRead {
        document: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Editor error: {0}")]
    Editor(String),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl TimelineError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TimelineError::NotTimelineDirectory(_) => 2,
            TimelineError::UnsupportedLocale(_) => 3,
            TimelineError::NoMatch(_) | TimelineError::InvalidCalendarDate(_) => 4,
            _ => 1,
        }
    }

    /// Candidate-level failures that skip one match without aborting a scan
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            TimelineError::NoMatch(_) | TimelineError::InvalidCalendarDate(_)
        )
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TimelineError::NotTimelineDirectory(path) => {
                format!(
                    "Not a timeline directory: {}\n\n\
                    Suggestions:\n\
                    • Run 'mtimeline init' in this directory to start a timeline\n\
                    • Navigate to an existing timeline directory\n\
                    • Set MTIMELINE_ROOT environment variable to your notes path",
                    path.display()
                )
            }
            TimelineError::UnsupportedLocale(code) => {
                format!(
                    "Unsupported locale: '{}'\n\n\
                    Supported languages: en, es, fr, ja\n\
                    Example: mtimeline config language fr",
                    code
                )
            }
            TimelineError::NoMatch(text) | TimelineError::InvalidCalendarDate(text) => {
                format!(
                    "{}\n\n\
                    Recognized date notations for '{}':\n\
                    • ISO dates: 2024-03-15\n\
                    • Month names: March 31, 2001 / 15 May 2024 / May 1985\n\
                    • Numeric dates: 1/2/1953 (order follows dateFormatPreference)\n\
                    • Unknown day: 05/dd/1985\n\
                    • Tags: #date/1987/02/18, #year/1809",
                    self, text
                )
            }
            TimelineError::Editor(msg) => {
                format!(
                    "{}\n\n\
                    Suggestions:\n\
                    • Check that your editor is installed and in PATH\n\
                    • Set EDITOR environment variable (e.g., export EDITOR=vim)",
                    msg
                )
            }
            TimelineError::Config(msg) => {
                if msg.contains("Unknown config key") {
                    format!(
                        "{}\n\n\
                        Example: mtimeline config sort_order desc",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TimelineError
pub type Result<T> = std::result::Result<T, TimelineError>;
