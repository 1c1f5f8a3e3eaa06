//! File system repository

use crate::domain::aggregator::DocumentProvider;
use crate::domain::document::{Document, DocumentHandle};
use crate::error::{Result, TimelineError};
use crate::infrastructure::config::{Settings, CONFIG_DIR};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Environment variable that pins the timeline root
pub const ROOT_ENV: &str = "MTIMELINE_ROOT";

/// Abstract repository for timeline settings
pub trait TimelineRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Load settings from .mtimeline/config.toml
    fn load_settings(&self) -> Result<Settings>;

    /// Save settings to .mtimeline/config.toml
    fn save_settings(&self, settings: &Settings) -> Result<()>;

    /// Check if .mtimeline directory exists
    fn is_initialized(&self) -> bool;

    /// Create .mtimeline directory structure
    fn initialize(&self) -> Result<()>;
}

/// Markdown notes under one root directory
#[derive(Debug, Clone)]
pub struct FileSystemRepository {
    pub root: PathBuf,
}

impl FileSystemRepository {
    /// Create a new repository with the given root directory
    pub fn new(root: PathBuf) -> Self {
        FileSystemRepository { root }
    }

    /// Discover the timeline root
    /// First checks MTIMELINE_ROOT, then walks up from the current directory
    pub fn discover() -> Result<Self> {
        if let Ok(root_path) = std::env::var(ROOT_ENV) {
            let path = PathBuf::from(root_path);
            if Self::has_config_dir(&path) {
                return Ok(FileSystemRepository::new(path));
            } else {
                return Err(TimelineError::Config(format!(
                    "{} is set to '{}' but no {} directory found. \
                    Run 'mtimeline init' in that directory or unset {}.",
                    ROOT_ENV,
                    path.display(),
                    CONFIG_DIR,
                    ROOT_ENV
                )));
            }
        }

        let current_dir = std::env::current_dir()?;
        Self::discover_from(&current_dir)
    }

    /// Discover the timeline root by walking up from a specific starting directory
    pub fn discover_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();

        loop {
            if Self::has_config_dir(&current) {
                return Ok(FileSystemRepository::new(current));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(TimelineError::NotTimelineDirectory(start.to_path_buf())),
            }
        }
    }

    fn has_config_dir(path: &Path) -> bool {
        path.join(CONFIG_DIR).is_dir()
    }

    /// Absolute path of a document
    pub fn path_of(&self, handle: &DocumentHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }

    /// Write note content using a best-effort atomic replace:
    /// write to a temp file in the same directory, then rename into place.
    ///
    /// On Windows, `rename` does not overwrite existing files, so we remove the destination first.
    pub fn write_note_atomic(&self, handle: &DocumentHandle, content: &str) -> Result<()> {
        let path = self.path_of(handle);

        let tmp_name = format!(
            "{}.mtimeline-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("note.md"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if cfg!(windows) && path.exists() {
            fs::remove_file(&path)?;
        }

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Read and parse every listed document, skipping unreadable ones
    pub fn read_all(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for handle in self.list()? {
            match self.read(&handle) {
                Ok(document) => documents.push(document),
                Err(err) => warn!(document = %handle, "skipping unreadable document: {}", err),
            }
        }
        Ok(documents)
    }

    fn normalize_relative_path(path: &Path) -> Option<String> {
        let parts: Vec<&str> = path
            .iter()
            .map(|part| part.to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

impl TimelineRepository for FileSystemRepository {
    fn root(&self) -> &Path {
        &self.root
    }

    fn load_settings(&self) -> Result<Settings> {
        Settings::load_from_dir(&self.root)
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        settings.save_to_dir(&self.root)
    }

    fn is_initialized(&self) -> bool {
        Self::has_config_dir(&self.root)
    }

    fn initialize(&self) -> Result<()> {
        let config_dir = self.root.join(CONFIG_DIR);

        if config_dir.exists() {
            return Err(TimelineError::Config(format!(
                "Directory already initialized: {}",
                self.root.display()
            )));
        }

        fs::create_dir(&config_dir)?;
        Ok(())
    }
}

impl DocumentProvider for FileSystemRepository {
    /// Every `*.md` file below the root, hidden directories skipped,
    /// sorted by relative path
    fn list(&self) -> Result<Vec<DocumentHandle>> {
        let walker = WalkDir::new(&self.root).into_iter().filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !name.starts_with('.'))
        });

        let mut handles = Vec::new();
        for entry in walker {
            let Ok(entry) = entry else {
                continue;
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if rel.extension().and_then(|ext| ext.to_str()) != Some("md") {
                continue;
            }
            if let Some(name) = Self::normalize_relative_path(rel) {
                handles.push(DocumentHandle::new(name));
            }
        }

        handles.sort();
        Ok(handles)
    }

    fn read(&self, handle: &DocumentHandle) -> Result<Document> {
        let text =
            fs::read_to_string(self.path_of(handle)).map_err(|source| TimelineError::DocumentRead {
                document: handle.to_string(),
                source,
            })?;

        match Document::from_markdown(handle.clone(), text.clone()) {
            Ok(document) => Ok(document),
            Err(TimelineError::Metadata(msg)) => {
                warn!(document = %handle, "ignoring malformed front matter: {}", msg);
                Ok(Document::new(handle.clone(), text, BTreeMap::new()))
            }
            Err(err) => Err(err),
        }
    }
}
