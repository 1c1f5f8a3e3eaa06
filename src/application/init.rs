//! Initialize timeline use case

use crate::error::Result;
use crate::infrastructure::{FileSystemRepository, Settings, TimelineRepository};
use std::fs;
use std::path::Path;

/// Initialize a timeline root at the specified path.
pub fn init(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }

    let repo = FileSystemRepository::new(path.to_path_buf());
    repo.initialize()?;

    let settings = Settings::default();
    repo.save_settings(&settings)?;

    println!("Initialized mtimeline at {}", path.display());
    println!(
        "Language: {}, numeric dates: {}",
        settings.language, settings.date_format_preference
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_nested_root_with_defaults() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("vault").join("notes");

        init(&root).unwrap();

        let settings = Settings::load_from_dir(&root).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_init_twice_fails() {
        let temp = TempDir::new().unwrap();
        init(temp.path()).unwrap();
        assert!(init(temp.path()).is_err());
    }
}
