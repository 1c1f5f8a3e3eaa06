//! Configuration management

use crate::domain::{Language, OrderPreference, ScanSettings, SortOrder};
use crate::error::{Result, TimelineError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Directory holding the configuration, relative to the timeline root
pub const CONFIG_DIR: &str = ".mtimeline";
const CONFIG_FILE: &str = "config.toml";

/// Every option in `.mtimeline/config.toml`; missing keys take their defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display pattern built from YYYY, MM, DD, MMM and MMMM
    pub date_format: String,
    pub sort_order: SortOrder,
    pub show_file_links: bool,
    /// Milestones in one year before month markers are shown
    pub month_threshold: usize,
    pub exclude_screenshots: bool,
    pub include_tag_dates: bool,
    pub date_format_preference: OrderPreference,
    pub language: Language,
    pub include_year_only: bool,
    pub show_year_markers_with_year_only: bool,
    /// Fallback when neither EDITOR nor VISUAL is set
    pub editor: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            date_format: "YYYY-MM-DD".to_string(),
            sort_order: SortOrder::Asc,
            show_file_links: true,
            month_threshold: 10,
            exclude_screenshots: true,
            include_tag_dates: true,
            date_format_preference: OrderPreference::Us,
            language: Language::En,
            include_year_only: true,
            show_year_markers_with_year_only: true,
            editor: Self::detect_default_editor(),
        }
    }
}

impl Settings {
    /// Load settings from .mtimeline/config.toml in the given directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = path.join(CONFIG_DIR).join(CONFIG_FILE);

        let contents = fs::read_to_string(&config_path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TimelineError::NotTimelineDirectory(path.to_path_buf())
            } else {
                TimelineError::Io(e)
            }
        })?;

        toml::from_str(&contents)
            .map_err(|e| TimelineError::Config(format!("Failed to parse config.toml: {}", e)))
    }

    /// Save settings to .mtimeline/config.toml in the given directory
    pub fn save_to_dir(&self, path: &Path) -> Result<()> {
        let config_dir = path.join(CONFIG_DIR);

        if !config_dir.exists() {
            fs::create_dir(&config_dir)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| TimelineError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_dir.join(CONFIG_FILE), contents)?;

        Ok(())
    }

    /// The subset of options the scanners and aggregator read
    pub fn scan_settings(&self) -> ScanSettings {
        ScanSettings {
            sort_order: self.sort_order,
            exclude_screenshots: self.exclude_screenshots,
            include_tag_dates: self.include_tag_dates,
            date_format_preference: self.date_format_preference,
            language: self.language,
            include_year_only: self.include_year_only,
        }
    }

    /// Get the editor command, checking environment variables first
    pub fn get_editor(&self) -> String {
        std::env::var("EDITOR")
            .or_else(|_| std::env::var("VISUAL"))
            .unwrap_or_else(|_| self.editor.clone())
    }

    fn detect_default_editor() -> String {
        if cfg!(windows) {
            "notepad".to_string()
        } else {
            "nano".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.date_format, "YYYY-MM-DD");
        assert_eq!(settings.sort_order, SortOrder::Asc);
        assert_eq!(settings.month_threshold, 10);
        assert_eq!(settings.date_format_preference, OrderPreference::Us);
        assert_eq!(settings.language, Language::En);
        assert!(settings.include_year_only);
        assert!(!settings.editor.is_empty());
    }

    #[test]
    fn test_save_and_load_settings() {
        let temp = TempDir::new().unwrap();
        let settings = Settings {
            sort_order: SortOrder::Desc,
            language: Language::Fr,
            date_format_preference: OrderPreference::International,
            ..Settings::default()
        };

        settings.save_to_dir(temp.path()).unwrap();
        assert!(temp.path().join(".mtimeline/config.toml").exists());

        let loaded = Settings::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(CONFIG_DIR)).unwrap();
        fs::write(
            temp.path().join(".mtimeline/config.toml"),
            "sort_order = \"desc\"\ndate_format_preference = \"International\"\nlanguage = \"ja\"\n",
        )
        .unwrap();

        let loaded = Settings::load_from_dir(temp.path()).unwrap();
        assert_eq!(loaded.sort_order, SortOrder::Desc);
        assert_eq!(loaded.date_format_preference, OrderPreference::International);
        assert_eq!(loaded.language, Language::Ja);
        assert!(loaded.show_file_links);
        assert_eq!(loaded.month_threshold, 10);
    }

    #[test]
    fn test_invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(CONFIG_DIR)).unwrap();
        fs::write(
            temp.path().join(".mtimeline/config.toml"),
            "language = \"tlh\"\n",
        )
        .unwrap();

        match Settings::load_from_dir(temp.path()) {
            Err(TimelineError::Config(msg)) => assert!(msg.contains("config.toml")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();

        match Settings::load_from_dir(temp.path()) {
            Err(TimelineError::NotTimelineDirectory(_)) => {}
            other => panic!("Expected NotTimelineDirectory error, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_settings_subset() {
        let settings = Settings {
            include_year_only: false,
            include_tag_dates: false,
            ..Settings::default()
        };
        let scan = settings.scan_settings();
        assert!(!scan.include_year_only);
        assert!(!scan.include_tag_dates);
        assert!(scan.exclude_screenshots);
    }
}
