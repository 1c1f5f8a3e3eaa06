//! Config management use case

use crate::domain::{Language, OrderPreference, SortOrder};
use crate::error::{Result, TimelineError};
use crate::infrastructure::{FileSystemRepository, Settings, TimelineRepository};
use std::str::FromStr;

/// Every key the config command accepts, in file order
pub const KEYS: &[&str] = &[
    "date_format",
    "sort_order",
    "show_file_links",
    "month_threshold",
    "exclude_screenshots",
    "include_tag_dates",
    "date_format_preference",
    "language",
    "include_year_only",
    "show_year_markers_with_year_only",
    "editor",
];

fn unknown_key(key: &str) -> TimelineError {
    TimelineError::Config(format!(
        "Unknown config key: '{}'. Valid keys are: {}",
        key,
        KEYS.join(", ")
    ))
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(TimelineError::Config(format!(
            "Invalid value for {}: '{}'. Expected true or false",
            key, value
        ))),
    }
}

/// Service for reading and changing timeline settings
pub struct ConfigService {
    repository: FileSystemRepository,
}

impl ConfigService {
    pub fn new(repository: FileSystemRepository) -> Self {
        ConfigService { repository }
    }

    /// Get a single config value
    pub fn get(&self, key: &str) -> Result<String> {
        let settings = self.repository.load_settings()?;
        value_of(&settings, key)
    }

    /// Set a config value after validating it
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut settings = self.repository.load_settings()?;
        apply(&mut settings, key, value)?;
        self.repository.save_settings(&settings)
    }

    /// Every key with its current value
    pub fn list(&self) -> Result<Vec<(&'static str, String)>> {
        let settings = self.repository.load_settings()?;
        KEYS.iter()
            .map(|&key| value_of(&settings, key).map(|value| (key, value)))
            .collect()
    }
}

fn value_of(settings: &Settings, key: &str) -> Result<String> {
    Ok(match key {
        "date_format" => settings.date_format.clone(),
        "sort_order" => settings.sort_order.to_string(),
        "show_file_links" => settings.show_file_links.to_string(),
        "month_threshold" => settings.month_threshold.to_string(),
        "exclude_screenshots" => settings.exclude_screenshots.to_string(),
        "include_tag_dates" => settings.include_tag_dates.to_string(),
        "date_format_preference" => settings.date_format_preference.to_string(),
        "language" => settings.language.to_string(),
        "include_year_only" => settings.include_year_only.to_string(),
        "show_year_markers_with_year_only" => {
            settings.show_year_markers_with_year_only.to_string()
        }
        "editor" => settings.editor.clone(),
        _ => return Err(unknown_key(key)),
    })
}

fn apply(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "date_format" => {
            if value.trim().is_empty() {
                return Err(TimelineError::Config(
                    "date_format cannot be empty".to_string(),
                ));
            }
            settings.date_format = value.to_string();
        }
        "sort_order" => {
            settings.sort_order = SortOrder::from_str(value).map_err(TimelineError::Config)?
        }
        "show_file_links" => settings.show_file_links = parse_bool(key, value)?,
        "month_threshold" => {
            settings.month_threshold = value.trim().parse().map_err(|_| {
                TimelineError::Config(format!(
                    "Invalid value for month_threshold: '{}'. Expected a whole number",
                    value
                ))
            })?
        }
        "exclude_screenshots" => settings.exclude_screenshots = parse_bool(key, value)?,
        "include_tag_dates" => settings.include_tag_dates = parse_bool(key, value)?,
        "date_format_preference" => {
            settings.date_format_preference =
                OrderPreference::from_str(value).map_err(TimelineError::Config)?
        }
        "language" => settings.language = Language::from_str(value)?,
        "include_year_only" => settings.include_year_only = parse_bool(key, value)?,
        "show_year_markers_with_year_only" => {
            settings.show_year_markers_with_year_only = parse_bool(key, value)?
        }
        "editor" => settings.editor = value.to_string(),
        _ => return Err(unknown_key(key)),
    }
    Ok(())
}
