//! Build timeline use case

use crate::domain::{aggregate, Language, OrderPreference, SortOrder, TimelineReport};
use crate::error::Result;
use crate::infrastructure::{FileSystemRepository, Settings, TimelineRepository};

/// Command-line overrides for a single run
#[derive(Debug, Clone, Default)]
pub struct TimelineOptions {
    pub sort_order: Option<SortOrder>,
    pub language: Option<Language>,
    pub date_format_preference: Option<OrderPreference>,
}

/// A report together with the settings it was built with
#[derive(Debug, Clone)]
pub struct BuiltTimeline {
    pub settings: Settings,
    pub report: TimelineReport,
}

pub struct TimelineService {
    repository: FileSystemRepository,
}

impl TimelineService {
    pub fn new(repository: FileSystemRepository) -> Self {
        TimelineService { repository }
    }

    /// Scan every document under the root with saved settings plus overrides
    pub fn execute(&self, options: &TimelineOptions) -> Result<BuiltTimeline> {
        let mut settings = self.repository.load_settings()?;
        if let Some(sort_order) = options.sort_order {
            settings.sort_order = sort_order;
        }
        if let Some(language) = options.language {
            settings.language = language;
        }
        if let Some(preference) = options.date_format_preference {
            settings.date_format_preference = preference;
        }

        let report = aggregate(&self.repository, &settings.scan_settings())?;
        Ok(BuiltTimeline { settings, report })
    }
}
