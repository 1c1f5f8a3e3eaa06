//! Milestone aggregation across a document collection
//!
//! Each document is scanned on its own with the locale and order preference
//! it resolves to. Results are pooled, deduplicated by position, filtered and
//! sorted. A document that cannot be read or names an unknown language is
//! skipped; aggregation always returns whatever the rest produced.

use super::date_token::OrderPreference;
use super::document::{Document, DocumentHandle};
use super::locale::{locale_for, Language};
use super::milestone::Milestone;
use super::scanners::{scan_document, DocumentScan, ScanContext, ScannerSet};
use crate::error::{Result, TimelineError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// Source of documents for a scan
pub trait DocumentProvider {
    /// Every document handle, in a stable order
    fn list(&self) -> Result<Vec<DocumentHandle>>;

    /// Full text and front matter of one document
    fn read(&self, handle: &DocumentHandle) -> Result<Document>;
}

/// Timeline sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!(
                "Invalid sort order: '{}'. Valid values are: asc, desc",
                s
            )),
        }
    }
}

/// The options that change which milestones come out and in what order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub sort_order: SortOrder,
    pub exclude_screenshots: bool,
    pub include_tag_dates: bool,
    pub date_format_preference: OrderPreference,
    pub language: Language,
    pub include_year_only: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        ScanSettings {
            sort_order: SortOrder::Asc,
            exclude_screenshots: true,
            include_tag_dates: true,
            date_format_preference: OrderPreference::Us,
            language: Language::En,
            include_year_only: true,
        }
    }
}

/// Counts of what happened during one aggregation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub documents: usize,
    pub failed_documents: usize,
    pub candidates: usize,
    pub no_match: usize,
    pub invalid: usize,
    pub duplicates: usize,
    pub year_only_dropped: usize,
}

/// Ordered milestones plus run statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineReport {
    pub milestones: Vec<Milestone>,
    pub stats: AggregateStats,
}

/// Scan one document with its resolved locale and order preference
pub fn scan_one(document: &Document, settings: &ScanSettings) -> Result<DocumentScan> {
    let language = document
        .language_override()?
        .unwrap_or(settings.language);
    let ctx = ScanContext {
        document,
        locale: locale_for(language),
        preference: OrderPreference::resolve(
            settings.date_format_preference,
            document.order_override(),
        ),
        exclude_screenshots: settings.exclude_screenshots,
    };
    let scanners = ScannerSet {
        include_tags: settings.include_tag_dates,
    };
    Ok(scan_document(&ctx, scanners))
}

/// Build the timeline for every document the provider lists
pub fn aggregate<P: DocumentProvider + ?Sized>(
    provider: &P,
    settings: &ScanSettings,
) -> Result<TimelineReport> {
    let mut stats = AggregateStats::default();
    let mut pooled = Vec::new();

    for handle in provider.list()? {
        stats.documents += 1;

        let document = match provider.read(&handle) {
            Ok(document) => document,
            Err(err) => {
                warn!(document = %handle, "skipping unreadable document: {}", err);
                stats.failed_documents += 1;
                continue;
            }
        };

        match scan_one(&document, settings) {
            Ok(scan) => {
                stats.candidates += scan.candidates;
                stats.no_match += scan.no_match;
                stats.invalid += scan.invalid;
                pooled.extend(scan.milestones);
            }
            Err(err @ TimelineError::UnsupportedLocale(_)) => {
                warn!(document = %handle, "skipping document: {}", err);
                stats.failed_documents += 1;
            }
            Err(err) => return Err(err),
        }
    }

    let milestones = finalize(pooled, settings, &mut stats);

    info!(
        documents = stats.documents,
        failed = stats.failed_documents,
        milestones = milestones.len(),
        invalid = stats.invalid,
        duplicates = stats.duplicates,
        "timeline built"
    );

    Ok(TimelineReport { milestones, stats })
}

/// Deduplicate, filter and sort pooled milestones
fn finalize(
    pooled: Vec<Milestone>,
    settings: &ScanSettings,
    stats: &mut AggregateStats,
) -> Vec<Milestone> {
    let mut seen = HashSet::new();
    let mut milestones: Vec<Milestone> = Vec::with_capacity(pooled.len());

    for milestone in pooled {
        let (document, line_number, date) = milestone.position_key();
        if !seen.insert((document.clone(), line_number, date)) {
            stats.duplicates += 1;
            continue;
        }
        if !settings.include_year_only && milestone.is_year_only() {
            stats.year_only_dropped += 1;
            continue;
        }
        milestones.push(milestone);
    }

    milestones.sort_by(|a, b| compare(a, b, settings.sort_order));
    milestones
}

/// Date per sort order, then document, then line
fn compare(a: &Milestone, b: &Milestone, order: SortOrder) -> Ordering {
    let by_date = match order {
        SortOrder::Asc => a.date.cmp(&b.date),
        SortOrder::Desc => b.date.cmp(&a.date),
    };
    by_date
        .then_with(|| a.source_document.cmp(&b.source_document))
        .then_with(|| a.line_number.cmp(&b.line_number))
}
