//! Output formatting utilities

use crate::domain::aggregator::{AggregateStats, TimelineReport};
use crate::domain::locale::{locale_for, LocaleData};
use crate::domain::{Milestone, Precision, YearMatch};
use crate::infrastructure::Settings;
use chrono::{Datelike, NaiveDate};

const DATE_TOKENS: [&str; 5] = ["MMMM", "MMM", "YYYY", "MM", "DD"];

/// Render a date with a display pattern of YYYY, MM, DD, MMM and MMMM tokens
pub fn format_date(date: NaiveDate, pattern: &str, locale: &LocaleData) -> String {
    let month = date.month0() as usize;
    let mut output = String::with_capacity(pattern.len() + 8);
    let mut rest = pattern;

    while !rest.is_empty() {
        match DATE_TOKENS.iter().find(|token| rest.starts_with(*token)) {
            Some(&token) => {
                match token {
                    "MMMM" => output.push_str(locale.full_month_names[month]),
                    "MMM" => output.push_str(locale.short_month_names[month]),
                    "YYYY" => output.push_str(&format!("{:04}", date.year())),
                    "MM" => output.push_str(&format!("{:02}", date.month())),
                    _ => output.push_str(&format!("{:02}", date.day())),
                }
                rest = &rest[token.len()..];
            }
            None => {
                let mut chars = rest.chars();
                if let Some(c) = chars.next() {
                    output.push(c);
                }
                rest = chars.as_str();
            }
        }
    }

    output
}

/// Date text for a milestone at its own precision
fn milestone_date(milestone: &Milestone, pattern: &str, locale: &LocaleData) -> String {
    let month = milestone.date.month0() as usize;
    let year = milestone.date.year();
    match milestone.precision {
        Precision::Day => format_date(milestone.date, pattern, locale),
        Precision::Month if locale.year_first => {
            format!("{}年{}", year, locale.full_month_names[month])
        }
        Precision::Month => format!("{} {}", locale.full_month_names[month], year),
        Precision::Year => year.to_string(),
    }
}

fn format_milestone(milestone: &Milestone, settings: &Settings, locale: &LocaleData) -> String {
    let mut line = format!(
        "  {}",
        milestone_date(milestone, &settings.date_format, locale)
    );
    if milestone.is_uncertain {
        line.push_str(" ~");
    }
    if milestone.is_tag {
        line.push_str(" #");
    }
    line.push(' ');
    line.push_str(&milestone.title);

    if let Some(heading) = &milestone.heading {
        line.push_str(&format!(" ({})", heading));
    }

    if settings.show_file_links {
        match milestone.line_number {
            Some(number) => line.push_str(&format!(" [{}:{}]", milestone.source_document, number)),
            None => line.push_str(&format!(" [{}]", milestone.source_document)),
        }
    }
    line.push('\n');

    if !milestone.context.is_empty() && milestone.context != milestone.title {
        line.push_str(&format!("      > {}\n", milestone.context));
    }
    line
}

/// Render a timeline with year markers and, for busy years, month markers
pub fn format_timeline(report: &TimelineReport, settings: &Settings) -> String {
    let locale = locale_for(settings.language);
    let mut output = String::new();

    if report.milestones.is_empty() {
        output.push_str("No milestones found\n");
    }

    let mut start = 0;
    while start < report.milestones.len() {
        let year = report.milestones[start].date.year();
        let end = report.milestones[start..]
            .iter()
            .position(|m| m.date.year() != year)
            .map_or(report.milestones.len(), |offset| start + offset);
        let group = &report.milestones[start..end];

        let year_only = group.iter().all(Milestone::is_year_only);
        if !year_only || settings.show_year_markers_with_year_only {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("== {} ==\n", year));
        }

        let show_months = group.len() >= settings.month_threshold.max(1);
        let mut current_month = None;
        for milestone in group {
            if show_months && !milestone.is_year_only() {
                let month = milestone.date.month0();
                if current_month != Some(month) {
                    output.push_str(&format!(
                        "-- {} --\n",
                        locale.full_month_names[month as usize]
                    ));
                    current_month = Some(month);
                }
            }
            output.push_str(&format_milestone(milestone, settings, locale));
        }

        start = end;
    }

    output.push('\n');
    output.push_str(&format_stats(report.milestones.len(), &report.stats));
    output
}

/// One-line summary of an aggregation run
pub fn format_stats(milestones: usize, stats: &AggregateStats) -> String {
    let mut summary = format!(
        "{} milestone{} from {} document{}",
        milestones,
        if milestones == 1 { "" } else { "s" },
        stats.documents,
        if stats.documents == 1 { "" } else { "s" },
    );

    let details: Vec<String> = [
        (stats.failed_documents, "skipped documents"),
        (stats.invalid, "invalid dates"),
        (stats.duplicates, "duplicates"),
        (stats.year_only_dropped, "year-only hidden"),
    ]
    .iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, label)| format!("{} {}", count, label))
    .collect();

    if !details.is_empty() {
        summary.push_str(&format!(" ({})", details.join(", ")));
    }
    summary.push('\n');
    summary
}

/// Format potential year references for review
pub fn format_year_list(matches: &[YearMatch]) -> String {
    if matches.is_empty() {
        return "No untagged years found".to_string();
    }

    let mut output = String::new();
    for found in matches {
        output.push_str(&format!(
            "{}:{}  {}  {}\n",
            found.document, found.line_number, found.year, found.context
        ));
    }
    output
}
