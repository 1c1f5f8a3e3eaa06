//! Untagged year references and `#year/` tag write-back
//!
//! Bare four-digit years are never milestones on their own. This module finds
//! them so a user can review each one and, if it is a real date, tag it in
//! place. Years inside code spans or fenced blocks are left alone.

use super::document::{Document, DocumentHandle};
use super::locale::{locale_for, Language};
use super::scanners::{inline, overlaps, snippet};
use pulldown_cmark::{Event, Parser as MdParser, Tag, TagEnd};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Lowest year offered for tagging
pub const MIN_YEAR: u32 = 1000;
/// Highest year offered for tagging
pub const MAX_YEAR: u32 = 2100;

fn digit_run_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"\d+").expect("valid digit pattern"))
}

/// A four-digit number that might be a year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearMatch {
    pub year: u32,
    pub document: DocumentHandle,
    /// 1-based line in the full document text
    pub line_number: usize,
    pub context: String,
}

/// Standalone four-digit numbers on a line within the year range
fn standalone_years(line: &str) -> Vec<(Range<usize>, u32)> {
    digit_run_regex()
        .find_iter(line)
        .filter(|m| m.len() == 4)
        .filter(|m| {
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            !before.is_some_and(|c| c.is_alphanumeric() || c == '/' || c == '#')
                && !after.is_some_and(|c| c.is_alphanumeric() || c == '/')
        })
        .filter_map(|m| {
            let year: u32 = m.as_str().parse().ok()?;
            (MIN_YEAR..=MAX_YEAR).contains(&year).then_some((m.range(), year))
        })
        .collect()
}

fn already_tagged(line: &str, end: usize, year: u32) -> bool {
    line[end..]
        .trim_start()
        .starts_with(&format!("#year/{}", year))
}

/// Untagged years in every document body, in document then line order
pub fn find_potential_years(documents: &[Document], language: Language) -> Vec<YearMatch> {
    let mut found = Vec::new();

    for document in documents {
        let locale = match document.language_override() {
            Ok(Some(language)) => locale_for(language),
            _ => locale_for(language),
        };
        let code = code_ranges(&document.text);
        let start_line = document.body_start_line();

        let mut offset = 0usize;
        for (idx, raw) in document.text.split_inclusive('\n').enumerate() {
            let line_start = offset;
            offset += raw.len();
            if idx < start_line {
                continue;
            }
            let line = raw.trim_end_matches(['\n', '\r']);
            let dates = inline::line_spans(line, locale, false);

            for (span, year) in standalone_years(line) {
                let absolute = line_start + span.start..line_start + span.end;
                if overlaps(&dates, &span)
                    || overlaps(&code, &absolute)
                    || already_tagged(line, span.end, year)
                {
                    continue;
                }
                found.push(YearMatch {
                    year,
                    document: document.handle.clone(),
                    line_number: idx + 1,
                    context: snippet(line, span),
                });
            }
        }
    }

    found
}

/// Insert ` #year/<year>` after the first untagged standalone `year` on a
/// 1-based line. Every other byte of `text` is preserved.
pub fn insert_year_tag(text: &str, line_number: usize, year: u32) -> Option<String> {
    let mut offset = 0usize;
    let mut target = None;
    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        if idx + 1 == line_number {
            target = Some((offset, raw.trim_end_matches(['\n', '\r'])));
            break;
        }
        offset += raw.len();
    }
    let (line_start, line) = target?;

    let (span, _) = standalone_years(line)
        .into_iter()
        .find(|(span, found)| *found == year && !already_tagged(line, span.end, year))?;

    let insert_at = line_start + span.end;
    let mut rewritten = String::with_capacity(text.len() + 12);
    rewritten.push_str(&text[..insert_at]);
    rewritten.push_str(&format!(" #year/{}", year));
    rewritten.push_str(&text[insert_at..]);
    Some(rewritten)
}

/// Byte ranges of code spans and fenced or indented code blocks
fn code_ranges(markdown: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut block_start: Option<usize> = None;

    for (event, range) in MdParser::new(markdown).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(_)) => block_start = Some(range.start),
            Event::End(TagEnd::CodeBlock) => {
                if let Some(start) = block_start.take() {
                    ranges.push(start..range.end);
                }
            }
            Event::Code(_) => ranges.push(range),
            _ => {}
        }
    }

    if let Some(start) = block_start {
        ranges.push(start..markdown.len());
    }
    ranges
}
