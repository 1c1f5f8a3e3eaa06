//! Notation scanners
//!
//! Four independent passes over one document: front-matter fields, inline
//! prose dates, `[[bracketed]]` references and `#date/` / `#year/` tags.
//! Each pass yields candidates; `interpret` hands them to the token parser.

pub mod bracketed;
pub mod inline;
pub mod screenshot;
pub mod structured;
pub mod tags;

use super::date_token::{parse_token, OrderPreference, TokenKind};
use super::document::{Document, Outline};
use super::locale::LocaleData;
use super::milestone::{Milestone, Notation};
use crate::error::{Result, TimelineError};
use std::collections::HashSet;
use std::ops::Range;
use tracing::{debug, warn};

/// Longest context snippet kept either side of a match, in characters
const CONTEXT_RADIUS: usize = 60;
/// Longest title kept for body matches, in characters
const TITLE_LIMIT: usize = 80;

/// Everything a scanner needs to interpret one document
#[derive(Debug, Clone, Copy)]
pub struct ScanContext<'a> {
    pub document: &'a Document,
    pub locale: &'a LocaleData,
    pub preference: OrderPreference,
    pub exclude_screenshots: bool,
}

/// A substring believed to hold a date, with its source context
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub text: String,
    pub kind: TokenKind,
    pub notation: Notation,
    pub title: String,
    pub context: String,
    pub line_number: Option<usize>,
    pub heading: Option<String>,
    pub explicit_uncertain: bool,
}

/// Which scanners run for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerSet {
    pub include_tags: bool,
}

/// Milestones from one document plus soft-failure counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentScan {
    pub milestones: Vec<Milestone>,
    pub candidates: usize,
    pub no_match: usize,
    pub invalid: usize,
}

/// Run every enabled scanner over a document and interpret the candidates
pub fn scan_document(ctx: &ScanContext<'_>, scanners: ScannerSet) -> DocumentScan {
    let outline = ctx.document.outline();
    let mut scan = DocumentScan::default();
    // Inline and bracketed both see `[[date]]`; one bad token counts once
    let mut invalid_seen: HashSet<(Option<usize>, String)> = HashSet::new();

    let structured = structured::candidates(ctx);
    let inline = inline::candidates(ctx, &outline);
    let bracketed = bracketed::candidates(ctx, &outline);
    let tagged = scanners
        .include_tags
        .then(|| tags::candidates(ctx, &outline))
        .into_iter()
        .flatten();

    for candidate in structured.chain(inline).chain(bracketed).chain(tagged) {
        scan.candidates += 1;
        match interpret(&candidate, ctx) {
            Ok(milestone) => scan.milestones.push(milestone),
            Err(TimelineError::InvalidCalendarDate(text)) => {
                if !invalid_seen.insert((candidate.line_number, candidate.text.clone())) {
                    continue;
                }
                warn!(
                    document = %ctx.document.handle,
                    line = ?candidate.line_number,
                    "skipping impossible date '{}'",
                    text
                );
                scan.invalid += 1;
            }
            Err(err) => {
                debug!(document = %ctx.document.handle, "skipping candidate: {}", err);
                scan.no_match += 1;
            }
        }
    }

    scan
}

/// Parse one candidate into a milestone
pub fn interpret(candidate: &Candidate, ctx: &ScanContext<'_>) -> Result<Milestone> {
    let parsed = parse_token(&candidate.text, ctx.locale, ctx.preference, candidate.kind)?
        .with_explicit_uncertainty(candidate.explicit_uncertain);

    let milestone = Milestone::new(
        parsed,
        candidate.title.clone(),
        ctx.document.handle.clone(),
        candidate.context.clone(),
        candidate.notation,
    );

    Ok(match candidate.line_number {
        Some(line) => milestone.with_location(line, candidate.heading.clone()),
        None => milestone,
    })
}

/// Build a body candidate for a span on a line
pub(crate) fn body_candidate(
    line: &str,
    span: Range<usize>,
    text: String,
    kind: TokenKind,
    notation: Notation,
    line_number: usize,
    outline: &Outline,
) -> Candidate {
    Candidate {
        text,
        kind,
        notation,
        title: line_title(line),
        context: snippet(line, span),
        line_number: Some(line_number),
        heading: outline.heading_at(line_number - 1).map(str::to_string),
        explicit_uncertain: false,
    }
}

/// Character-bounded text around a byte span
pub(crate) fn snippet(line: &str, span: Range<usize>) -> String {
    let start = line[..span.start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map_or(0, |(idx, _)| idx);
    let end = line[span.end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map_or(line.len(), |(idx, _)| span.end + idx);

    let mut text = line[start..end].trim().to_string();
    if start > 0 {
        text.insert(0, '…');
    }
    if end < line.len() {
        text.push('…');
    }
    text
}

/// Line text without markdown markers, shortened for display
pub(crate) fn line_title(line: &str) -> String {
    let stripped = line
        .trim()
        .trim_start_matches(|c: char| c == '#' || c == '>' || c == '-' || c == '*' || c == '+')
        .replace("[[", "")
        .replace("]]", "");
    let stripped = stripped.trim();

    if stripped.chars().count() > TITLE_LIMIT {
        let cut: String = stripped.chars().take(TITLE_LIMIT).collect();
        format!("{}…", cut.trim_end())
    } else {
        stripped.to_string()
    }
}

/// Whether `span` overlaps any range already claimed on the line
pub(crate) fn overlaps(claimed: &[Range<usize>], span: &Range<usize>) -> bool {
    claimed
        .iter()
        .any(|c| span.start < c.end && c.start < span.end)
}
