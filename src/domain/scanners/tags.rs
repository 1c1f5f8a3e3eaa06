//! `#date/YYYY/MM/DD` and `#year/YYYY` tags
//!
//! Year precision is only ever produced here: the year tag is the explicit
//! annotation that makes a four-digit number a date.

use super::{body_candidate, screenshot, Candidate, ScanContext};
use crate::domain::date_token::TokenKind;
use crate::domain::document::Outline;
use crate::domain::milestone::Notation;
use regex::Regex;
use std::sync::OnceLock;

fn date_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"#date/(?P<year>\d{4})/(?P<month>\d{1,2})/(?P<day>\d{1,2})")
            .expect("valid date tag pattern")
    })
}

fn year_tag_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"#year/(?P<year>\d{4})").expect("valid year tag pattern"))
}

fn ends_cleanly(line: &str, end: usize) -> bool {
    !line[end..]
        .chars()
        .next()
        .is_some_and(|c| c.is_alphanumeric() || c == '/')
}

/// Tag candidates on one line, left to right
fn line_candidates(
    line: &str,
    line_number: usize,
    ctx: &ScanContext<'_>,
    outline: &Outline,
) -> Vec<Candidate> {
    let explicit_uncertain = ctx.document.is_explicitly_uncertain();
    let mut found: Vec<(usize, Candidate)> = Vec::new();

    for caps in date_tag_regex().captures_iter(line) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        if !ends_cleanly(line, whole.end) {
            continue;
        }
        let text = format!("{}-{}-{}", &caps["year"], &caps["month"], &caps["day"]);
        let mut candidate = body_candidate(
            line,
            whole.clone(),
            text,
            TokenKind::Date,
            Notation::Tag,
            line_number,
            outline,
        );
        candidate.explicit_uncertain = explicit_uncertain;
        found.push((whole.start, candidate));
    }

    for caps in year_tag_regex().captures_iter(line) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or_default();
        if !ends_cleanly(line, whole.end) {
            continue;
        }
        let candidate = body_candidate(
            line,
            whole.clone(),
            line[whole.clone()].to_string(),
            TokenKind::YearReference,
            Notation::Tag,
            line_number,
            outline,
        );
        found.push((whole.start, candidate));
    }

    if ctx.exclude_screenshots {
        let filenames = screenshot::filename_ranges(line);
        found.retain(|(start, _)| !filenames.iter().any(|r| r.contains(start)));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, candidate)| candidate).collect()
}

pub fn candidates<'a>(
    ctx: &ScanContext<'a>,
    outline: &'a Outline,
) -> impl Iterator<Item = Candidate> + 'a {
    let ctx = *ctx;
    ctx.document
        .body_lines()
        .flat_map(move |(line_number, line)| line_candidates(line, line_number, &ctx, outline))
}
