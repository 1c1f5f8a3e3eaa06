//! `[[YYYY-MM-DD]]` cross-references, with optional alias or section

use super::{body_candidate, screenshot, Candidate, ScanContext};
use crate::domain::date_token::TokenKind;
use crate::domain::document::Outline;
use crate::domain::milestone::Notation;
use regex::Regex;
use std::sync::OnceLock;

fn bracketed_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\[\[(?P<span>\d{4}-\d{1,2}-\d{1,2})(?:[|#][^\]]*)?\]\]")
            .expect("valid bracketed pattern")
    })
}

pub fn candidates<'a>(
    ctx: &ScanContext<'a>,
    outline: &'a Outline,
) -> impl Iterator<Item = Candidate> + 'a {
    let ctx = *ctx;
    ctx.document.body_lines().flat_map(move |(line_number, line)| {
        bracketed_regex()
            .captures_iter(line)
            .filter_map(|caps| caps.name("span").map(|m| m.range()))
            .filter(|span| !(ctx.exclude_screenshots && screenshot::is_screenshot_span(line, span)))
            .map(|span| {
                body_candidate(
                    line,
                    span.clone(),
                    line[span].to_string(),
                    TokenKind::Date,
                    Notation::Bracketed,
                    line_number,
                    outline,
                )
            })
            .collect::<Vec<_>>()
    })
}
