//! Inline prose and numeric dates
//!
//! Per line, ISO dates claim their spans first, then month-name forms, then
//! numeric forms. A later pattern never takes text an earlier one claimed.

use super::{body_candidate, overlaps, screenshot, Candidate, ScanContext};
use crate::domain::date_token::{fragments, TokenKind};
use crate::domain::document::Outline;
use crate::domain::locale::{Language, LocaleData};
use crate::domain::milestone::Notation;
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// Leading context for ISO dates; `/` is allowed for `start/end` intervals
const ISO_LEAD: &str = r"(?:^|[^\p{N}.-])";
/// Leading context for other digit-first forms: not glued to another number or path
const NUMERIC_LEAD: &str = r"(?:^|[^\p{N}/.-])";
/// Leading context for `dd/05/1985`-style forms
const PLACEHOLDER_LEAD: &str = r"(?:^|[^\p{L}\p{N}?/.-])";

/// Scanner regexes for one locale, in claim priority order
struct InlinePatterns {
    ordered: Vec<Regex>,
}

fn compile(lead: &str, fragment: &str) -> Regex {
    Regex::new(&format!(r"(?i){}(?P<span>{})", lead, fragment)).expect("valid inline pattern")
}

fn build(locale: &LocaleData) -> InlinePatterns {
    let month_lead = if locale.word_bounded { r"\b" } else { r"(?:^|[^\p{N}])" };
    let placeholders = fragments::placeholder();

    let mut ordered = vec![compile(ISO_LEAD, &fragments::iso())];
    ordered.extend(
        fragments::month_name(locale)
            .iter()
            .map(|f| compile(month_lead, f)),
    );
    // Month-first placeholder forms come in even positions, day-first in odd
    ordered.extend(placeholders.iter().enumerate().map(|(idx, f)| {
        if idx % 2 == 0 {
            compile(NUMERIC_LEAD, f)
        } else {
            compile(PLACEHOLDER_LEAD, f)
        }
    }));
    ordered.extend(fragments::numeric().iter().map(|f| compile(NUMERIC_LEAD, f)));

    InlinePatterns { ordered }
}

fn patterns(locale: &LocaleData) -> &'static InlinePatterns {
    static PATTERNS: OnceLock<Vec<InlinePatterns>> = OnceLock::new();
    let all = PATTERNS.get_or_init(|| {
        Language::ALL
            .iter()
            .map(|&language| build(crate::domain::locale::locale_for(language)))
            .collect()
    });
    &all[locale.language.index()]
}

fn followed_by_digit(line: &str, end: usize) -> bool {
    line[end..].chars().next().is_some_and(|c| c.is_numeric())
}

/// Date spans on one line, left to right, with screenshot names removed
pub fn line_spans(line: &str, locale: &LocaleData, exclude_screenshots: bool) -> Vec<Range<usize>> {
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for regex in &patterns(locale).ordered {
        for caps in regex.captures_iter(line) {
            let Some(span) = caps.name("span") else {
                continue;
            };
            let range = span.range();
            if followed_by_digit(line, range.end) || overlaps(&claimed, &range) {
                continue;
            }
            claimed.push(range);
        }
    }

    claimed.sort_by_key(|r| r.start);
    if exclude_screenshots {
        claimed.retain(|r| !screenshot::is_screenshot_span(line, r));
    }
    claimed
}

/// Inline candidates for every body line
pub fn candidates<'a>(
    ctx: &ScanContext<'a>,
    outline: &'a Outline,
) -> impl Iterator<Item = Candidate> + 'a {
    let ctx = *ctx;
    ctx.document.body_lines().flat_map(move |(line_number, line)| {
        line_spans(line, ctx.locale, ctx.exclude_screenshots)
            .into_iter()
            .map(move |span| {
                body_candidate(
                    line,
                    span.clone(),
                    line[span].to_string(),
                    TokenKind::Date,
                    Notation::Inline,
                    line_number,
                    outline,
                )
            })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_token::OrderPreference;
    use crate::domain::document::{Document, DocumentHandle};
    use crate::domain::locale::locale_for;

    fn texts(line: &str, language: Language) -> Vec<String> {
        line_spans(line, locale_for(language), true)
            .into_iter()
            .map(|r| line[r].to_string())
            .collect()
    }

    #[test]
    fn test_finds_each_form() {
        assert_eq!(texts("Final launch: 2024-07-01", Language::En), vec!["2024-07-01"]);
        assert_eq!(
            texts("Signed March 31, 2001 in Paris", Language::En),
            vec!["March 31, 2001"]
        );
        assert_eq!(texts("Born in May 1985.", Language::En), vec!["May 1985"]);
        assert_eq!(texts("Dated 1/2/1953 (London)", Language::En), vec!["1/2/1953"]);
        assert_eq!(texts("Moved 05/dd/1985", Language::En), vec!["05/dd/1985"]);
    }

    #[test]
    fn test_day_month_year_not_split() {
        assert_eq!(texts("On 15 May 2024 we left", Language::En), vec!["15 May 2024"]);
    }

    #[test]
    fn test_multiple_on_one_line_in_order() {
        assert_eq!(
            texts("From 1/2/1953 to Aug 23 1931 and 2024-03-15", Language::En),
            vec!["1/2/1953", "Aug 23 1931", "2024-03-15"]
        );
        assert_eq!(
            texts("1/2/1953,3/4/1960", Language::En),
            vec!["1/2/1953", "3/4/1960"]
        );
    }

    #[test]
    fn test_iso_interval_yields_both_ends() {
        assert_eq!(
            texts("Sprint 2024-01-15/2024-01-20", Language::En),
            vec!["2024-01-15", "2024-01-20"]
        );
        assert!(texts("Ref 12/05/19530", Language::En).is_empty());
    }

    #[test]
    fn test_no_bare_years() {
        assert!(texts("Page 1809 of the ledger", Language::En).is_empty());
        assert!(texts("Published in #year/1809", Language::En).is_empty());
        assert!(texts("Contract #date/1987/02/18", Language::En).is_empty());
    }

    #[test]
    fn test_no_partial_numbers() {
        assert!(texts("Version 11/2/19530", Language::En).is_empty());
        assert!(texts("Mark 2001 as done", Language::En).is_empty());
    }

    #[test]
    fn test_locale_specific_names() {
        assert_eq!(
            texts("Carta del 15 de Mayo de 2024", Language::Es),
            vec!["15 de Mayo de 2024"]
        );
        assert_eq!(texts("Le 1er Mai 2024", Language::Fr), vec!["1er Mai 2024"]);
        assert_eq!(texts("手紙は2024年5月15日に届いた", Language::Ja), vec!["2024年5月15日"]);
    }

    #[test]
    fn test_screenshots_excluded() {
        assert!(texts("![[Screenshot 2024-03-15 at 10.21.33.png]]", Language::En).is_empty());
        let kept = line_spans(
            "![[Screenshot 2024-03-15 at 10.21.33.png]]",
            locale_for(Language::En),
            false,
        );
        assert_eq!(kept.len(), 1);

        assert_eq!(
            texts("Screenshot tool launched on 2024-03-15. See diagram.png", Language::En),
            vec!["2024-03-15"]
        );
    }

    #[test]
    fn test_candidates_carry_location() {
        let document = Document::from_markdown(
            DocumentHandle::new("letters.md"),
            "# Letters\n\n## London\nLetter dated 1/2/1953\n".to_string(),
        )
        .unwrap();
        let ctx = ScanContext {
            document: &document,
            locale: locale_for(Language::En),
            preference: OrderPreference::Us,
            exclude_screenshots: true,
        };
        let outline = document.outline();
        let found: Vec<Candidate> = candidates(&ctx, &outline).collect();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].text, "1/2/1953");
        assert_eq!(found[0].line_number, Some(4));
        assert_eq!(found[0].heading.as_deref(), Some("London"));
        assert_eq!(found[0].title, "Letter dated 1/2/1953");
    }
}
