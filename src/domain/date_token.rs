//! Date token parsing and normalization
//!
//! Turns a substring believed to hold a date into a calendar date plus a
//! precision and an uncertainty flag. Sub-forms are tried in a fixed order
//! (ISO, month names, numeric with an unknown day, fully numeric, year
//! reference) and the first structural match wins.

use super::locale::{Language, LocaleData};
use crate::error::{Result, TimelineError};
use chrono::{Datelike, NaiveDate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Day substituted when only the month is known
pub const MONTH_PRECISION_DAY: u32 = 15;
/// Month (0-based) substituted when only the year is known
pub const YEAR_PRECISION_MONTH: u32 = 6;

/// Tokens standing in for an unknown day, e.g. `05/dd/1985`
const DAY_PLACEHOLDER: &str = r"dd|xx|\?\?";

/// Granularity of a parsed date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    Day,
    Month,
    Year,
}

/// Convention for fully numeric dates such as `1/2/1953`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderPreference {
    /// month/day/year
    #[default]
    #[serde(rename = "US")]
    Us,
    /// day/month/year
    International,
}

impl OrderPreference {
    /// Per-document override wins over the global preference
    pub fn resolve(global: OrderPreference, document: Option<OrderPreference>) -> OrderPreference {
        document.unwrap_or(global)
    }
}

impl fmt::Display for OrderPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderPreference::Us => f.write_str("US"),
            OrderPreference::International => f.write_str("International"),
        }
    }
}

impl FromStr for OrderPreference {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" => Ok(OrderPreference::Us),
            "international" | "intl" => Ok(OrderPreference::International),
            _ => Err(format!(
                "Invalid date format preference: '{}'. Valid values are: US, International",
                s
            )),
        }
    }
}

/// How a scanner wants a candidate interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Any full or partial date notation
    Date,
    /// An explicitly tagged year (`#year/1809`); the only route to year precision
    YearReference,
}

/// A normalized date with its precision and uncertainty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    date: NaiveDate,
    precision: Precision,
    uncertain: bool,
}

impl ParsedDate {
    fn exact(date: NaiveDate) -> Self {
        ParsedDate {
            date,
            precision: Precision::Day,
            uncertain: false,
        }
    }

    fn month_only(year: i32, month0: u32, text: &str) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month0 + 1, MONTH_PRECISION_DAY)
            .ok_or_else(|| TimelineError::InvalidCalendarDate(text.to_string()))?;
        Ok(ParsedDate {
            date,
            precision: Precision::Month,
            uncertain: true,
        })
    }

    fn year_only(year: i32, text: &str) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, YEAR_PRECISION_MONTH + 1, 1)
            .ok_or_else(|| TimelineError::InvalidCalendarDate(text.to_string()))?;
        Ok(ParsedDate {
            date,
            precision: Precision::Year,
            uncertain: true,
        })
    }

    /// Force `uncertain` when the source carries an explicit annotation
    pub fn with_explicit_uncertainty(mut self, explicit: bool) -> Self {
        if explicit {
            self.uncertain = true;
        }
        self
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// 0-based month
    pub fn month(&self) -> u32 {
        self.date.month0()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn is_uncertain(&self) -> bool {
        self.uncertain
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Unanchored regex fragments shared by the parser and the inline scanner
pub(crate) mod fragments {
    use super::{LocaleData, DAY_PLACEHOLDER};

    pub fn iso() -> String {
        r"(?P<year>\d{4})-(?P<month>\d{1,2})-(?P<day>\d{1,2})".to_string()
    }

    /// Month-name forms in priority order: month-day-year, day-month-year,
    /// year-month[-day] (year-first locales only), month-year
    pub fn month_name(locale: &LocaleData) -> Vec<String> {
        let boundary = if locale.word_bounded { r"\b" } else { "" };
        let month = format!(
            "(?P<month>{}){}",
            locale.month_alternation_pattern, boundary
        );
        let day = format!(
            r"(?P<day>\d{{1,2}})(?:{})?",
            locale.ordinal_suffix_pattern
        );
        let year = r"(?P<year>\d{4})";
        let sep = r"[.,]?\s*";
        let connector = if locale.connectors.is_empty() {
            String::new()
        } else {
            format!(r"(?:(?:{})\s+)?", locale.connectors.join("|"))
        };

        let mut forms = vec![
            format!("{month}{sep}{day}{sep}{connector}{year}"),
            format!("{day}{sep}{connector}{month}{sep}{connector}{year}"),
        ];
        if locale.year_first {
            forms.push(format!("{year}年?{sep}{month}(?:{sep}{day})?"));
        }
        forms.push(format!("{month}{sep}{connector}{year}"));
        forms
    }

    /// Numeric forms with an unknown day; the digits are always the month
    pub fn placeholder() -> Vec<String> {
        ["/", "-"]
            .iter()
            .flat_map(|sep| {
                [
                    format!(
                        r"(?P<month>\d{{1,2}}){sep}(?:{DAY_PLACEHOLDER}){sep}(?P<year>\d{{4}})"
                    ),
                    format!(
                        r"(?:{DAY_PLACEHOLDER}){sep}(?P<month>\d{{1,2}}){sep}(?P<year>\d{{4}})"
                    ),
                ]
            })
            .collect()
    }

    /// Fully numeric `N/N/YYYY` or `N-N-YYYY`; separators must agree
    pub fn numeric() -> Vec<String> {
        ["/", "-"]
            .iter()
            .map(|sep| {
                format!(r"(?P<first>\d{{1,2}}){sep}(?P<second>\d{{1,2}}){sep}(?P<year>\d{{4}})")
            })
            .collect()
    }
}

fn anchored(fragment: &str) -> Regex {
    Regex::new(&format!(r"(?i)^\s*(?:{})\s*$", fragment)).expect("valid date pattern")
}

struct ParserPatterns {
    month_name: Vec<Regex>,
    placeholder: Vec<Regex>,
    numeric: Vec<Regex>,
}

fn iso_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // A trailing time component is tolerated and ignored
    REGEX.get_or_init(|| {
        Regex::new(&format!(
            r"^\s*{}(?:[T ]\d{{1,2}}:\d{{2}}(?::\d{{2}}(?:\.\d+)?)?(?:Z|[+-]\d{{2}}:?\d{{2}})?)?\s*$",
            fragments::iso()
        ))
        .expect("valid ISO pattern")
    })
}

fn year_reference_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"(?i)^\s*(?:#?year/)?(\d{4})\s*$").expect("valid year pattern"))
}

fn parser_patterns(locale: &LocaleData) -> &'static ParserPatterns {
    static PATTERNS: OnceLock<Vec<ParserPatterns>> = OnceLock::new();
    let all = PATTERNS.get_or_init(|| {
        Language::ALL
            .iter()
            .map(|&language| {
                let data = super::locale::locale_for(language);
                ParserPatterns {
                    month_name: fragments::month_name(data).iter().map(|f| anchored(f)).collect(),
                    placeholder: fragments::placeholder().iter().map(|f| anchored(f)).collect(),
                    numeric: fragments::numeric().iter().map(|f| anchored(f)).collect(),
                }
            })
            .collect()
    });
    &all[locale.language.index()]
}

fn number(caps: &Captures<'_>, name: &str) -> Option<u32> {
    caps.name(name).and_then(|m| m.as_str().parse().ok())
}

fn calendar_date(year: i32, month: u32, day: u32, text: &str) -> Result<NaiveDate> {
    if !(1..=12).contains(&month) {
        return Err(TimelineError::InvalidCalendarDate(text.to_string()));
    }
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| TimelineError::InvalidCalendarDate(text.to_string()))
}

/// Parse one candidate substring into a normalized date
///
/// `preference` only matters for fully numeric dates. Year precision is
/// reachable exclusively through `TokenKind::YearReference`; a bare
/// four-digit number is never read as a year.
///
/// # Errors
///
/// - `NoMatch` if the text is not any recognized date notation
/// - `InvalidCalendarDate` if the notation matches but names an impossible date
pub fn parse_token(
    text: &str,
    locale: &LocaleData,
    preference: OrderPreference,
    kind: TokenKind,
) -> Result<ParsedDate> {
    if kind == TokenKind::YearReference {
        return parse_year_reference(text);
    }

    let patterns = parser_patterns(locale);

    if let Some(caps) = iso_regex().captures(text) {
        let (Some(year), Some(month), Some(day)) = (
            number(&caps, "year"),
            number(&caps, "month"),
            number(&caps, "day"),
        ) else {
            return Err(TimelineError::NoMatch(text.to_string()));
        };
        return calendar_date(year as i32, month, day, text).map(ParsedDate::exact);
    }

    for regex in &patterns.month_name {
        let Some(caps) = regex.captures(text) else {
            continue;
        };
        let (Some(year), Some(month0)) = (
            number(&caps, "year"),
            caps.name("month").and_then(|m| locale.month_index(m.as_str())),
        ) else {
            continue;
        };
        return match number(&caps, "day") {
            Some(day) => calendar_date(year as i32, month0 + 1, day, text).map(ParsedDate::exact),
            None => ParsedDate::month_only(year as i32, month0, text),
        };
    }

    for regex in &patterns.placeholder {
        if let Some(caps) = regex.captures(text) {
            let (Some(year), Some(month)) = (number(&caps, "year"), number(&caps, "month")) else {
                continue;
            };
            if !(1..=12).contains(&month) {
                return Err(TimelineError::InvalidCalendarDate(text.to_string()));
            }
            return ParsedDate::month_only(year as i32, month - 1, text);
        }
    }

    for regex in &patterns.numeric {
        if let Some(caps) = regex.captures(text) {
            let (Some(first), Some(second), Some(year)) = (
                number(&caps, "first"),
                number(&caps, "second"),
                number(&caps, "year"),
            ) else {
                continue;
            };
            let (month, day) = match preference {
                OrderPreference::Us => (first, second),
                OrderPreference::International => (second, first),
            };
            return calendar_date(year as i32, month, day, text).map(ParsedDate::exact);
        }
    }

    Err(TimelineError::NoMatch(text.to_string()))
}

fn parse_year_reference(text: &str) -> Result<ParsedDate> {
    let year = year_reference_regex()
        .captures(text)
        .and_then(|caps| caps[1].parse::<i32>().ok())
        .ok_or_else(|| TimelineError::NoMatch(text.to_string()))?;
    ParsedDate::year_only(year, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::locale::{locale_for, Language};

    fn en() -> &'static LocaleData {
        locale_for(Language::En)
    }

    fn parse(text: &str) -> Result<ParsedDate> {
        parse_token(text, en(), OrderPreference::Us, TokenKind::Date)
    }

    #[test]
    fn test_iso_date() {
        let parsed = parse("2024-03-15").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 2, 15));
        assert_eq!(parsed.precision(), Precision::Day);
        assert!(!parsed.is_uncertain());
    }

    #[test]
    fn test_iso_with_time_suffix() {
        let parsed = parse("2024-03-15T10:30:00Z").unwrap();
        assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
    }

    #[test]
    fn test_iso_invalid_day() {
        assert!(matches!(
            parse("2021-02-29"),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
        assert!(matches!(
            parse("2021-13-01"),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_leap_years() {
        assert!(parse("2024-02-29").is_ok());
        assert!(parse("2000-02-29").is_ok());
        assert!(matches!(
            parse("1900-02-29"),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_month_day_year() {
        let parsed = parse("March 31, 2001").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2001, 2, 31));
        assert!(!parsed.is_uncertain());

        let parsed = parse("Aug 23 1931").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (1931, 7, 23));
    }

    #[test]
    fn test_day_month_year_with_ordinal() {
        let parsed = parse("23rd March 2001").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2001, 2, 23));

        let parsed = parse("1st of May 2020").unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2020, 4, 1));
    }

    #[test]
    fn test_month_year_is_month_precision() {
        let parsed = parse("May 1985").unwrap();
        assert_eq!(parsed.precision(), Precision::Month);
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (1985, 4, 15));
        assert!(parsed.is_uncertain());
    }

    #[test]
    fn test_month_name_case_insensitive() {
        let parsed = parse("MARCH 31, 2001").unwrap();
        assert_eq!(parsed.month(), 2);
    }

    #[test]
    fn test_month_name_invalid_day() {
        assert!(matches!(
            parse("April 31, 2001"),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_spanish_month_forms() {
        let es = locale_for(Language::Es);
        let parsed = parse_token("Marzo 31, 2001", es, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2001, 2, 31));

        let parsed =
            parse_token("15 de Mayo de 2024", es, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 4, 15));

        let parsed = parse_token("1º Enero 1990", es, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.month(), parsed.day()), (0, 1));
    }

    #[test]
    fn test_french_month_forms() {
        let fr = locale_for(Language::Fr);
        let parsed = parse_token("1er Mai 2024", fr, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 4, 1));

        let parsed = parse_token("15 février 1950", fr, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.month(), parsed.day()), (1, 15));
    }

    #[test]
    fn test_japanese_year_first() {
        let ja = locale_for(Language::Ja);
        let parsed =
            parse_token("2024年5月15日", ja, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (2024, 4, 15));
        assert_eq!(parsed.precision(), Precision::Day);

        let parsed = parse_token("2024年11月", ja, OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!(parsed.month(), 10);
        assert_eq!(parsed.precision(), Precision::Month);
    }

    #[test]
    fn test_english_months_unknown_in_other_locale() {
        let fr = locale_for(Language::Fr);
        assert!(matches!(
            parse_token("May 1985", fr, OrderPreference::Us, TokenKind::Date),
            Err(TimelineError::NoMatch(_))
        ));
    }

    #[test]
    fn test_placeholder_day() {
        let parsed = parse("05/dd/1985").unwrap();
        assert_eq!(parsed.precision(), Precision::Month);
        assert_eq!((parsed.year(), parsed.month(), parsed.day()), (1985, 4, 15));
        assert!(parsed.is_uncertain());

        // Digits are the month whichever side the placeholder sits on
        let parsed =
            parse_token("??-07-1962", en(), OrderPreference::International, TokenKind::Date)
                .unwrap();
        assert_eq!(parsed.month(), 6);
    }

    #[test]
    fn test_placeholder_invalid_month() {
        assert!(matches!(
            parse("13/dd/1985"),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_ambiguous_numeric_us() {
        let parsed = parse_token("1/2/1953", en(), OrderPreference::Us, TokenKind::Date).unwrap();
        assert_eq!((parsed.month(), parsed.day()), (0, 2));
    }

    #[test]
    fn test_ambiguous_numeric_international() {
        let parsed =
            parse_token("1/2/1953", en(), OrderPreference::International, TokenKind::Date)
                .unwrap();
        assert_eq!((parsed.month(), parsed.day()), (1, 1));
    }

    #[test]
    fn test_numeric_invalid_under_international() {
        assert!(matches!(
            parse_token("31/2/2021", en(), OrderPreference::International, TokenKind::Date),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
        assert!(matches!(
            parse_token("13/1/2021", en(), OrderPreference::Us, TokenKind::Date),
            Err(TimelineError::InvalidCalendarDate(_))
        ));
    }

    #[test]
    fn test_numeric_mixed_separators_rejected() {
        assert!(matches!(parse("1/2-1953"), Err(TimelineError::NoMatch(_))));
    }

    #[test]
    fn test_two_digit_year_rejected() {
        assert!(matches!(parse("1/2/53"), Err(TimelineError::NoMatch(_))));
    }

    #[test]
    fn test_bare_year_is_not_a_date() {
        assert!(matches!(parse("1809"), Err(TimelineError::NoMatch(_))));
    }

    #[test]
    fn test_year_reference() {
        for text in ["1809", "#year/1809", "year/1809"] {
            let parsed =
                parse_token(text, en(), OrderPreference::Us, TokenKind::YearReference).unwrap();
            assert_eq!(parsed.precision(), Precision::Year);
            assert_eq!((parsed.year(), parsed.month(), parsed.day()), (1809, 6, 1));
            assert!(parsed.is_uncertain());
        }
    }

    #[test]
    fn test_year_reference_rejects_dates() {
        assert!(matches!(
            parse_token("2024-03-15", en(), OrderPreference::Us, TokenKind::YearReference),
            Err(TimelineError::NoMatch(_))
        ));
    }

    #[test]
    fn test_explicit_uncertainty_overrides_day_precision() {
        let parsed = parse("2024-03-15").unwrap().with_explicit_uncertainty(true);
        assert_eq!(parsed.precision(), Precision::Day);
        assert!(parsed.is_uncertain());

        let parsed = parse("2024-03-15").unwrap().with_explicit_uncertainty(false);
        assert!(!parsed.is_uncertain());
    }

    #[test]
    fn test_explicit_uncertainty_never_clears_partial_dates() {
        let parsed = parse("May 1985").unwrap().with_explicit_uncertainty(false);
        assert!(parsed.is_uncertain());
    }

    #[test]
    fn test_no_match() {
        assert!(matches!(parse("hello"), Err(TimelineError::NoMatch(_))));
        assert!(matches!(parse(""), Err(TimelineError::NoMatch(_))));
    }

    #[test]
    fn test_resolve_preference() {
        assert_eq!(
            OrderPreference::resolve(OrderPreference::Us, None),
            OrderPreference::Us
        );
        assert_eq!(
            OrderPreference::resolve(OrderPreference::Us, Some(OrderPreference::International)),
            OrderPreference::International
        );
    }

    #[test]
    fn test_preference_from_str() {
        assert_eq!("us".parse::<OrderPreference>().unwrap(), OrderPreference::Us);
        assert_eq!(
            "International".parse::<OrderPreference>().unwrap(),
            OrderPreference::International
        );
        assert!("iso".parse::<OrderPreference>().is_err());
    }
}
