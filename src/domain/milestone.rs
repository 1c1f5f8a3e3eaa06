//! Milestone records produced by the notation scanners

use super::date_token::{ParsedDate, Precision};
use super::document::DocumentHandle;
use chrono::NaiveDate;

/// Which notation a milestone was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Notation {
    /// Front-matter field such as `date:` or `deadline:`
    StructuredField,
    /// Prose or numeric date in the body
    Inline,
    /// `[[2024-03-15]]`
    Bracketed,
    /// `#date/2024/03/15` or `#year/1809`
    Tag,
}

/// One dated event extracted from a document
#[derive(Debug, Clone, PartialEq)]
pub struct Milestone {
    pub date: NaiveDate,
    pub title: String,
    pub source_document: DocumentHandle,
    /// Text surrounding the match
    pub context: String,
    /// Nearest section heading at or above the match
    pub heading: Option<String>,
    /// 1-based line in the full document text
    pub line_number: Option<usize>,
    pub is_tag: bool,
    pub is_uncertain: bool,
    pub precision: Precision,
    pub notation: Notation,
}

impl Milestone {
    pub fn new(
        parsed: ParsedDate,
        title: String,
        source_document: DocumentHandle,
        context: String,
        notation: Notation,
    ) -> Self {
        Milestone {
            date: parsed.date(),
            title,
            source_document,
            context,
            heading: None,
            line_number: None,
            is_tag: notation == Notation::Tag,
            is_uncertain: parsed.is_uncertain(),
            precision: parsed.precision(),
            notation,
        }
    }

    pub fn with_location(mut self, line_number: usize, heading: Option<String>) -> Self {
        self.line_number = Some(line_number);
        self.heading = heading;
        self
    }

    pub fn is_year_only(&self) -> bool {
        self.precision == Precision::Year
    }

    /// Identity used when collapsing duplicate matches
    pub fn position_key(&self) -> (&DocumentHandle, Option<usize>, NaiveDate) {
        (&self.source_document, self.line_number, self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_token::{parse_token, OrderPreference, TokenKind};
    use crate::domain::locale::{locale_for, Language};

    fn parsed(text: &str, kind: TokenKind) -> ParsedDate {
        parse_token(text, locale_for(Language::En), OrderPreference::Us, kind).unwrap()
    }

    #[test]
    fn test_tag_notation_sets_flag() {
        let milestone = Milestone::new(
            parsed("#year/1809", TokenKind::YearReference),
            "Published".to_string(),
            DocumentHandle::new("book.md"),
            "Published in #year/1809".to_string(),
            Notation::Tag,
        );
        assert!(milestone.is_tag);
        assert!(milestone.is_uncertain);
        assert!(milestone.is_year_only());
        assert_eq!(milestone.date, NaiveDate::from_ymd_opt(1809, 7, 1).unwrap());
    }

    #[test]
    fn test_location() {
        let milestone = Milestone::new(
            parsed("2024-03-15", TokenKind::Date),
            "Kickoff".to_string(),
            DocumentHandle::new("plan.md"),
            "Kickoff 2024-03-15".to_string(),
            Notation::Inline,
        )
        .with_location(12, Some("Planning".to_string()));

        assert!(!milestone.is_tag);
        assert_eq!(milestone.line_number, Some(12));
        assert_eq!(milestone.heading.as_deref(), Some("Planning"));
        assert_eq!(
            milestone.position_key(),
            (
                &DocumentHandle::new("plan.md"),
                Some(12),
                NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
            )
        );
    }
}
