//! Front-matter date fields

use super::{screenshot, Candidate, ScanContext};
use crate::domain::date_token::TokenKind;
use crate::domain::document::{DATE_FORMAT_KEY, DATE_UNCERTAIN_KEY, LANGUAGE_KEY};
use crate::domain::milestone::Notation;

/// The primary date key
pub const PRIMARY_KEY: &str = "date";

const AUXILIARY_KEYS: &[&str] = &[
    "deadline",
    "milestone",
    "due",
    "start",
    "end",
    "published",
    "created",
];

/// Whether a front-matter key holds a date
pub fn is_date_key(key: &str) -> bool {
    if matches!(key, DATE_FORMAT_KEY | DATE_UNCERTAIN_KEY | LANGUAGE_KEY) {
        return false;
    }
    key == PRIMARY_KEY
        || AUXILIARY_KEYS.contains(&key.to_lowercase().as_str())
        || key.ends_with("_date")
        || key.ends_with("Date")
}

/// One candidate per date field, the primary key first
pub fn candidates<'a>(ctx: &ScanContext<'a>) -> impl Iterator<Item = Candidate> + 'a {
    let ctx = *ctx;
    let document = ctx.document;
    let explicit_uncertain = document.is_explicitly_uncertain();

    let primary = document
        .metadata
        .get_key_value(PRIMARY_KEY)
        .into_iter();
    let auxiliary = document
        .metadata
        .iter()
        .filter(|(key, _)| key.as_str() != PRIMARY_KEY && is_date_key(key));

    primary
        .chain(auxiliary)
        .filter(move |(_, value)| {
            !(ctx.exclude_screenshots && !screenshot::filename_ranges(value).is_empty())
        })
        .map(move |(key, value)| {
            let title = if key == PRIMARY_KEY {
                document.handle.name().to_string()
            } else {
                format!("{}: {}", document.handle.name(), key)
            };
            Candidate {
                text: value.trim().to_string(),
                kind: TokenKind::Date,
                notation: Notation::StructuredField,
                title,
                context: format!("{}: {}", key, value),
                line_number: None,
                heading: None,
                explicit_uncertain,
            }
        })
}
