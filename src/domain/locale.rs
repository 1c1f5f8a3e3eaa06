//! Per-language month tables used by the date token parser

use crate::error::{Result, TimelineError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Languages with month-name tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    Ja,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::En, Language::Es, Language::Fr, Language::Ja];

    /// Two-letter language code
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::Ja => "ja",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            Language::En => 0,
            Language::Es => 1,
            Language::Fr => 2,
            Language::Ja => 3,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "fr" => Ok(Language::Fr),
            "ja" => Ok(Language::Ja),
            _ => Err(TimelineError::UnsupportedLocale(s.to_string())),
        }
    }
}

/// Immutable month data for one language
#[derive(Debug, Clone)]
pub struct LocaleData {
    pub language: Language,
    pub full_month_names: [&'static str; 12],
    pub short_month_names: [&'static str; 12],
    /// Lowercase name or abbreviation to 0-based month index
    pub name_to_month_index: HashMap<String, u32>,
    /// Regex alternation of every month token, longest first
    pub month_alternation_pattern: String,
    pub ordinal_suffix_pattern: &'static str,
    /// Words allowed between date components ("15 de mayo de 2024")
    pub connectors: &'static [&'static str],
    /// Whether month tokens are words that need `\b` boundaries
    pub word_bounded: bool,
    /// Whether dates are written year first ("2024年5月15日")
    pub year_first: bool,
}

impl LocaleData {
    fn build(
        language: Language,
        full: [&'static str; 12],
        short: [&'static str; 12],
        ordinal_suffix_pattern: &'static str,
        connectors: &'static [&'static str],
        word_bounded: bool,
    ) -> Self {
        let year_first = !word_bounded;
        let mut name_to_month_index = HashMap::new();
        for (idx, name) in full.iter().chain(short.iter()).enumerate() {
            name_to_month_index.insert(name.to_lowercase(), (idx % 12) as u32);
        }

        let mut tokens: Vec<&str> = name_to_month_index.keys().map(String::as_str).collect();
        tokens.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        let month_alternation_pattern = tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        LocaleData {
            language,
            full_month_names: full,
            short_month_names: short,
            name_to_month_index,
            month_alternation_pattern,
            ordinal_suffix_pattern,
            connectors,
            word_bounded,
            year_first,
        }
    }

    /// Map a month name or abbreviation (any case) to its 0-based index
    pub fn month_index(&self, name: &str) -> Option<u32> {
        self.name_to_month_index.get(&name.to_lowercase()).copied()
    }
}

fn table() -> &'static [LocaleData; 4] {
    static TABLE: OnceLock<[LocaleData; 4]> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            LocaleData::build(
                Language::En,
                [
                    "January", "February", "March", "April", "May", "June", "July",
                    "August", "September", "October", "November", "December",
                ],
                [
                    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct",
                    "Nov", "Dec",
                ],
                "st|nd|rd|th",
                &["of"],
                true,
            ),
            LocaleData::build(
                Language::Es,
                [
                    "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio",
                    "Agosto", "Septiembre", "Octubre", "Noviembre", "Diciembre",
                ],
                [
                    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct",
                    "Nov", "Dic",
                ],
                "º|ª|°",
                &["de"],
                true,
            ),
            LocaleData::build(
                Language::Fr,
                [
                    "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet",
                    "Août", "Septembre", "Octobre", "Novembre", "Décembre",
                ],
                [
                    "Jan", "Fév", "Mar", "Avr", "Mai", "Jun", "Jul", "Aoû", "Sep", "Oct",
                    "Nov", "Déc",
                ],
                "ère|ème|eme|er|e",
                &[],
                true,
            ),
            LocaleData::build(
                Language::Ja,
                [
                    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月",
                    "11月", "12月",
                ],
                [
                    "1月", "2月", "3月", "4月", "5月", "6月", "7月", "8月", "9月", "10月",
                    "11月", "12月",
                ],
                "日",
                &[],
                false,
            ),
        ]
    })
}

/// Look up the month table for a language
pub fn locale_for(language: Language) -> &'static LocaleData {
    &table()[language.index()]
}

/// Look up the month table for a language code
///
/// Fails with `UnsupportedLocale` for anything outside en, es, fr, ja.
pub fn lookup(code: &str) -> Result<&'static LocaleData> {
    let language = Language::from_str(code)?;
    Ok(locale_for(language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_supported_codes() {
        for code in ["en", "es", "fr", "ja", "EN"] {
            let locale = lookup(code).unwrap();
            assert_eq!(locale.language.code(), code.to_lowercase());
        }
    }

    #[test]
    fn test_lookup_unsupported_code() {
        match lookup("de") {
            Err(TimelineError::UnsupportedLocale(code)) => assert_eq!(code, "de"),
            other => panic!("Expected UnsupportedLocale, got {:?}", other),
        }
    }

    #[test]
    fn test_month_names_round_trip_case_insensitively() {
        for language in Language::ALL {
            let locale = locale_for(language);
            for (idx, name) in locale.full_month_names.iter().enumerate() {
                assert_eq!(locale.month_index(name), Some(idx as u32), "{}", name);
                assert_eq!(locale.month_index(&name.to_uppercase()), Some(idx as u32));
            }
            for (idx, name) in locale.short_month_names.iter().enumerate() {
                assert_eq!(locale.month_index(name), Some(idx as u32), "{}", name);
                assert_eq!(locale.month_index(&name.to_lowercase()), Some(idx as u32));
            }
        }
    }

    #[test]
    fn test_indices_in_range() {
        for language in Language::ALL {
            let locale = locale_for(language);
            assert!(locale.name_to_month_index.values().all(|&idx| idx < 12));
        }
    }

    #[test]
    fn test_alternation_is_longest_first() {
        let fr = locale_for(Language::Fr);
        let mars = fr.month_alternation_pattern.find("mars").unwrap();
        let mar = fr.month_alternation_pattern.find("|mar|").unwrap();
        assert!(mars < mar);

        let ja = locale_for(Language::Ja);
        assert!(ja.month_alternation_pattern.starts_with("10月"));
    }

    #[test]
    fn test_spanish_specific_names() {
        let es = locale_for(Language::Es);
        assert_eq!(es.month_index("marzo"), Some(2));
        assert_eq!(es.month_index("Dic"), Some(11));
        assert_eq!(es.month_index("december"), None);
    }
}
